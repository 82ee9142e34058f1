// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Persona Loader (C7, §4.7): owns the current persona's module set and
//! runs the switch algorithm against the live Tool Registry, preserving the
//! protected core across every switch.
//!
//! Module resolution (§3 Module: bare name → core file, `_basic`/`_extra`/
//! `_style` → their own files) is modeled here as a name → [`ModuleRegistrar`]
//! map the orchestrator populates at boot, rather than a generic suffix
//! parser — the small, fixed set of demo modules this runtime ships makes a
//! direct lookup simpler than deriving file paths at runtime.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;

use warden_core::host::HostNotifier;
use warden_core::persona::Persona;
use warden_core::registry::ToolRegistry;
use warden_skills::ToolKnowledge;

/// Registers one module's tools against the live registry. Implemented by
/// closures the orchestrator builds at boot, each capturing the concrete
/// capability adapters (repo root, credential/network adapters, ...) a
/// given module's `register_tools` entry point needs.
pub trait ModuleRegistrar: Send + Sync {
    fn register(&self, registry: &mut ToolRegistry) -> Vec<String>;
}

impl<F> ModuleRegistrar for F
where
    F: Fn(&mut ToolRegistry) -> Vec<String> + Send + Sync,
{
    fn register(&self, registry: &mut ToolRegistry) -> Vec<String> {
        self(registry)
    }
}

#[derive(Debug, Error)]
pub enum PersonaLoadError {
    #[error("persona {0:?} not found")]
    NotFound(String),
    #[error("io error reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse persona document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result of a persona switch (§4.7 step 7): `{success, tool_count,
/// persona_text}` plus the list of modules that failed to load, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonaSwitchOutcome {
    pub success: bool,
    pub tool_count: usize,
    pub persona_text: String,
    pub failed_modules: Vec<String>,
}

pub struct PersonaLoader {
    registry: Arc<RwLock<ToolRegistry>>,
    registrars: IndexMap<String, Arc<dyn ModuleRegistrar>>,
    personas_dir: PathBuf,
    protected: Vec<String>,
    switch_lock: tokio::sync::Mutex<()>,
}

impl PersonaLoader {
    pub fn new(
        registry: Arc<RwLock<ToolRegistry>>,
        personas_dir: impl Into<PathBuf>,
        protected: Vec<String>,
    ) -> Self {
        Self {
            registry,
            registrars: IndexMap::new(),
            personas_dir: personas_dir.into(),
            protected,
            switch_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn register_module(&mut self, name: impl Into<String>, registrar: Arc<dyn ModuleRegistrar>) {
        self.registrars.insert(name.into(), registrar);
    }

    pub fn protected(&self) -> &[String] {
        &self.protected
    }

    /// Register a module by name directly, bypassing the persona file and
    /// the protected-set preservation — used at boot for `--tools`/`--all`
    /// (§4.11 step 3), where there is no persona to switch away from yet.
    pub fn load_module(&self, module: &str) -> Option<Vec<String>> {
        let registrar = self.resolve(module)?;
        Some(registrar.register(&mut self.registry.write()))
    }

    pub fn known_modules(&self) -> Vec<String> {
        self.registrars.keys().cloned().collect()
    }

    fn resolve(&self, module_name: &str) -> Option<Arc<dyn ModuleRegistrar>> {
        if let Some(r) = self.registrars.get(module_name) {
            return Some(Arc::clone(r));
        }
        let has_suffix =
            module_name.ends_with("_basic") || module_name.ends_with("_extra") || module_name.ends_with("_style");
        if !has_suffix {
            if let Some(r) = self.registrars.get(&format!("{module_name}_basic")) {
                return Some(Arc::clone(r));
            }
        }
        None
    }

    fn load_persona_file(&self, name: &str) -> Result<Persona, PersonaLoadError> {
        let path = self.personas_dir.join(format!("{name}.yaml"));
        if !path.is_file() {
            return Err(PersonaLoadError::NotFound(name.to_string()));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|source| PersonaLoadError::Io { path: path.clone(), source })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// `<project>/personas/*.yaml`, sorted by name.
    pub fn list_personas(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.personas_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension()?.to_str()? != "yaml" {
                    return None;
                }
                path.file_stem()?.to_str().map(str::to_string)
            })
            .collect();
        names.sort();
        names
    }

    /// The full switch algorithm (§4.7 steps 1-7). `notifier` sends the
    /// `tool_list_changed` host-protocol notification (step 6); updating the
    /// calling workspace's persona (step 5) is the caller's responsibility,
    /// since this loader has no workspace URI to key on.
    pub async fn switch(
        &self,
        persona_name: &str,
        notifier: &dyn HostNotifier,
    ) -> Result<PersonaSwitchOutcome, PersonaLoadError> {
        let _guard = self.switch_lock.lock().await;

        let persona = self.load_persona_file(persona_name)?;

        let mut failed_modules = Vec::new();
        {
            let mut registry = self.registry.write();
            registry.unregister_all_except(&self.protected);

            for module in &persona.modules {
                match self.resolve(module) {
                    Some(registrar) => {
                        registrar.register(&mut registry);
                    }
                    None => failed_modules.push(module.clone()),
                }
            }
        }

        let tool_count = self.registry.read().live_names().len();
        notifier.send_notification("tool_list_changed", serde_json::json!({"persona": persona_name})).await;

        Ok(PersonaSwitchOutcome {
            success: failed_modules.is_empty(),
            tool_count,
            persona_text: persona.instruction_text(),
            failed_modules,
        })
    }

    /// Whether a persona's module list would, if switched to, register
    /// `tool` — resolved by registering into a scratch registry rather than
    /// mutating the live one (§4.9 "a missing tool yields a pre-flight
    /// warning listing the personas that would provide it").
    fn persona_would_provide(&self, persona_name: &str, tool: &str) -> bool {
        let Ok(persona) = self.load_persona_file(persona_name) else {
            return false;
        };
        let mut scratch = ToolRegistry::new();
        for module in &persona.modules {
            if let Some(registrar) = self.resolve(module) {
                registrar.register(&mut scratch);
            }
        }
        scratch.get_manifest(tool).is_some()
    }
}

impl ToolKnowledge for PersonaLoader {
    fn is_known(&self, tool: &str) -> bool {
        let registry = self.registry.read();
        registry.is_live(tool) || registry.get_manifest(tool).is_some()
    }

    fn personas_providing(&self, tool: &str) -> Vec<String> {
        self.list_personas().into_iter().filter(|name| self.persona_would_provide(name, tool)).collect()
    }
}

#[cfg(test)]
#[path = "persona_loader_tests.rs"]
mod tests;
