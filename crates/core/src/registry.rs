// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Tool Registry's data types (C4).
//!
//! Lives in `warden-core` rather than `warden-daemon` so that both
//! `warden-modules` (which registers tools) and the daemon's persona loader
//! can depend on it without a crate cycle. The registry itself is a plain
//! data structure; the debug/auto-heal wrapping of a registered handler is
//! applied by the daemon at registration time.

use indexmap::IndexMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::result::ToolResult;

/// Where a tool's implementation lives, for the `debug(name)` meta-tool (C5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line_start: u32,
    pub line_end: u32,
}

/// The three tool tiers, enforced purely by which file declares a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Core,
    Basic,
    Extra,
}

crate::simple_display!(Tier {
    Core => "core",
    Basic => "basic",
    Extra => "extra",
});

/// One named, typed argument a tool declares.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub type_name: String,
    pub required: bool,
    pub description: Option<String>,
}

/// A tool's async handler, type-erased so the registry need not depend on an
/// async runtime to store it.
pub type HandlerFn =
    dyn Fn(serde_json::Value) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> + Send + Sync;

/// A named operation registered against the host protocol.
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub module: String,
    pub tier: Tier,
    pub source: SourceLocation,
    pub input_schema: Vec<ParamSpec>,
    pub handler: Arc<HandlerFn>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("tier", &self.tier)
            .field("source", &self.source)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

impl Tool {
    /// Call the handler with the given JSON arguments.
    pub async fn invoke(&self, args: serde_json::Value) -> ToolResult {
        (self.handler)(args).await
    }
}

/// Maintains the live tool set and the append-mostly manifest of every tool
/// ever registered, indexed for reverse lookup by module/tier.
#[derive(Default)]
pub struct ToolRegistry {
    live: IndexMap<String, Tool>,
    manifest: IndexMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing entry with the same name.
    /// Updates both the live set and the manifest.
    pub fn register(&mut self, tool: Tool) {
        self.manifest.insert(tool.name.clone(), tool.clone());
        self.live.insert(tool.name.clone(), tool);
    }

    /// Remove a tool from the live set. The manifest entry is kept so the
    /// catalogue remains queryable for unloaded tools.
    pub fn unregister(&mut self, name: &str) -> Option<Tool> {
        self.live.shift_remove(name)
    }

    /// Snapshot of currently live tool names, in registration order.
    pub fn live_names(&self) -> Vec<String> {
        self.live.keys().cloned().collect()
    }

    pub fn get_live(&self, name: &str) -> Option<&Tool> {
        self.live.get(name)
    }

    /// Look up a tool in the manifest regardless of whether it is
    /// currently live — used by the `debug(name)` meta-tool (C5), which
    /// must be able to return source text for a tool unloaded by a past
    /// persona switch.
    pub fn get_manifest(&self, name: &str) -> Option<&Tool> {
        self.manifest.get(name)
    }

    pub fn is_live(&self, name: &str) -> bool {
        self.live.contains_key(name)
    }

    /// The module that last registered the given tool name, live or not.
    pub fn module_of(&self, name: &str) -> Option<&str> {
        self.manifest.get(name).map(|t| t.module.as_str())
    }

    /// All manifest entries for a module, optionally filtered by tier.
    pub fn tools_of(&self, module: &str, tier: Option<Tier>) -> Vec<&Tool> {
        self.manifest
            .values()
            .filter(|t| t.module == module)
            .filter(|t| tier.map(|want| want == t.tier).unwrap_or(true))
            .collect()
    }

    /// Unregister every currently live tool name not present in `keep`.
    pub fn unregister_all_except(&mut self, keep: &[String]) -> Vec<String> {
        let to_remove: Vec<String> =
            self.live.keys().filter(|name| !keep.contains(name)).cloned().collect();
        for name in &to_remove {
            self.live.shift_remove(name);
        }
        to_remove
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
