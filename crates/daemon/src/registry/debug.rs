// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Debug & Failure-Hint Wrapper (C5, §4.5): wraps every registered
//! tool's handler so a leading-glyph error gets a remediation hint appended,
//! and keeps a per-tool call/failure counter for telemetry.
//!
//! Pure substring → hint lookup lives in `warden_core::hints`; this module
//! adds the stateful wrapping and the `debug(name)` meta-tool, which reads a
//! tool's source location back off disk using
//! [`warden_core::registry::ToolRegistry::get_manifest`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use warden_core::hints::lookup_hint;
use warden_core::registry::{HandlerFn, Tool, ToolRegistry};
use warden_core::result::ToolResult;

/// Per-tool call counters, exposed to telemetry (§4.5: "an in-memory
/// per-session counter"). The wrapper only ever sees `(tool_name, args)`,
/// not a session id, so this tracks per-tool rather than per-session —
/// recorded as an Open Question resolution in the project notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTelemetry {
    pub calls: u64,
    pub failures: u64,
    pub last_failure: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DebugError {
    #[error("tool {0:?} is not in the manifest")]
    UnknownTool(String),
    #[error("io error reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// Wraps tool handlers with the hint-on-error behavior and backs the
/// `debug(name)` meta-tool. `crate_root` is where a tool's recorded
/// [`SourceLocation::file`] is resolved relative to.
pub struct DebugWrapper {
    crate_root: PathBuf,
    service_token_env: Option<(String, &'static str)>,
    telemetry: RwLock<IndexMap<String, ToolTelemetry>>,
}

impl DebugWrapper {
    pub fn new(crate_root: impl Into<PathBuf>) -> Self {
        Self { crate_root: crate_root.into(), service_token_env: None, telemetry: RwLock::new(IndexMap::new()) }
    }

    /// Configure the service-specific token rule (§4.5: "a service-specific
    /// token error → name the env var to set"), checked against the error
    /// body for `needle` before the generic auth/network rules.
    pub fn with_service_token_env(mut self, needle: impl Into<String>, env_name: &'static str) -> Self {
        self.service_token_env = Some((needle.into(), env_name));
        self
    }

    pub fn telemetry_for(&self, tool: &str) -> ToolTelemetry {
        self.telemetry.read().get(tool).cloned().unwrap_or_default()
    }

    /// Wrap `tool`'s handler: record the call, and on an error result with
    /// no hint of its own, append one from the rule table.
    pub fn wrap(self: &Arc<Self>, mut tool: Tool) -> Tool {
        let this = Arc::clone(self);
        let name = tool.name.clone();
        let inner: Arc<HandlerFn> = tool.handler.clone();

        tool.handler = Arc::new(move |args: Value| {
            let this = Arc::clone(&this);
            let inner = Arc::clone(&inner);
            let name = name.clone();
            Box::pin(async move {
                let result = inner(args).await;
                this.record_and_hint(&name, result)
            })
        });
        tool
    }

    fn record_and_hint(&self, name: &str, result: ToolResult) -> ToolResult {
        let failed = result.is_error();
        {
            let mut telemetry = self.telemetry.write();
            let entry = telemetry.entry(name.to_string()).or_default();
            entry.calls += 1;
            if failed {
                entry.failures += 1;
                entry.last_failure = Some(result.render());
            }
        }

        match result {
            ToolResult::Error(message, mut detail) if detail.hint.is_none() => {
                let service = self.service_token_env.as_ref().map(|(needle, env)| (needle.as_str(), *env));
                if let Some(hint) = lookup_hint(&message, service) {
                    detail.hint = Some(hint.message());
                }
                ToolResult::Error(message, detail)
            }
            other => other,
        }
    }

    /// Read the source text for `name`'s implementing function (§4.5: the
    /// `debug(name)` meta-tool), using its manifest entry regardless of
    /// whether the tool is currently live.
    pub fn source_text(&self, registry: &ToolRegistry, name: &str) -> Result<String, DebugError> {
        let tool = registry.get_manifest(name).ok_or_else(|| DebugError::UnknownTool(name.to_string()))?;
        let path = self.crate_root.join(&tool.source.file);
        let contents = read_file(&path)?;

        let lines: Vec<&str> = contents.lines().collect();
        let start = (tool.source.line_start.max(1) as usize).saturating_sub(1);
        let end = (tool.source.line_end as usize).min(lines.len());
        Ok(lines.get(start..end.max(start)).unwrap_or(&[]).join("\n"))
    }
}

fn read_file(path: &Path) -> Result<String, DebugError> {
    std::fs::read_to_string(path).map_err(|source| DebugError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
