// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Auto-Heal Wrapper (C6, §4.6): classifies a failing tool's output,
//! applies the mapped fix action through a capability adapter, retries the
//! original tool, and records one entry per invocation to the
//! failure-pattern log.
//!
//! Pure classification and cluster inference live in
//! `warden_core::autoheal`; this module adds the stateful retry loop, the
//! fix dispatch to `warden_modules`' `CredentialAdapter`/`NetworkAdapter`,
//! and the `warden_storage::failure_log` writes. It also implements
//! `warden_engine::AutoHealer` so the skill engine's `on_error: auto_heal`
//! steps delegate into the same machinery for a single round (§4.9 step 4g).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use warden_core::autoheal::{infer_cluster, FailureClass};
use warden_core::registry::{HandlerFn, Tool};
use warden_core::result::ToolResult;
use warden_engine::traits::{AutoHealer, ToolInvoker};
use warden_modules::{CredentialAdapter, NetworkAdapter};
use warden_storage::{FailureLog, NewFailure};

/// Default `max_retries` per §9's resolved open question: 1, configurable
/// per wrapped tool.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Fan-out hook for the heal event family (§4.8: "triggered / completed"),
/// set by the orchestrator when the Event Bus is enabled. Kept separate
/// from `AutoHealer`/`ToolInvoker` so this crate's tests never have to
/// supply one just to exercise the retry loop.
pub trait HealSink: Send + Sync {
    fn heal_triggered(&self, tool_name: &str, class: &str, fix_action: &str);
    fn heal_completed(&self, tool_name: &str, class: &str, fix_action: &str, success: bool);
}

const ERROR_SNIPPET_CHARS: usize = 500;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

/// Owns the fix-action adapters, the failure log, and per-tool `max_retries`
/// overrides. Generic over `I` so the daemon can wire in its live
/// tool-registry-backed invoker without this crate depending on a concrete
/// registry type.
pub struct AutoHealEngine<I> {
    invoker: Arc<I>,
    credentials: Arc<dyn CredentialAdapter>,
    network: Arc<dyn NetworkAdapter>,
    failure_log: Arc<FailureLog>,
    default_cluster: String,
    max_retries: IndexMap<String, u32>,
    sink: Option<Arc<dyn HealSink>>,
}

impl<I: ToolInvoker> AutoHealEngine<I> {
    pub fn new(
        invoker: Arc<I>,
        credentials: Arc<dyn CredentialAdapter>,
        network: Arc<dyn NetworkAdapter>,
        failure_log: Arc<FailureLog>,
        default_cluster: impl Into<String>,
    ) -> Self {
        Self {
            invoker,
            credentials,
            network,
            failure_log,
            default_cluster: default_cluster.into(),
            max_retries: IndexMap::new(),
            sink: None,
        }
    }

    /// Override `max_retries` for a specific tool name (default 1).
    pub fn set_max_retries(&mut self, tool: impl Into<String>, max_retries: u32) {
        self.max_retries.insert(tool.into(), max_retries);
    }

    /// Wire a heal-event fan-out target (typically the Event Bus). Absent a
    /// sink, the retry loop runs exactly as before.
    pub fn set_sink(&mut self, sink: Arc<dyn HealSink>) {
        self.sink = Some(sink);
    }

    fn max_retries_for(&self, tool: &str) -> u32 {
        self.max_retries.get(tool).copied().unwrap_or(DEFAULT_MAX_RETRIES)
    }

    /// Classify `body` and, if fixable, apply the mapped fix action.
    /// Returns the classification, a label for the fix attempted (if any),
    /// and whether the fix reported success.
    async fn classify_and_fix(&self, tool_name: &str, body: &str) -> (FailureClass, Option<String>, bool) {
        let class = FailureClass::classify(true, body);
        match class {
            FailureClass::Auth => {
                let cluster = infer_cluster(tool_name, body, &self.default_cluster).to_string();
                let ok = self.credentials.refresh(&cluster).await;
                (class, Some(format!("credential_refresh:{cluster}")), ok)
            }
            FailureClass::Network => {
                let ok = self.network.link_up().await;
                (class, Some("link_up".to_string()), ok)
            }
            other => (other, None, false),
        }
    }

    /// The full per-invocation algorithm (§4.6 steps 2-4) around one call
    /// already made by `invoker`: classify, fix-and-retry up to
    /// `max_retries`, log exactly one entry when the first call failed.
    async fn heal_call(&self, tool: &str, args: &Value, first_result: ToolResult, now: DateTime<Utc>) -> ToolResult {
        if !first_result.is_error() {
            return first_result;
        }

        let max = self.max_retries_for(tool);
        let mut result = first_result;
        let mut attempts = 0u32;
        let mut class = FailureClass::classify(true, &result.render());
        let mut fix_applied: Option<String> = None;

        while result.is_error() && class.is_fixable() && attempts < max {
            let body = result.render();
            let (heal_class, applied, fix_success) = self.classify_and_fix(tool, &body).await;
            if let (Some(sink), Some(action)) = (&self.sink, &applied) {
                sink.heal_triggered(tool, &heal_class.to_string(), action);
            }
            if !fix_success {
                if let (Some(sink), Some(action)) = (&self.sink, &applied) {
                    sink.heal_completed(tool, &heal_class.to_string(), action, false);
                }
                break;
            }
            fix_applied = applied;
            attempts += 1;
            result = self.invoker.invoke(tool, args.clone()).await;
            class = FailureClass::classify(result.is_error(), &result.render());
            if let (Some(sink), Some(action)) = (&self.sink, &fix_applied) {
                sink.heal_completed(tool, &class.to_string(), action, !result.is_error());
            }
        }

        let _ = self.failure_log.record(
            NewFailure {
                tool_name: tool.to_string(),
                class: class.to_string(),
                error_snippet: truncate(&result.render(), ERROR_SNIPPET_CHARS),
                fix_applied,
                success: !result.is_error(),
            },
            now,
        );

        result
    }

    /// Wrap `tool`'s handler with the full C6 algorithm, applied selectively
    /// at registration time per the Runtime Orchestrator's per-tool
    /// configuration (§4.11 step 5).
    pub fn wrap(self: &Arc<Self>, mut tool: Tool) -> Tool {
        let engine = Arc::clone(self);
        let name = tool.name.clone();
        let inner: Arc<HandlerFn> = tool.handler.clone();

        tool.handler = Arc::new(move |args: Value| {
            let engine = Arc::clone(&engine);
            let inner = Arc::clone(&inner);
            let name = name.clone();
            Box::pin(async move {
                let first_result = inner(args.clone()).await;
                engine.heal_call(&name, &args, first_result, Utc::now()).await
            })
        });
        tool
    }
}

#[async_trait]
impl<I: ToolInvoker> AutoHealer for AutoHealEngine<I> {
    /// One round for the skill engine's `on_error: auto_heal` steps: the
    /// engine has already invoked `tool` once and captured `failed`; this
    /// classifies it, applies a fix if known, retries once, and logs.
    async fn heal(&self, tool: &str, args: &Value, failed: &ToolResult) -> ToolResult {
        self.heal_call(tool, args, failed.clone(), Utc::now()).await
    }
}

#[cfg(test)]
#[path = "autoheal_tests.rs"]
mod tests;
