// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability traits the executor is generic over (§9 "Async control flow /
//! confirmations"). `warden-daemon` supplies concrete implementations wired
//! to the live Tool Registry, Event Bus, and Auto-Heal Wrapper; tests in
//! this crate supply fakes so the state machine in [`crate::executor`] is
//! exercised without a running daemon.

use async_trait::async_trait;
use indexmap::IndexMap;
use warden_core::event::ExecutionId;
use warden_core::result::ToolResult;

/// Invokes a tool by name through the Tool Registry (C4).
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(&self, tool: &str, args: serde_json::Value) -> ToolResult;
}

/// Fans execution/step events out to the Event Bus (C8).
///
/// Plain data rather than `warden_wire::Event` so this crate does not need a
/// dependency on the wire crate; `warden-daemon` adapts these calls onto the
/// wire envelope when forwarding to connected clients.
pub trait EventSink: Send + Sync {
    fn skill_started(&self, id: ExecutionId, name: &str, step_count: usize, inputs: &IndexMap<String, serde_json::Value>);
    fn skill_completed(&self, id: ExecutionId, name: &str, step_count: usize, duration_secs: f64);
    fn skill_failed(&self, id: ExecutionId, name: &str, step_count: usize, duration_secs: f64, error: &str);
    fn step_started(&self, id: ExecutionId, step_index: usize, name: &str);
    fn step_completed(&self, id: ExecutionId, step_index: usize, name: &str, duration_secs: f64);
    fn step_failed(&self, id: ExecutionId, step_index: usize, name: &str, duration_secs: f64, error: &str);
    fn step_skipped(&self, id: ExecutionId, step_index: usize, name: &str);
}

/// Requests a synchronous confirmation from the Event Bus (§4.8 confirmation flow).
#[async_trait]
pub trait ConfirmationSource: Send + Sync {
    /// Resolves with the client's response, or `default` on timeout.
    async fn request_confirmation(
        &self,
        skill_id: ExecutionId,
        step_index: usize,
        prompt: &str,
        options: &[String],
        default: &str,
        timeout_secs: u64,
    ) -> String;
}

/// Delegates a single auto-heal round to the Auto-Heal Wrapper (C6) for a
/// step whose `on_error` is `auto_heal`.
#[async_trait]
pub trait AutoHealer: Send + Sync {
    /// Attempts one classify-fix-retry round and returns the resulting
    /// [`ToolResult`] (which may still be an error if the fix did not apply
    /// or the retry failed again).
    async fn heal(&self, tool: &str, args: &serde_json::Value, failed: &ToolResult) -> ToolResult;
}
