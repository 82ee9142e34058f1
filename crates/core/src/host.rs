// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability interfaces the core consumes from the host protocol (§6.5),
//! kept here rather than in `warden-daemon` so that `warden_storage`'s
//! Workspace Registry callers and `warden_daemon`'s Persona Loader can both
//! depend on the trait without either depending on the concrete stdio
//! adapter that implements it.

use async_trait::async_trait;

/// Resolves the active workspace's "roots" from the host protocol (§4.3
/// `get_for_ctx`). A request context with no roots falls back to a default
/// workspace URI at the call site.
pub trait RootsProvider: Send + Sync {
    /// The first root URI advertised by the connected client, if any.
    fn list_roots(&self) -> Vec<String>;
}

/// Pushes a protocol-level notification to the connected host client, used
/// by the Persona Loader (C7) to announce `tool_list_changed` after a switch.
#[async_trait]
pub trait HostNotifier: Send + Sync {
    async fn send_notification(&self, kind: &str, payload: serde_json::Value);
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
