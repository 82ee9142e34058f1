// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability provider traits for the external collaborators §6.5 names but
//! leaves unspecified: credential refresh and network link-up (consumed by
//! C6's fix actions) and the memory subsystem's ask/search/store/health/
//! list-adapters surface (consumed by C10 and exposed as part of the
//! protected core, §4.7).
//!
//! `warden-daemon` holds the concrete `Arc<dyn ...>` for each trait and
//! injects it into the tool handlers this crate registers; neither the
//! executor nor the registry depends on a particular adapter implementation.

use async_trait::async_trait;
use warden_core::result::ToolResult;

/// Refreshes expired or missing credentials for a named cluster (the "auth"
/// auto-heal fix action, §4.6).
#[async_trait]
pub trait CredentialAdapter: Send + Sync {
    /// Attempt to refresh credentials for `cluster`. Returns whether the
    /// cluster is authenticated afterward — a no-op success on an
    /// already-healthy cluster is expected and must return `true`.
    async fn refresh(&self, cluster: &str) -> bool;
}

/// Brings up network connectivity (the "network" auto-heal fix action, §4.6),
/// typically a VPN client.
#[async_trait]
pub trait NetworkAdapter: Send + Sync {
    /// Attempt to restore connectivity. Returns whether the network is up
    /// afterward — a no-op success when already up is expected.
    async fn link_up(&self) -> bool;
}

/// The external memory/vector-search subsystem (§1 Non-goals: out of this
/// core's scope, consumed only through this trait by C10 and the protected
/// tool set).
#[async_trait]
pub trait MemoryAdapter: Send + Sync {
    /// Answer a natural-language question against stored memory.
    async fn ask(&self, query: &str) -> ToolResult;
    /// Search stored memory, returning up to `limit` matches.
    async fn search(&self, query: &str, limit: usize) -> ToolResult;
    /// Store a key/value fact.
    async fn store(&self, key: &str, value: &str) -> ToolResult;
    /// Report whether the memory subsystem is reachable.
    async fn health(&self) -> ToolResult;
    /// List the names of the backing adapters currently configured (a
    /// memory subsystem may fan out to more than one store).
    fn list_adapters(&self) -> Vec<String>;
}
