// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake capability adapters for other crates' tests, gated the same way the
//! teacher gates its `FakeNotifyAdapter` (`crates/adapters/src/notify.rs`):
//! a module visible under `cfg(test)` or the `test-support` feature.

#![cfg(any(test, feature = "test-support"))]

use async_trait::async_trait;
use parking_lot::Mutex;
use warden_core::result::ToolResult;

use crate::capability::{CredentialAdapter, MemoryAdapter, NetworkAdapter};

/// Records `refresh` calls and always answers with a configured outcome.
pub struct FakeCredentialAdapter {
    calls: Mutex<Vec<String>>,
    succeeds: bool,
}

impl FakeCredentialAdapter {
    pub fn new(succeeds: bool) -> Self {
        Self { calls: Mutex::new(Vec::new()), succeeds }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CredentialAdapter for FakeCredentialAdapter {
    async fn refresh(&self, cluster: &str) -> bool {
        self.calls.lock().push(cluster.to_string());
        self.succeeds
    }
}

/// Records `link_up` calls and always answers with a configured outcome.
pub struct FakeNetworkAdapter {
    call_count: Mutex<u32>,
    succeeds: bool,
}

impl FakeNetworkAdapter {
    pub fn new(succeeds: bool) -> Self {
        Self { call_count: Mutex::new(0), succeeds }
    }

    pub fn call_count(&self) -> u32 {
        *self.call_count.lock()
    }
}

#[async_trait]
impl NetworkAdapter for FakeNetworkAdapter {
    async fn link_up(&self) -> bool {
        *self.call_count.lock() += 1;
        self.succeeds
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCall {
    pub op: &'static str,
    pub query_or_key: String,
}

/// A scripted memory adapter: every call is recorded and every response is
/// fixed at construction, mirroring the teacher's `FakeNotifyAdapter`.
pub struct FakeMemoryAdapter {
    calls: Mutex<Vec<MemoryCall>>,
    response: ToolResult,
    adapters: Vec<String>,
}

impl FakeMemoryAdapter {
    pub fn new(response: ToolResult, adapters: Vec<String>) -> Self {
        Self { calls: Mutex::new(Vec::new()), response, adapters }
    }

    pub fn calls(&self) -> Vec<MemoryCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MemoryAdapter for FakeMemoryAdapter {
    async fn ask(&self, query: &str) -> ToolResult {
        self.calls.lock().push(MemoryCall { op: "ask", query_or_key: query.to_string() });
        self.response.clone()
    }

    async fn search(&self, query: &str, _limit: usize) -> ToolResult {
        self.calls.lock().push(MemoryCall { op: "search", query_or_key: query.to_string() });
        self.response.clone()
    }

    async fn store(&self, key: &str, _value: &str) -> ToolResult {
        self.calls.lock().push(MemoryCall { op: "store", query_or_key: key.to_string() });
        self.response.clone()
    }

    async fn health(&self) -> ToolResult {
        self.calls.lock().push(MemoryCall { op: "health", query_or_key: String::new() });
        self.response.clone()
    }

    fn list_adapters(&self) -> Vec<String> {
        self.adapters.clone()
    }
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
