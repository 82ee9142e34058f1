// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mutable, debounced runtime state file (§6.3, `<user>/state.json`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::json_store::{JsonFileStore, StoreError};

const SERVICE_ENABLED_SECTION: &str = "service_enabled";
const JOB_ENABLED_SECTION: &str = "job_enabled";

/// A flat namespaced map, sectioned by convention (e.g. `service_enabled`,
/// `job_enabled`); unrecognized sections pass through unexamined.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub sections: IndexMap<String, IndexMap<String, serde_json::Value>>,
}

impl State {
    pub fn get(&self, section: &str, key: &str) -> Option<&serde_json::Value> {
        self.sections.get(section)?.get(key)
    }

    pub fn set(&mut self, section: &str, key: &str, value: serde_json::Value) {
        self.sections.entry(section.to_string()).or_default().insert(key.to_string(), value);
    }

    pub fn service_enabled(&self, name: &str) -> bool {
        self.get(SERVICE_ENABLED_SECTION, name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn set_service_enabled(&mut self, name: &str, enabled: bool) {
        self.set(SERVICE_ENABLED_SECTION, name, serde_json::Value::Bool(enabled));
    }

    pub fn job_enabled(&self, name: &str) -> bool {
        self.get(JOB_ENABLED_SECTION, name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn set_job_enabled(&mut self, name: &str, enabled: bool) {
        self.set(JOB_ENABLED_SECTION, name, serde_json::Value::Bool(enabled));
    }
}

/// Debounce window for state writes (§3): further writes extend it.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(2);

/// Thin wrapper around [`JsonFileStore<State>`] adding the service/job
/// convenience accessors C2 calls for.
pub struct StateStore {
    inner: Arc<JsonFileStore<State>>,
}

impl StateStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self { inner: Arc::new(JsonFileStore::load(path.as_ref())?) })
    }

    pub fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        self.inner.read(f)
    }

    pub fn set(&self, section: &str, key: &str, value: serde_json::Value) {
        self.inner.mutate(|s| s.set(section, key, value));
    }

    pub fn service_enabled(&self, name: &str) -> bool {
        self.inner.read(|s| s.service_enabled(name))
    }

    pub fn set_service_enabled(&self, name: &str, enabled: bool) {
        self.inner.mutate(|s| s.set_service_enabled(name, enabled));
    }

    pub fn job_enabled(&self, name: &str) -> bool {
        self.inner.read(|s| s.job_enabled(name))
    }

    pub fn set_job_enabled(&self, name: &str, enabled: bool) {
        self.inner.mutate(|s| s.set_job_enabled(name, enabled));
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.inner.flush()
    }

    /// Spawn the background debounce flusher, run as a boot-time task.
    pub fn spawn_debounce_flusher(&self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.inner.clone().run_debounce_loop(DEBOUNCE_WINDOW))
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
