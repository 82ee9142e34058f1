// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The read-mostly project configuration file (§6.3, `<project>/config.json`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::json_store::{JsonFileStore, StoreError};

/// The four configuration sections named by §6.3.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repositories: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub schedules: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub paths: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub integrations: IndexMap<String, serde_json::Value>,
}

/// Thin wrapper around [`JsonFileStore<Config>`] for the project config file.
pub struct ConfigStore {
    inner: Arc<JsonFileStore<Config>>,
}

impl ConfigStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self { inner: Arc::new(JsonFileStore::load(path.as_ref())?) })
    }

    pub fn read<R>(&self, f: impl FnOnce(&Config) -> R) -> R {
        self.inner.read(f)
    }

    pub fn mutate(&self, f: impl FnOnce(&mut Config)) {
        self.inner.mutate(f)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.inner.flush()
    }

    pub fn inner(&self) -> Arc<JsonFileStore<Config>> {
        self.inner.clone()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
