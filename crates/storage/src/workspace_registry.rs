// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Workspace Registry (C3, §4.3): a process-singleton ordered map of
//! workspace URI to [`Workspace`], persisted to a single JSON file with its
//! own 5 s write throttle, separate from C2's debounce.

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use fs2::FileExt;
use warden_core::session::SessionId;
use warden_core::workspace::Workspace;

use crate::json_store::StoreError;

pub const WRITE_THROTTLE: Duration = Duration::from_secs(5);

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct RegistrySnapshot {
    #[serde(default)]
    workspaces: IndexMap<String, Workspace>,
}

pub struct WorkspaceRegistry {
    path: PathBuf,
    default_persona: String,
    workspaces: RwLock<IndexMap<String, Workspace>>,
    last_write: Mutex<Option<Instant>>,
}

impl WorkspaceRegistry {
    pub fn new(path: impl Into<PathBuf>, default_persona: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_persona: default_persona.into(),
            workspaces: RwLock::new(IndexMap::new()),
            last_write: Mutex::new(None),
        }
    }

    /// Extracts the workspace URI from a host-protocol "roots" query,
    /// falling back to `default_uri` when the context carries none.
    pub fn get_for_ctx(&self, roots: Option<&str>, default_uri: &str) -> String {
        roots.unwrap_or(default_uri).to_string()
    }

    /// Run `f` against the workspace for `uri`, creating it (with the
    /// registry's default persona) first if it doesn't yet exist.
    pub fn mutate_workspace<R>(&self, uri: &str, f: impl FnOnce(&mut Workspace) -> R) -> R {
        let mut workspaces = self.workspaces.write();
        let workspace = workspaces
            .entry(uri.to_string())
            .or_insert_with(|| Workspace::new(uri, self.default_persona.clone()));
        let result = f(workspace);
        drop(workspaces);
        self.maybe_write_throttled();
        result
    }

    pub fn read_workspace<R>(&self, uri: &str, f: impl FnOnce(Option<&Workspace>) -> R) -> R {
        f(self.workspaces.read().get(uri))
    }

    /// Remove sessions past `threshold_ms` across every workspace, never
    /// removing a workspace's active session.
    pub fn cleanup_stale(&self, now_ms: u64, threshold_ms: u64) -> Vec<SessionId> {
        let mut removed = Vec::new();
        {
            let mut workspaces = self.workspaces.write();
            for workspace in workspaces.values_mut() {
                removed.extend(workspace.cleanup_stale(now_ms, threshold_ms));
            }
        }
        if !removed.is_empty() {
            self.maybe_write_throttled();
        }
        removed
    }

    fn maybe_write_throttled(&self) {
        let mut last = self.last_write.lock();
        let should_write = match *last {
            None => true,
            Some(at) => at.elapsed() >= WRITE_THROTTLE,
        };
        if should_write {
            let _ = self.save_to_disk();
            *last = Some(Instant::now());
        }
    }

    /// Serialize the full registry to disk immediately, bypassing the
    /// throttle. Called at shutdown and by `maybe_write_throttled`.
    pub fn save_to_disk(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        }
        let snapshot = RegistrySnapshot { workspaces: self.workspaces.read().clone() };
        let json = serde_json::to_vec_pretty(&snapshot)?;

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        file.lock_exclusive().map_err(|source| StoreError::Io { path: self.path.clone(), source })?;

        let result = (|| -> std::io::Result<()> {
            let mut file = &file;
            file.set_len(0)?;
            use std::io::Seek;
            file.seek(std::io::SeekFrom::Start(0))?;
            file.write_all(&json)?;
            file.flush()
        })();
        let _ = file.unlock();
        result.map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }

    /// Load from disk if the in-memory map is empty. Called once at boot.
    pub fn restore_if_empty(&self) -> Result<(), StoreError> {
        if !self.workspaces.read().is_empty() {
            return Ok(());
        }
        if !self.path.exists() {
            return Ok(());
        }
        let mut file =
            std::fs::File::open(&self.path).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&contents)?;
        *self.workspaces.write() = snapshot.workspaces;
        Ok(())
    }
}

#[cfg(test)]
#[path = "workspace_registry_tests.rs"]
mod tests;
