// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared singleton/debounce/locking machinery behind the Config and
//! State stores (C2). Both stores are files with: cross-process-consistent
//! reads (mtime check before serving), debounced coalesced writes under an
//! exclusive advisory lock, and corrupt-file quarantine on load.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use fs2::FileExt;
use parking_lot::{Mutex, RwLock};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Notify;

/// Errors from reading, writing, or flushing a [`JsonFileStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to serialize store contents as yaml: {0}")]
    SerializeYaml(#[from] serde_yaml::Error),
}

/// A JSON file backing a shared, debounced, cross-process-locked value.
pub struct JsonFileStore<T> {
    path: PathBuf,
    cache: RwLock<T>,
    last_mtime: Mutex<Option<SystemTime>>,
    dirty: AtomicBool,
    notify: Notify,
}

impl<T> JsonFileStore<T>
where
    T: Default + Clone + Serialize + DeserializeOwned,
{
    /// Load the store from `path`, seeding the default skeleton if the file
    /// is absent. A corrupt file is moved aside with a timestamp suffix and
    /// replaced by the default.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let (value, mtime) = Self::read_from_disk(&path)?;
        Ok(Self {
            path,
            cache: RwLock::new(value),
            last_mtime: Mutex::new(mtime),
            dirty: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }

    fn read_from_disk(path: &Path) -> Result<(T, Option<SystemTime>), StoreError> {
        if !path.exists() {
            return Ok((T::default(), None));
        }
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let mut file =
            std::fs::File::open(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;

        match serde_json::from_str(&contents) {
            Ok(value) => Ok((value, mtime)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "corrupt store file, quarantining");
                Self::quarantine(path)?;
                Ok((T::default(), None))
            }
        }
    }

    fn quarantine(path: &Path) -> Result<(), StoreError> {
        let ts = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let backup = path.with_extension(format!("corrupt-{ts}.bak"));
        std::fs::rename(path, &backup).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        Ok(())
    }

    /// Read-through with cross-process consistency: if the on-disk mtime has
    /// advanced past what we last observed, re-read under lock before
    /// serving the callback.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.reload_if_stale();
        f(&self.cache.read())
    }

    fn reload_if_stale(&self) {
        let on_disk_mtime = std::fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        let mut last = self.last_mtime.lock();
        if on_disk_mtime > *last {
            if let Ok((value, mtime)) = Self::read_from_disk(&self.path) {
                *self.cache.write() = value;
                *last = mtime;
            }
        }
    }

    /// Apply a mutation, mark the cache dirty, and wake the debounce
    /// flusher. Does not write to disk itself.
    pub fn mutate(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.cache.write());
        self.dirty.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Force an immediate write under an exclusive OS-level advisory lock.
    /// On I/O failure, the dirty flag is left set so the next attempt retries.
    pub fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        }
        let snapshot = self.cache.read().clone();
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

        result.map_err(|source| StoreError::Io { path: self.path.clone(), source })?;

        *self.last_mtime.lock() = std::fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        self.dirty.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Wait (without blocking a thread) for the debounce window to elapse
    /// since the last dirty signal, then flush, looping forever. Intended to
    /// be spawned once as a background task at boot.
    pub async fn run_debounce_loop(self: Arc<Self>, window: Duration) {
        loop {
            self.notify.notified().await;
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(window) => break,
                    _ = self.notify.notified() => continue,
                }
            }
            if let Err(err) = self.flush() {
                tracing::error!(error = %err, "debounced flush failed, will retry on next write");
            }
        }
    }
}

#[cfg(test)]
#[path = "json_store_tests.rs"]
mod tests;
