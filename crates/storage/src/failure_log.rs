// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The failure-pattern log backing C6 (§3, §4.6): an append-only record of
//! observed tool failures and the fix applied, with rolling daily/weekly
//! counters, persisted as `<user>/tool_failures.yaml`.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;

use fs2::FileExt;

use crate::json_store::StoreError;

/// How long a daily entry (raw record and its daily counter) is kept before
/// being pruned on the next write. Not specified numerically upstream;
/// thirty days matches the log's own weekly rollup cadence.
pub const RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub tool_name: String,
    pub class: String,
    pub error_snippet: String,
    pub fix_applied: Option<String>,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// The fields a caller supplies when recording a new failure; the log fills
/// in no further state beyond the timestamp it is given.
pub struct NewFailure {
    pub tool_name: String,
    pub class: String,
    pub error_snippet: String,
    pub fix_applied: Option<String>,
    pub success: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct FailureLogData {
    #[serde(default)]
    failures: Vec<FailureRecord>,
    #[serde(default)]
    stats: IndexMap<String, u64>,
}

fn daily_key(ts: &DateTime<Utc>) -> String {
    format!("daily:{}", ts.format("%Y-%m-%d"))
}

fn weekly_key(ts: &DateTime<Utc>) -> String {
    let iso = ts.iso_week();
    format!("weekly:{}-W{:02}", iso.year(), iso.week())
}

/// A record is a duplicate of an already-logged one when every observable
/// field matches and both fall within the same wall-clock second.
fn is_duplicate(existing: &FailureRecord, candidate: &FailureRecord) -> bool {
    existing.tool_name == candidate.tool_name
        && existing.class == candidate.class
        && existing.fix_applied == candidate.fix_applied
        && existing.success == candidate.success
        && existing.timestamp.timestamp() == candidate.timestamp.timestamp()
}

pub struct FailureLog {
    path: PathBuf,
    data: RwLock<FailureLogData>,
}

impl FailureLog {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = Self::read_from_disk(&path)?;
        Ok(Self { path, data: RwLock::new(data) })
    }

    fn read_from_disk(path: &std::path::Path) -> Result<FailureLogData, StoreError> {
        if !path.exists() {
            return Ok(FailureLogData::default());
        }
        let mut file =
            std::fs::File::open(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        match serde_yaml::from_str(&contents) {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "corrupt failure log, starting fresh");
                Ok(FailureLogData::default())
            }
        }
    }

    /// Append one failure record, update the rolling daily/weekly counters,
    /// and prune entries past [`RETENTION_DAYS`] — all under an exclusive
    /// advisory file lock, then immediately persisted.
    pub fn record(&self, entry: NewFailure, now: DateTime<Utc>) -> Result<(), StoreError> {
        let record = FailureRecord {
            tool_name: entry.tool_name,
            class: entry.class,
            error_snippet: entry.error_snippet,
            fix_applied: entry.fix_applied,
            success: entry.success,
            timestamp: now,
        };

        {
            let mut data = self.data.write();
            if data.failures.iter().any(|existing| is_duplicate(existing, &record)) {
                return Ok(());
            }
            *data.stats.entry(daily_key(&now)).or_insert(0) += 1;
            *data.stats.entry(weekly_key(&now)).or_insert(0) += 1;
            data.failures.push(record);
            prune(&mut data, now);
        }
        self.flush()
    }

    pub fn read<R>(&self, f: impl FnOnce(&[FailureRecord], &IndexMap<String, u64>) -> R) -> R {
        let data = self.data.read();
        f(&data.failures, &data.stats)
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        }
        let snapshot = self.data.read().clone();
        let yaml = serde_yaml::to_string(&snapshot)?;

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
            file.write_all(yaml.as_bytes())?;
            file.flush()
        })();
        let _ = file.unlock();
        result.map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }
}

fn prune(data: &mut FailureLogData, now: DateTime<Utc>) {
    let horizon = now - ChronoDuration::days(RETENTION_DAYS);
    data.failures.retain(|record| record.timestamp >= horizon);

    let horizon_key = daily_key(&horizon);
    data.stats.retain(|key, _| !(key.starts_with("daily:") && key.as_str() < horizon_key.as_str()));
}

#[cfg(test)]
#[path = "failure_log_tests.rs"]
mod tests;
