// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::{Deserialize, Serialize};
use serial_test::serial;
use std::time::Duration as StdDuration;
use tempfile::tempdir;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    counter: u64,
    label: String,
}

#[test]
fn load_seeds_default_when_file_absent() {
    let dir = tempdir().unwrap();
    let store: JsonFileStore<Sample> = JsonFileStore::load(dir.path().join("sample.json")).unwrap();
    assert_eq!(store.read(|s| s.clone()), Sample::default());
}

#[test]
fn mutate_then_flush_persists_to_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    let store: JsonFileStore<Sample> = JsonFileStore::load(&path).unwrap();

    store.mutate(|s| {
        s.counter = 7;
        s.label = "seven".to_string();
    });
    assert!(store.is_dirty());
    store.flush().unwrap();
    assert!(!store.is_dirty());

    let reloaded: JsonFileStore<Sample> = JsonFileStore::load(&path).unwrap();
    assert_eq!(reloaded.read(|s| s.clone()), Sample { counter: 7, label: "seven".to_string() });
}

#[test]
fn corrupt_file_is_quarantined_and_default_is_served() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    std::fs::write(&path, b"not valid json {{{").unwrap();

    let store: JsonFileStore<Sample> = JsonFileStore::load(&path).unwrap();
    assert_eq!(store.read(|s| s.clone()), Sample::default());

    let quarantined: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1);
}

#[test]
fn read_reloads_when_an_external_process_modifies_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    let store: JsonFileStore<Sample> = JsonFileStore::load(&path).unwrap();
    store.mutate(|s| s.counter = 1);
    store.flush().unwrap();

    // Simulate another process writing a newer value directly to disk.
    std::thread::sleep(StdDuration::from_millis(10));
    std::fs::write(&path, serde_json::to_vec(&Sample { counter: 99, label: String::new() }).unwrap()).unwrap();

    assert_eq!(store.read(|s| s.counter), 99);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn burst_of_writes_within_debounce_window_coalesce_to_one_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    let store = Arc::new(JsonFileStore::<Sample>::load(&path).unwrap());

    let flusher = tokio::spawn(store.clone().run_debounce_loop(StdDuration::from_secs(2)));

    for i in 0..50u64 {
        store.mutate(|s| s.counter = i);
        tokio::time::advance(StdDuration::from_millis(10)).await;
    }
    assert!(!path.exists(), "no flush should have happened yet, window kept extending");

    tokio::time::advance(StdDuration::from_secs(3)).await;
    tokio::task::yield_now().await;

    assert!(path.exists());
    let on_disk: Sample = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk.counter, 49);

    flusher.abort();
}
