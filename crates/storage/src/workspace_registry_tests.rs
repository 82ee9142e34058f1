// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;
use warden_core::session::Session;

#[test]
fn get_for_ctx_falls_back_to_default_when_roots_absent() {
    let dir = tempdir().unwrap();
    let registry = WorkspaceRegistry::new(dir.path().join("workspaces.json"), "developer");
    assert_eq!(registry.get_for_ctx(None, "file:///default"), "file:///default");
    assert_eq!(registry.get_for_ctx(Some("file:///repo"), "file:///default"), "file:///repo");
}

#[test]
fn mutate_workspace_creates_on_first_access_with_default_persona() {
    let dir = tempdir().unwrap();
    let registry = WorkspaceRegistry::new(dir.path().join("workspaces.json"), "developer");
    registry.mutate_workspace("file:///repo", |ws| {
        assert_eq!(ws.persona, "developer");
    });
    registry.read_workspace("file:///repo", |ws| {
        assert!(ws.is_some());
    });
}

#[test]
fn save_then_restore_round_trips_sessions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workspaces.json");
    let registry = WorkspaceRegistry::new(&path, "developer");
    registry.mutate_workspace("file:///repo", |ws| {
        ws.add_session(Session::new("developer", 1_000));
    });
    registry.save_to_disk().unwrap();

    let restored = WorkspaceRegistry::new(&path, "developer");
    restored.restore_if_empty().unwrap();
    restored.read_workspace("file:///repo", |ws| {
        let ws = ws.expect("workspace should have been restored");
        assert_eq!(ws.sessions.len(), 1);
    });
}

#[test]
fn restore_if_empty_is_a_no_op_once_populated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workspaces.json");
    let registry = WorkspaceRegistry::new(&path, "developer");
    registry.mutate_workspace("file:///repo", |_| {});
    registry.save_to_disk().unwrap();

    // A second workspace added purely in-memory, never flushed to disk.
    registry.mutate_workspace("file:///other", |_| {});
    registry.restore_if_empty().unwrap();
    registry.read_workspace("file:///other", |ws| assert!(ws.is_some()));
}

#[test]
fn writes_within_the_throttle_window_are_skipped_until_it_elapses() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("workspaces.json");
    let registry = WorkspaceRegistry::new(&path, "developer");

    registry.mutate_workspace("file:///repo", |_| {});
    assert!(path.exists(), "first write after a quiet registry should go through immediately");

    std::fs::remove_file(&path).unwrap();
    registry.mutate_workspace("file:///repo", |ws| ws.project = Some("demo".to_string()));
    assert!(!path.exists(), "second write inside the 5s throttle window should be skipped");
}

#[test]
fn cleanup_stale_never_removes_the_active_session() {
    let dir = tempdir().unwrap();
    let registry = WorkspaceRegistry::new(dir.path().join("workspaces.json"), "developer");
    registry.mutate_workspace("file:///repo", |ws| {
        ws.add_session(Session::new("developer", 0));
    });
    let removed = registry.cleanup_stale(100_000_000, 1_000);
    assert!(removed.is_empty());
}
