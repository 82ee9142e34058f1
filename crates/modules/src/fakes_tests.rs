// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_credential_adapter_records_every_cluster_it_was_asked_about() {
    let adapter = FakeCredentialAdapter::new(true);
    assert!(adapter.refresh("stage").await);
    assert!(adapter.refresh("prod").await);
    assert_eq!(adapter.calls(), vec!["stage".to_string(), "prod".to_string()]);
}

#[tokio::test]
async fn fake_network_adapter_counts_calls() {
    let adapter = FakeNetworkAdapter::new(false);
    assert!(!adapter.link_up().await);
    assert!(!adapter.link_up().await);
    assert_eq!(adapter.call_count(), 2);
}

#[tokio::test]
async fn fake_memory_adapter_records_op_and_key_per_call() {
    let adapter = FakeMemoryAdapter::new(ToolResult::success("ok"), vec!["notes".to_string()]);
    let _ = adapter.ask("who?").await;
    let _ = adapter.store("k", "v").await;

    let calls = adapter.calls();
    assert_eq!(calls[0].op, "ask");
    assert_eq!(calls[0].query_or_key, "who?");
    assert_eq!(calls[1].op, "store");
    assert_eq!(calls[1].query_or_key, "k");
    assert_eq!(adapter.list_adapters(), vec!["notes".to_string()]);
}
