// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use warden_core::result::ToolResult;

use crate::fakes::FakeMemoryAdapter;

fn registry_with_memory(response: ToolResult, adapters: Vec<String>) -> (ToolRegistry, Arc<FakeMemoryAdapter>) {
    let memory = Arc::new(FakeMemoryAdapter::new(response, adapters));
    let mut registry = ToolRegistry::new();
    register_memory_tools(&mut registry, memory.clone());
    (registry, memory)
}

#[test]
fn registers_all_five_protected_memory_tools() {
    let (registry, _memory) = registry_with_memory(ToolResult::success("ok"), vec![]);
    let names = registry.live_names();
    for expected in ["memory_ask", "memory_search", "memory_store", "memory_health", "memory_list_adapters"] {
        assert!(names.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
async fn memory_ask_forwards_the_query_and_returns_the_adapter_response() {
    let (registry, memory) = registry_with_memory(ToolResult::success("the answer"), vec![]);
    let tool = registry.get_live("memory_ask").unwrap();
    let result = tool.invoke(json!({"query": "who owns oddjobs?"})).await;

    assert_eq!(result, ToolResult::success("the answer"));
    assert_eq!(memory.calls()[0].query_or_key, "who owns oddjobs?");
}

#[tokio::test]
async fn memory_search_defaults_limit_to_ten() {
    let (registry, memory) = registry_with_memory(ToolResult::success("found"), vec![]);
    let tool = registry.get_live("memory_search").unwrap();
    let _ = tool.invoke(json!({"query": "warden"})).await;

    assert_eq!(memory.calls()[0].op, "search");
    assert_eq!(memory.calls()[0].query_or_key, "warden");
}

#[tokio::test]
async fn memory_store_records_key_and_value() {
    let (registry, memory) = registry_with_memory(ToolResult::success("stored"), vec![]);
    let tool = registry.get_live("memory_store").unwrap();
    let _ = tool.invoke(json!({"key": "cluster", "value": "prod"})).await;

    assert_eq!(memory.calls()[0].op, "store");
    assert_eq!(memory.calls()[0].query_or_key, "cluster");
}

#[tokio::test]
async fn memory_list_adapters_joins_the_configured_names() {
    let (registry, _memory) =
        registry_with_memory(ToolResult::success("ok"), vec!["vector-db".to_string(), "notes".to_string()]);
    let tool = registry.get_live("memory_list_adapters").unwrap();
    let result = tool.invoke(json!({})).await;

    assert_eq!(result, ToolResult::success("vector-db, notes"));
}

#[test]
fn all_protected_memory_tools_are_tier_core() {
    let (registry, _memory) = registry_with_memory(ToolResult::success("ok"), vec![]);
    for name in ["memory_ask", "memory_search", "memory_store", "memory_health", "memory_list_adapters"] {
        let tool = registry.get_live(name).unwrap();
        assert_eq!(tool.tier, Tier::Core);
        assert_eq!(tool.module, "protected_core");
    }
}
