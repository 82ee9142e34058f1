// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The memory-backed slice of the protected core tool set (§4.7): `memory_ask`,
//! `memory_search`, `memory_store`, `memory_health`, `memory_list_adapters`.
//!
//! The other protected names — `session_start`, `persona_load`,
//! `persona_list`, `debug` — need live access to the Workspace Registry and
//! Persona Loader and are registered directly by `warden-daemon`, which
//! already depends on this crate; putting them here would create a cycle.
//! This module only grounds the registration *contract* (§6.5
//! `register_tools(registry) → int`) for the part that is a pure capability
//! wrapper.

use std::sync::Arc;

use serde_json::Value;
use warden_core::registry::{ParamSpec, SourceLocation, Tier, Tool, ToolRegistry};

use crate::capability::MemoryAdapter;

const SOURCE_FILE: &str = "warden-modules/src/protected.rs";

fn source(line_start: u32, line_end: u32) -> SourceLocation {
    SourceLocation { file: SOURCE_FILE.to_string(), line_start, line_end }
}

fn param(name: &str, type_name: &str, required: bool, description: &str) -> ParamSpec {
    ParamSpec {
        name: name.to_string(),
        type_name: type_name.to_string(),
        required,
        description: Some(description.to_string()),
    }
}

/// Register the memory-backed protected tools against `registry`, returning
/// the names added. Re-registering (e.g. across persona switches) simply
/// replaces the previous entries — the protected set survives every switch
/// by construction, since the caller never unregisters these names.
pub fn register_memory_tools(registry: &mut ToolRegistry, memory: Arc<dyn MemoryAdapter>) -> Vec<String> {
    let mut names = Vec::new();

    {
        let memory = memory.clone();
        registry.register(Tool {
            name: "memory_ask".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![param("query", "string", true, "natural-language question")],
            handler: Arc::new(move |args: Value| {
                let memory = memory.clone();
                Box::pin(async move {
                    let query = args.get("query").and_then(Value::as_str).unwrap_or_default();
                    memory.ask(query).await
                })
            }),
        });
        names.push("memory_ask".to_string());
    }

    {
        let memory = memory.clone();
        registry.register(Tool {
            name: "memory_search".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![
                param("query", "string", true, "search text"),
                param("limit", "int", false, "max matches, default 10"),
            ],
            handler: Arc::new(move |args: Value| {
                let memory = memory.clone();
                Box::pin(async move {
                    let query = args.get("query").and_then(Value::as_str).unwrap_or_default();
                    let limit = args.get("limit").and_then(Value::as_u64).unwrap_or(10) as usize;
                    memory.search(query, limit).await
                })
            }),
        });
        names.push("memory_search".to_string());
    }

    {
        let memory = memory.clone();
        registry.register(Tool {
            name: "memory_store".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![
                param("key", "string", true, "fact key"),
                param("value", "string", true, "fact value"),
            ],
            handler: Arc::new(move |args: Value| {
                let memory = memory.clone();
                Box::pin(async move {
                    let key = args.get("key").and_then(Value::as_str).unwrap_or_default();
                    let value = args.get("value").and_then(Value::as_str).unwrap_or_default();
                    memory.store(key, value).await
                })
            }),
        });
        names.push("memory_store".to_string());
    }

    {
        let memory = memory.clone();
        registry.register(Tool {
            name: "memory_health".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![],
            handler: Arc::new(move |_args: Value| {
                let memory = memory.clone();
                Box::pin(async move { memory.health().await })
            }),
        });
        names.push("memory_health".to_string());
    }

    {
        let memory = memory.clone();
        registry.register(Tool {
            name: "memory_list_adapters".to_string(),
            module: "protected_core".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![],
            handler: Arc::new(move |_args: Value| {
                let memory = memory.clone();
                Box::pin(async move {
                    let adapters = memory.list_adapters();
                    warden_core::result::ToolResult::success(adapters.join(", "))
                })
            }),
        });
        names.push("memory_list_adapters".to_string());
    }

    names
}

#[cfg(test)]
#[path = "protected_tests.rs"]
mod tests;
