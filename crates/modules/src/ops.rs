// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `credential_refresh` and `link_up` tools (§4.6, §6.5): the two fix
//! actions the Auto-Heal Wrapper dispatches, also exposed as ordinary
//! callable tools so an LLM can invoke them directly without waiting for a
//! failure to trigger auto-heal.

use std::sync::Arc;

use serde_json::Value;
use warden_core::registry::{ParamSpec, SourceLocation, Tier, Tool, ToolRegistry};
use warden_core::result::ToolResult;

use crate::capability::{CredentialAdapter, NetworkAdapter};

fn source(line_start: u32, line_end: u32) -> SourceLocation {
    SourceLocation { file: "warden-modules/src/ops.rs".to_string(), line_start, line_end }
}

/// Register `credential_refresh` and `link_up` under the `ops` module, tier
/// Basic — neither is part of the protected set (§4.7 names only
/// `session_start`/`persona_load`/`persona_list`/`debug`/`memory_*`), so a
/// persona switch may legitimately drop them if a persona omits `ops`.
pub fn register_ops_tools(
    registry: &mut ToolRegistry,
    credentials: Arc<dyn CredentialAdapter>,
    network: Arc<dyn NetworkAdapter>,
) -> Vec<String> {
    let mut names = Vec::new();

    registry.register(Tool {
        name: "credential_refresh".to_string(),
        module: "ops".to_string(),
        tier: Tier::Basic,
        source: source(1, 1),
        input_schema: vec![ParamSpec {
            name: "cluster".to_string(),
            type_name: "string".to_string(),
            required: true,
            description: Some("cluster label, or \"auto\" to infer from context".to_string()),
        }],
        handler: Arc::new(move |args: Value| {
            let credentials = credentials.clone();
            Box::pin(async move {
                let cluster = args.get("cluster").and_then(Value::as_str).unwrap_or("auto");
                if credentials.refresh(cluster).await {
                    ToolResult::success(format!("credentials refreshed for {cluster}"))
                } else {
                    ToolResult::warning(format!("could not refresh credentials for {cluster}"))
                }
            })
        }),
    });
    names.push("credential_refresh".to_string());

    registry.register(Tool {
        name: "link_up".to_string(),
        module: "ops".to_string(),
        tier: Tier::Basic,
        source: source(1, 1),
        input_schema: vec![],
        handler: Arc::new(move |_args: Value| {
            let network = network.clone();
            Box::pin(async move {
                if network.link_up().await {
                    ToolResult::success("network is up")
                } else {
                    ToolResult::warning("network link-up did not succeed")
                }
            })
        }),
    });
    names.push("link_up".to_string());

    names
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
