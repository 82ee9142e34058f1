// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `git` module's extra tier (§3 Module: `<name>_extra` → extra file).
//!
//! Extra-tier tools never occupy a slot in the live set a persona directly
//! exposes; the Tool Registry's manifest still knows them, so the
//! `debug(name)`-style dispatcher meta-tool can call them indirectly by name
//! (§4.4) without the LLM seeing `git_rebase`/`git_force_push` in its own
//! catalogue.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use warden_core::registry::{ParamSpec, SourceLocation, Tier, Tool, ToolRegistry};
use warden_core::result::ToolResult;

use crate::git_core::run_git;

fn source(line_start: u32, line_end: u32) -> SourceLocation {
    SourceLocation { file: "warden-modules/src/git_extra.rs".to_string(), line_start, line_end }
}

/// Register the `git` module's extra tier: history-rewriting operations.
pub fn register_tools(registry: &mut ToolRegistry, repo_root: PathBuf) -> Vec<String> {
    let mut names = Vec::new();

    {
        let repo_root = repo_root.clone();
        registry.register(Tool {
            name: "git_rebase".to_string(),
            module: "git".to_string(),
            tier: Tier::Extra,
            source: source(1, 1),
            input_schema: vec![ParamSpec {
                name: "onto".to_string(),
                type_name: "string".to_string(),
                required: true,
                description: Some("upstream ref to rebase onto".to_string()),
            }],
            handler: Arc::new(move |args: Value| {
                let repo_root = repo_root.clone();
                Box::pin(async move {
                    let Some(onto) = args.get("onto").and_then(Value::as_str) else {
                        return ToolResult::error_code(
                            "missing required argument \"onto\"",
                            warden_core::error::ErrorCode::InvalidInput,
                        );
                    };
                    run_git(&repo_root, &["rebase", onto]).await
                })
            }),
        });
        names.push("git_rebase".to_string());
    }

    {
        let repo_root = repo_root.clone();
        registry.register(Tool {
            name: "git_force_push".to_string(),
            module: "git".to_string(),
            tier: Tier::Extra,
            source: source(1, 1),
            input_schema: vec![ParamSpec {
                name: "remote".to_string(),
                type_name: "string".to_string(),
                required: false,
                description: Some("remote name, default \"origin\"".to_string()),
            }],
            handler: Arc::new(move |args: Value| {
                let repo_root = repo_root.clone();
                Box::pin(async move {
                    let remote = args.get("remote").and_then(Value::as_str).unwrap_or("origin");
                    run_git(&repo_root, &["push", "--force-with-lease", remote]).await
                })
            }),
        });
        names.push("git_force_push".to_string());
    }

    names
}

#[cfg(test)]
#[path = "git_extra_tests.rs"]
mod tests;
