// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `git` module's basic tier (§3 Module: `<name>_basic` → basic file).
//! Mutating but routine operations a persona opts into alongside the core
//! tier.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use warden_core::registry::{ParamSpec, SourceLocation, Tier, Tool, ToolRegistry};
use warden_core::result::ToolResult;

use crate::git_core::run_git;

fn source(line_start: u32, line_end: u32) -> SourceLocation {
    SourceLocation { file: "warden-modules/src/git_basic.rs".to_string(), line_start, line_end }
}

/// Register the `git` module's basic tier: branch creation and committing.
pub fn register_tools(registry: &mut ToolRegistry, repo_root: PathBuf) -> Vec<String> {
    let mut names = Vec::new();

    {
        let repo_root = repo_root.clone();
        registry.register(Tool {
            name: "git_create_branch".to_string(),
            module: "git".to_string(),
            tier: Tier::Basic,
            source: source(1, 1),
            input_schema: vec![ParamSpec {
                name: "name".to_string(),
                type_name: "string".to_string(),
                required: true,
                description: Some("new branch name".to_string()),
            }],
            handler: Arc::new(move |args: Value| {
                let repo_root = repo_root.clone();
                Box::pin(async move {
                    let Some(name) = args.get("name").and_then(Value::as_str) else {
                        return ToolResult::error_code(
                            "missing required argument \"name\"",
                            warden_core::error::ErrorCode::InvalidInput,
                        );
                    };
                    run_git(&repo_root, &["checkout", "-b", name]).await
                })
            }),
        });
        names.push("git_create_branch".to_string());
    }

    {
        let repo_root = repo_root.clone();
        registry.register(Tool {
            name: "git_commit".to_string(),
            module: "git".to_string(),
            tier: Tier::Basic,
            source: source(1, 1),
            input_schema: vec![ParamSpec {
                name: "message".to_string(),
                type_name: "string".to_string(),
                required: true,
                description: Some("commit message".to_string()),
            }],
            handler: Arc::new(move |args: Value| {
                let repo_root = repo_root.clone();
                Box::pin(async move {
                    let Some(message) = args.get("message").and_then(Value::as_str) else {
                        return ToolResult::error_code(
                            "missing required argument \"message\"",
                            warden_core::error::ErrorCode::InvalidInput,
                        );
                    };
                    run_git(&repo_root, &["commit", "-am", message]).await
                })
            }),
        });
        names.push("git_commit".to_string());
    }

    names
}

#[cfg(test)]
#[path = "git_basic_tests.rs"]
mod tests;
