// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `git` module's core-tier file (§3 Module: bare name → core file).
//!
//! Demonstrates the suffix-resolution rule end to end: a persona that names
//! `git` gets this file; `git_basic` and `git_extra` name
//! [`crate::git_basic`] and [`crate::git_extra`] respectively. Registration
//! is atomic per file — either every tool below registers or the caller
//! never sees a partial `git` module.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::process::Command;
use warden_core::registry::{ParamSpec, SourceLocation, Tier, Tool, ToolRegistry};
use warden_core::result::ToolResult;

fn source(line_start: u32, line_end: u32) -> SourceLocation {
    SourceLocation { file: "warden-modules/src/git_core.rs".to_string(), line_start, line_end }
}

pub(crate) async fn run_git(cwd: &PathBuf, args: &[&str]) -> ToolResult {
    match Command::new("git").args(args).current_dir(cwd).output().await {
        Ok(output) if output.status.success() => {
            ToolResult::success(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }
        Ok(output) => ToolResult::error_code(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
            warden_core::error::ErrorCode::InternalError,
        ),
        Err(err) => {
            ToolResult::error_code(format!("failed to spawn git: {err}"), warden_core::error::ErrorCode::InternalError)
        }
    }
}

/// Register the `git` module's core tier: read-only, always-safe tools.
pub fn register_tools(registry: &mut ToolRegistry, repo_root: PathBuf) -> Vec<String> {
    let mut names = Vec::new();

    {
        let repo_root = repo_root.clone();
        registry.register(Tool {
            name: "git_status".to_string(),
            module: "git".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![],
            handler: Arc::new(move |_args: Value| {
                let repo_root = repo_root.clone();
                Box::pin(async move { run_git(&repo_root, &["status", "--short", "--branch"]).await })
            }),
        });
        names.push("git_status".to_string());
    }

    {
        let repo_root = repo_root.clone();
        registry.register(Tool {
            name: "git_diff".to_string(),
            module: "git".to_string(),
            tier: Tier::Core,
            source: source(1, 1),
            input_schema: vec![ParamSpec {
                name: "staged".to_string(),
                type_name: "bool".to_string(),
                required: false,
                description: Some("show the staged diff instead of the working tree".to_string()),
            }],
            handler: Arc::new(move |args: Value| {
                let repo_root = repo_root.clone();
                Box::pin(async move {
                    let staged = args.get("staged").and_then(Value::as_bool).unwrap_or(false);
                    if staged {
                        run_git(&repo_root, &["diff", "--staged"]).await
                    } else {
                        run_git(&repo_root, &["diff"]).await
                    }
                })
            }),
        });
        names.push("git_diff".to_string());
    }

    names
}

#[cfg(test)]
#[path = "git_core_tests.rs"]
mod tests;
