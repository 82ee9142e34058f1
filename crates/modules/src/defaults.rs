// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default capability adapters: thin wrappers over a configured external
//! command, matching the teacher's own preference for shelling out to an
//! already-authenticated CLI rather than re-implementing an auth flow
//! in-process (`crates/daemon/src/adapters/credential.rs`).
//!
//! These are the "external auth tool"/"external network tool" §6.5 names —
//! this crate only defines how the runtime calls out to them, never what
//! they do.

use async_trait::async_trait;
use tokio::process::Command;

use crate::capability::{CredentialAdapter, NetworkAdapter};

/// Runs a configured command (e.g. an `oc login` / `kubelogin` wrapper) per
/// cluster and treats a zero exit status as success.
pub struct CommandCredentialAdapter {
    program: String,
}

impl CommandCredentialAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl CredentialAdapter for CommandCredentialAdapter {
    async fn refresh(&self, cluster: &str) -> bool {
        match Command::new(&self.program).arg(cluster).output().await {
            Ok(output) => output.status.success(),
            Err(err) => {
                tracing::warn!(program = %self.program, cluster, error = %err, "credential refresh command failed to spawn");
                false
            }
        }
    }
}

/// Runs a configured command (e.g. a VPN client's `up` subcommand) and treats
/// a zero exit status as success.
pub struct CommandNetworkAdapter {
    program: String,
    args: Vec<String>,
}

impl CommandNetworkAdapter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

#[async_trait]
impl NetworkAdapter for CommandNetworkAdapter {
    async fn link_up(&self) -> bool {
        match Command::new(&self.program).args(&self.args).output().await {
            Ok(output) => output.status.success(),
            Err(err) => {
                tracing::warn!(program = %self.program, error = %err, "network link-up command failed to spawn");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
