// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal stdio tools-over-JSON adapter standing in for "the real host
//! protocol" (§6.1, §1 scope boundary). Frames on newlines rather than the
//! length-prefixed scheme `warden_wire::framing` uses for the Event Bus,
//! since line-delimited JSON is the idiomatic shape for a stdio tool
//! protocol of this kind. This module is explicitly a stand-in: the core
//! depends only on [`warden_core::host::HostNotifier`] and
//! [`warden_core::host::RootsProvider`], never on this wire format.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex as AsyncMutex;

use warden_core::host::{HostNotifier, RootsProvider};
use warden_core::registry::{ParamSpec, ToolRegistry};
use warden_core::result::ToolResult;
use warden_engine::traits::ToolInvoker;

/// One request the connected client may send, tagged by `op`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Fetch the current tool catalogue (§6.1 "advertises a named tool catalogue").
    ListTools,
    /// Invoke a named tool with JSON arguments, returning its rendered result.
    CallTool { name: String, args: serde_json::Value },
    /// Push the client's current workspace roots, cached for [`RootsProvider`].
    SetRoots { roots: Vec<String> },
    /// Run a named skill (C9) to completion and return its outputs.
    RunSkill {
        name: String,
        #[serde(default)]
        inputs: indexmap::IndexMap<String, serde_json::Value>,
    },
}

/// One line the server writes back, tagged by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Tools { tools: Vec<ToolDescriptor> },
    ToolResult { result: String },
    SkillResult { name: String, success: bool, outputs: serde_json::Value, error: Option<String> },
    Ack,
    Error { message: String },
}

/// Runs a named skill to completion, decoupling this adapter from the
/// concrete `warden_engine::Executor` type parameters the orchestrator
/// wires up (skill dir, invoker, event sink, confirmations, auto-heal,
/// clock) — the same reason [`ToolInvoker`] exists instead of a concrete
/// registry type here.
#[async_trait]
pub trait SkillRunner: Send + Sync {
    async fn run(&self, name: &str, inputs: indexmap::IndexMap<String, serde_json::Value>) -> SkillRunOutcome;
}

/// The result of one [`SkillRunner::run`] call, already shaped for [`Response::SkillResult`].
pub struct SkillRunOutcome {
    pub success: bool,
    pub outputs: serde_json::Value,
    pub error: Option<String>,
}

/// A tool's catalogue entry as the client sees it: name, description, and
/// input schema, but never its source location or handler (§6.1).
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub module: String,
    pub tier: String,
    pub input_schema: Vec<ParamDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub type_name: String,
    pub required: bool,
    pub description: Option<String>,
}

impl From<&ParamSpec> for ParamDescriptor {
    fn from(p: &ParamSpec) -> Self {
        Self { name: p.name.clone(), type_name: p.type_name.clone(), required: p.required, description: p.description.clone() }
    }
}

fn describe_live_tools(registry: &ToolRegistry) -> Vec<ToolDescriptor> {
    registry
        .live_names()
        .into_iter()
        .filter_map(|name| registry.get_live(&name).map(describe))
        .collect()
}

fn describe(tool: &warden_core::registry::Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.clone(),
        module: tool.module.clone(),
        tier: tool.tier.to_string(),
        input_schema: tool.input_schema.iter().map(ParamDescriptor::from).collect(),
    }
}

/// Implements the two capability interfaces the core consumes (§6.5) over a
/// single, serialized stdio write path: `list_roots` answers from the last
/// `set_roots` the client pushed, and `send_notification` writes an
/// out-of-band JSON line.
pub struct StdioProtocol<W> {
    roots: Mutex<Vec<String>>,
    writer: AsyncMutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> StdioProtocol<W> {
    pub fn new(writer: W) -> Self {
        Self { roots: Mutex::new(Vec::new()), writer: AsyncMutex::new(writer) }
    }

    pub(crate) async fn write_line(&self, value: &impl Serialize) -> std::io::Result<()> {
        let mut line = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
        line.push('\n');
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await
    }

    fn set_roots(&self, roots: Vec<String>) {
        *self.roots.lock() = roots;
    }
}

impl<W: Send + Sync> RootsProvider for StdioProtocol<W> {
    fn list_roots(&self) -> Vec<String> {
        self.roots.lock().clone()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> HostNotifier for StdioProtocol<W> {
    async fn send_notification(&self, kind: &str, payload: serde_json::Value) {
        let line = serde_json::json!({"type": kind, "payload": payload});
        if let Err(err) = self.write_line(&line).await {
            tracing::warn!(error = %err, "failed to write host-protocol notification");
        }
    }
}

/// Drain `reader` line by line, dispatching each [`Request`] against the
/// live registry and writing a [`Response`] line through `protocol`. Returns
/// once the reader reaches EOF (the client closed stdin) — the normal
/// shutdown trigger for this adapter (§4.11 "enter the host-protocol loop").
pub async fn serve<R, W, I, S>(
    mut reader: R,
    protocol: Arc<StdioProtocol<W>>,
    registry: Arc<RwLock<ToolRegistry>>,
    invoker: Arc<I>,
    skills: Arc<S>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send,
    I: ToolInvoker,
    S: SkillRunner,
{
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(trimmed) {
            Ok(Request::ListTools) => Response::Tools { tools: describe_live_tools(&registry.read()) },
            Ok(Request::CallTool { name, args }) => {
                let result: ToolResult = invoker.invoke(&name, args).await;
                Response::ToolResult { result: result.render() }
            }
            Ok(Request::SetRoots { roots }) => {
                protocol.set_roots(roots);
                Response::Ack
            }
            Ok(Request::RunSkill { name, inputs }) => {
                let outcome = skills.run(&name, inputs).await;
                Response::SkillResult { name, success: outcome.success, outputs: outcome.outputs, error: outcome.error }
            }
            Err(err) => Response::Error { message: format!("malformed request: {err}") },
        };

        if let Err(err) = protocol.write_line(&response).await {
            return Err(err);
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
