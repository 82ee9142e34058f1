// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Tool Registry's runtime machinery: debug wrapping (C5), auto-heal
//! wrapping (C6), and the persona switch algorithm (C7), all layered over
//! the plain [`warden_core::registry::ToolRegistry`] data structure shared
//! with the skill engine.

pub mod autoheal;
pub mod debug;
pub mod persona_loader;

pub use autoheal::{AutoHealEngine, HealSink, DEFAULT_MAX_RETRIES};
pub use debug::{DebugError, DebugWrapper, ToolTelemetry};
pub use persona_loader::{ModuleRegistrar, PersonaLoadError, PersonaLoader, PersonaSwitchOutcome};

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use warden_core::registry::ToolRegistry;
use warden_core::result::ToolResult;
use warden_engine::traits::ToolInvoker;

/// Looks a tool up in the live registry and invokes it — the
/// [`ToolInvoker`] the skill engine and the auto-heal wrapper both dial
/// through, over the same `Arc<RwLock<ToolRegistry>>` the persona loader
/// mutates.
pub struct RegistryInvoker {
    registry: Arc<RwLock<ToolRegistry>>,
}

impl RegistryInvoker {
    pub fn new(registry: Arc<RwLock<ToolRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ToolInvoker for RegistryInvoker {
    async fn invoke(&self, tool: &str, args: Value) -> ToolResult {
        let handler = {
            let registry = self.registry.read();
            match registry.get_live(tool) {
                Some(tool) => tool.handler.clone(),
                None => {
                    return ToolResult::error_code(
                        format!("tool {tool:?} is not currently loaded"),
                        warden_core::error::ErrorCode::NotFound,
                    )
                }
            }
        };
        handler(args).await
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
