// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the Skill Engine's execution state machine (`warden_engine::Executor`)
//! to the live Tool Registry, Event Bus, and Auto-Heal Wrapper so the
//! host-protocol adapter's `RunSkill` request (§6.1, §4.9) can run a named
//! skill to completion.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use warden_core::clock::SystemClock;
use warden_core::event::ExecutionId;
use warden_core::skill::ExecutionStatus;
use warden_engine::{Executor, RuntimeContext};
use warden_storage::ConfigStore;

use crate::event_bus::EventBus;
use crate::protocol::{SkillRunOutcome, SkillRunner};
use crate::registry::{AutoHealEngine, RegistryInvoker};

/// The concrete executor type this daemon wires up: a live-registry
/// invoker, the Event Bus doing double duty as event sink and confirmation
/// source, the Auto-Heal Wrapper as the `on_error: auto_heal` delegate, and
/// the real system clock.
type DaemonExecutor = Executor<RegistryInvoker, EventBus, EventBus, AutoHealEngine<RegistryInvoker>, SystemClock>;

/// Implements [`SkillRunner`] for `warden-daemon`'s protocol adapter (§6.1
/// `RunSkill`), loading the skill by name from the fixed skills directory
/// (§4.9 Loading) and assembling the `environment`/`config` template
/// namespaces from the process environment and the project config store.
pub struct DaemonSkillRunner {
    skills_dir: PathBuf,
    executor: DaemonExecutor,
    config_store: Arc<ConfigStore>,
}

impl DaemonSkillRunner {
    pub fn new(
        skills_dir: PathBuf,
        invoker: Arc<RegistryInvoker>,
        event_bus: Arc<EventBus>,
        autoheal: Arc<AutoHealEngine<RegistryInvoker>>,
        config_store: Arc<ConfigStore>,
    ) -> Self {
        let executor = Executor::new(invoker, Arc::clone(&event_bus), event_bus, autoheal, SystemClock);
        Self { skills_dir, executor, config_store }
    }

    /// Flatten the project config's four sections into the single
    /// `config.*` namespace templates read from (§4.9 Templating).
    fn runtime_context(&self) -> RuntimeContext {
        let mut config = serde_json::Map::new();
        self.config_store.read(|cfg| {
            config.insert("repositories".to_string(), serde_json::to_value(&cfg.repositories).unwrap_or_default());
            config.insert("schedules".to_string(), serde_json::to_value(&cfg.schedules).unwrap_or_default());
            config.insert("paths".to_string(), serde_json::to_value(&cfg.paths).unwrap_or_default());
            config.insert("integrations".to_string(), serde_json::to_value(&cfg.integrations).unwrap_or_default());
        });
        let environment =
            std::env::vars().map(|(k, v)| (k, serde_json::Value::String(v))).collect::<serde_json::Map<_, _>>();
        RuntimeContext { environment, config }
    }
}

#[async_trait]
impl SkillRunner for DaemonSkillRunner {
    async fn run(&self, name: &str, inputs: IndexMap<String, serde_json::Value>) -> SkillRunOutcome {
        let skill = match warden_skills::load_skill(&self.skills_dir, name) {
            Ok(skill) => skill,
            Err(err) => {
                return SkillRunOutcome {
                    success: false,
                    outputs: serde_json::Value::Null,
                    error: Some(err.to_string()),
                }
            }
        };

        let runtime = self.runtime_context();
        let cancel = CancellationToken::new();
        let id = ExecutionId::new();
        let outcome = self.executor.execute(&skill, id, inputs, &runtime, &cancel).await;

        SkillRunOutcome {
            success: matches!(outcome.context.status, ExecutionStatus::Completed),
            outputs: serde_json::to_value(&outcome.context.outputs).unwrap_or_default(),
            error: outcome.error,
        }
    }
}

#[cfg(test)]
#[path = "skills_tests.rs"]
mod tests;
