// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill and execution-context data model (§3), shared by `warden-skills`
//! (loading/validation/templating) and `warden-engine` (execution).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The declared type of a skill input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    String,
    Int,
    Bool,
    List,
    Map,
}

/// One declared input of a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: InputType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

/// Per-step (or global) error-handling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    Abort,
    Continue,
    Retry,
    AutoHeal,
}

impl Default for OnError {
    fn default() -> Self {
        Self::Abort
    }
}

/// Exponential backoff parameters for `on_error: retry`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_secs: f64,
    pub max_delay_secs: f64,
    pub multiplier: f64,
}

impl RetryPolicy {
    /// The delay before the `attempt`-th retry (0-indexed), capped at `max_delay_secs`.
    pub fn delay_for_attempt(&self, attempt: u32) -> f64 {
        let scaled = self.initial_delay_secs * self.multiplier.powi(attempt as i32);
        scaled.min(self.max_delay_secs)
    }
}

/// A synchronous confirmation gate on a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmBlock {
    pub prompt: String,
    pub options: Vec<String>,
    pub default: String,
    pub timeout_secs: u64,
}

/// One step in a skill's ordered step graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub tool: String,
    #[serde(default)]
    pub args: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub confirm: Option<ConfirmBlock>,
    #[serde(default)]
    pub on_error: Option<OnError>,
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
}

/// A YAML-defined skill: inputs, ordered steps, global error strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub on_error: OnError,
}

/// Error returned by [`Skill::validate_shape`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SkillShapeError {
    #[error("duplicate step output name: {0:?}")]
    DuplicateOutputName(String),
    #[error("step {step:?} references unknown name {reference:?}")]
    UnknownReference { step: String, reference: String },
}

impl Skill {
    /// Every output name bound by a step, in step order.
    pub fn output_names(&self) -> Vec<&str> {
        self.steps.iter().filter_map(|s| s.output.as_deref()).collect()
    }

    /// Verify step output names are unique, independent of templating rules
    /// (those live in `warden-skills`, which can see the full expression
    /// grammar; this only checks the structural invariant from §3).
    pub fn validate_shape(&self) -> Result<(), SkillShapeError> {
        let mut seen = std::collections::HashSet::new();
        for name in self.output_names() {
            if !seen.insert(name) {
                return Err(SkillShapeError::DuplicateOutputName(name.to_string()));
            }
        }
        Ok(())
    }

    /// Resolve the effective error strategy for a step: its own override, or
    /// the skill's global default.
    pub fn error_strategy_for(&self, step: &Step) -> OnError {
        step.on_error.unwrap_or(self.on_error)
    }
}

/// The lifecycle state of one skill invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Validating,
    Ready,
    Running,
    Completed,
    Failed,
    Aborted,
}

/// The outcome recorded for one executed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step_name: String,
    pub succeeded: bool,
    pub skipped: bool,
    pub duration_secs: f64,
    pub error: Option<String>,
}

/// Per-invocation record of a skill execution in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub skill_name: String,
    pub inputs: IndexMap<String, serde_json::Value>,
    pub outputs: IndexMap<String, serde_json::Value>,
    pub current_step: usize,
    pub status: ExecutionStatus,
    pub step_results: Vec<StepOutcome>,
    pub started_at_ms: u64,
}

impl ExecutionContext {
    pub fn new(skill_name: impl Into<String>, inputs: IndexMap<String, serde_json::Value>, now_ms: u64) -> Self {
        Self {
            skill_name: skill_name.into(),
            inputs,
            outputs: IndexMap::new(),
            current_step: 0,
            status: ExecutionStatus::Pending,
            step_results: Vec::new(),
            started_at_ms: now_ms,
        }
    }
}

#[cfg(test)]
#[path = "skill_tests.rs"]
mod tests;
