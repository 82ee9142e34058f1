// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill execution state machine (C9 execution, §4.9).
//!
//! Decoupled from transport via the [`crate::traits`] capability interfaces
//! so this crate never depends on the host protocol, the WebSocket Event
//! Bus, or the Tool Registry's concrete type — `warden-daemon` wires those
//! in at runtime, and this crate's own tests wire in fakes.

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use warden_core::clock::Clock;
use warden_core::event::ExecutionId;
use warden_core::result::ToolResult;
use warden_core::skill::{ExecutionContext, ExecutionStatus, OnError, Skill, Step, StepOutcome};
use warden_skills::{eval_condition, resolve_value_tree, Context as TemplateContext};

use crate::error::EngineError;
use crate::traits::{AutoHealer, ConfirmationSource, EventSink, ToolInvoker};
use crate::validate::validate_inputs;

/// The unconstrained `environment`/`config` namespaces a template may read,
/// resolved once per invocation by the caller (§3 Skill: "environment or
/// config").
#[derive(Debug, Clone, Default)]
pub struct RuntimeContext {
    pub environment: serde_json::Map<String, Value>,
    pub config: serde_json::Map<String, Value>,
}

/// Outcome of one [`Executor::execute`] call. Always returned — a failure
/// anywhere in the skill (input validation, a step, a confirmation abort)
/// is reflected in `context.status` and `error`, never a panic or an `Err`:
/// every branch of the algorithm in §4.9 produces a terminal `ExecutionContext`.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub context: ExecutionContext,
    pub error: Option<String>,
}

/// Executes one skill's ordered step graph to completion, abort, or failure.
pub struct Executor<I, E, C, H, CLK> {
    invoker: Arc<I>,
    sink: Arc<E>,
    confirmations: Arc<C>,
    healer: Arc<H>,
    clock: CLK,
}

impl<I, E, C, H, CLK> Executor<I, E, C, H, CLK>
where
    I: ToolInvoker,
    E: EventSink,
    C: ConfirmationSource,
    H: AutoHealer,
    CLK: Clock,
{
    pub fn new(invoker: Arc<I>, sink: Arc<E>, confirmations: Arc<C>, healer: Arc<H>, clock: CLK) -> Self {
        Self { invoker, sink, confirmations, healer, clock }
    }

    /// Run `skill` to completion with the given raw (pre-validation) inputs.
    ///
    /// `cancel` is checked at every suspension point in the step loop; a
    /// cancellation in flight transitions the execution to `Aborted` at its
    /// next await point rather than forcibly killing an in-flight tool call
    /// (§5 Cancellation & timeouts).
    pub async fn execute(
        &self,
        skill: &Skill,
        id: ExecutionId,
        raw_inputs: IndexMap<String, Value>,
        runtime: &RuntimeContext,
        cancel: &CancellationToken,
    ) -> EngineOutcome {
        let started = self.clock.now();
        let mut ctx = ExecutionContext::new(skill.name.clone(), raw_inputs.clone(), self.clock.epoch_ms());
        ctx.status = ExecutionStatus::Validating;

        let inputs = match validate_inputs(skill, &raw_inputs) {
            Ok(inputs) => inputs,
            Err(err) => {
                ctx.status = ExecutionStatus::Failed;
                let message = EngineError::from(err).to_string();
                self.sink.skill_failed(id, &skill.name, skill.steps.len(), 0.0, &message);
                return EngineOutcome { context: ctx, error: Some(message) };
            }
        };
        ctx.inputs = inputs;

        ctx.status = ExecutionStatus::Running;
        self.sink.skill_started(id, &skill.name, skill.steps.len(), &ctx.inputs);

        for (index, step) in skill.steps.iter().enumerate() {
            ctx.current_step = index;

            if cancel.is_cancelled() {
                ctx.status = ExecutionStatus::Aborted;
                let elapsed = self.clock.now().duration_since(started).as_secs_f64();
                self.sink.skill_failed(id, &skill.name, skill.steps.len(), elapsed, "cancelled");
                return EngineOutcome { context: ctx, error: Some("cancelled".to_string()) };
            }

            self.sink.step_started(id, index, &step.name);
            let step_started_at = self.clock.now();

            if let Some(condition) = &step.condition {
                let inputs_map = to_json_map(&ctx.inputs);
                let outputs_map = to_json_map(&ctx.outputs);
                let tmpl_ctx = TemplateContext {
                    inputs: &inputs_map,
                    outputs: &outputs_map,
                    environment: &runtime.environment,
                    config: &runtime.config,
                };
                match eval_condition(condition, &tmpl_ctx) {
                    Ok(true) => {}
                    Ok(false) => {
                        self.sink.step_skipped(id, index, &step.name);
                        ctx.step_results.push(skipped_outcome(&step.name));
                        continue;
                    }
                    Err(err) => {
                        return self.fail_skill(ctx, id, skill, started, &err.to_string());
                    }
                }
            }

            if let Some(confirm) = &step.confirm {
                let response = self
                    .confirmations
                    .request_confirmation(
                        id,
                        index,
                        &confirm.prompt,
                        &confirm.options,
                        &confirm.default,
                        confirm.timeout_secs,
                    )
                    .await;
                match response.as_str() {
                    "abort" => {
                        return self.fail_skill(ctx, id, skill, started, "confirmation aborted");
                    }
                    "skip" => {
                        self.sink.step_skipped(id, index, &step.name);
                        ctx.step_results.push(skipped_outcome(&step.name));
                        continue;
                    }
                    _ => {}
                }
            }

            let inputs_map = to_json_map(&ctx.inputs);
            let outputs_map = to_json_map(&ctx.outputs);
            let tmpl_ctx = TemplateContext {
                inputs: &inputs_map,
                outputs: &outputs_map,
                environment: &runtime.environment,
                config: &runtime.config,
            };
            let resolved_args = match resolve_value_tree(&Value::Object(to_json_map(&step.args)), &tmpl_ctx, &[]) {
                Ok(value) => value,
                Err(err) => {
                    let message = EngineError::Template { step: step.name.clone(), source: err }.to_string();
                    return self.fail_skill(ctx, id, skill, started, &message);
                }
            };

            let result = self.invoker.invoke(&step.tool, resolved_args.clone()).await;
            let duration_secs = self.clock.now().duration_since(step_started_at).as_secs_f64();

            if !result.is_error() {
                if let Some(output) = &step.output {
                    ctx.outputs.insert(output.clone(), success_value(&result));
                }
                self.sink.step_completed(id, index, &step.name, duration_secs);
                ctx.step_results.push(succeeded_outcome(&step.name, duration_secs));
                continue;
            }

            let strategy = skill.error_strategy_for(step);
            let outcome =
                self.handle_step_failure(step, &resolved_args, &result, strategy, duration_secs).await;

            match outcome {
                StepFailureOutcome::Recovered { value, duration_secs } => {
                    if let Some(output) = &step.output {
                        ctx.outputs.insert(output.clone(), value);
                    }
                    self.sink.step_completed(id, index, &step.name, duration_secs);
                    ctx.step_results.push(succeeded_outcome(&step.name, duration_secs));
                }
                StepFailureOutcome::Continued { error } => {
                    self.sink.step_failed(id, index, &step.name, duration_secs, &error);
                    ctx.step_results.push(failed_outcome(&step.name, duration_secs, &error));
                }
                StepFailureOutcome::Fatal { error } => {
                    self.sink.step_failed(id, index, &step.name, duration_secs, &error);
                    ctx.step_results.push(failed_outcome(&step.name, duration_secs, &error));
                    return self.fail_skill(ctx, id, skill, started, &error);
                }
            }
        }

        ctx.status = ExecutionStatus::Completed;
        let total = self.clock.now().duration_since(started).as_secs_f64();
        self.sink.skill_completed(id, &skill.name, skill.steps.len(), total);
        EngineOutcome { context: ctx, error: None }
    }

    fn fail_skill(
        &self,
        mut ctx: ExecutionContext,
        id: ExecutionId,
        skill: &Skill,
        started: std::time::Instant,
        error: &str,
    ) -> EngineOutcome {
        ctx.status = ExecutionStatus::Failed;
        let elapsed = self.clock.now().duration_since(started).as_secs_f64();
        self.sink.skill_failed(id, &skill.name, skill.steps.len(), elapsed, error);
        EngineOutcome { context: ctx, error: Some(error.to_string()) }
    }

    async fn handle_step_failure(
        &self,
        step: &Step,
        args: &Value,
        first_result: &ToolResult,
        strategy: OnError,
        first_duration: f64,
    ) -> StepFailureOutcome {
        match strategy {
            OnError::Abort => StepFailureOutcome::Fatal { error: first_result.render() },
            OnError::Continue => StepFailureOutcome::Continued { error: first_result.render() },
            OnError::Retry => self.retry_step(step, args, first_result, first_duration).await,
            OnError::AutoHeal => {
                let healed = self.healer.heal(&step.tool, args, first_result).await;
                if healed.is_error() {
                    StepFailureOutcome::Fatal { error: healed.render() }
                } else {
                    StepFailureOutcome::Recovered { value: success_value(&healed), duration_secs: first_duration }
                }
            }
        }
    }

    async fn retry_step(
        &self,
        step: &Step,
        args: &Value,
        first_result: &ToolResult,
        first_duration: f64,
    ) -> StepFailureOutcome {
        let Some(policy) = step.retry else {
            return StepFailureOutcome::Fatal { error: first_result.render() };
        };

        let mut last = first_result.clone();
        for attempt in 0..policy.max_attempts {
            let delay = policy.delay_for_attempt(attempt);
            if delay > 0.0 {
                tokio::time::sleep(std::time::Duration::from_secs_f64(delay)).await;
            }
            let retried = self.invoker.invoke(&step.tool, args.clone()).await;
            if !retried.is_error() {
                return StepFailureOutcome::Recovered {
                    value: success_value(&retried),
                    duration_secs: first_duration,
                };
            }
            last = retried;
        }
        StepFailureOutcome::Fatal { error: last.render() }
    }
}

enum StepFailureOutcome {
    Recovered { value: Value, duration_secs: f64 },
    Continued { error: String },
    Fatal { error: String },
}

fn to_json_map(args: &IndexMap<String, Value>) -> serde_json::Map<String, Value> {
    args.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn success_value(result: &ToolResult) -> Value {
    match result {
        ToolResult::Success(msg) | ToolResult::Warning(msg) | ToolResult::Info(msg) => Value::String(msg.clone()),
        ToolResult::Error(msg, _) => Value::String(msg.clone()),
    }
}

fn skipped_outcome(name: &str) -> StepOutcome {
    StepOutcome { step_name: name.to_string(), succeeded: false, skipped: true, duration_secs: 0.0, error: None }
}

fn succeeded_outcome(name: &str, duration_secs: f64) -> StepOutcome {
    StepOutcome { step_name: name.to_string(), succeeded: true, skipped: false, duration_secs, error: None }
}

fn failed_outcome(name: &str, duration_secs: f64, error: &str) -> StepOutcome {
    StepOutcome {
        step_name: name.to_string(),
        succeeded: false,
        skipped: false,
        duration_secs,
        error: Some(error.to_string()),
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
