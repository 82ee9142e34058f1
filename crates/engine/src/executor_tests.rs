// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use warden_core::clock::FakeClock;
use warden_core::error::ErrorCode;
use warden_core::event::ExecutionId;
use warden_core::result::ToolResult;
use warden_core::skill::{ConfirmBlock, InputSpec, InputType, OnError, RetryPolicy, Skill, Step};

struct ScriptedInvoker {
    responses: Mutex<HashMap<String, VecDeque<ToolResult>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedInvoker {
    fn new() -> Self {
        Self { responses: Mutex::new(HashMap::new()), calls: Mutex::new(Vec::new()) }
    }

    fn script(&self, tool: &str, results: Vec<ToolResult>) {
        self.responses.lock().insert(tool.to_string(), results.into());
    }

    fn call_count(&self, tool: &str) -> usize {
        self.calls.lock().iter().filter(|(name, _)| name == tool).count()
    }
}

#[async_trait]
impl ToolInvoker for ScriptedInvoker {
    async fn invoke(&self, tool: &str, args: Value) -> ToolResult {
        self.calls.lock().push((tool.to_string(), args));
        let mut responses = self.responses.lock();
        match responses.get_mut(tool).and_then(VecDeque::pop_front) {
            Some(result) => result,
            None => ToolResult::success("default"),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn log(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl EventSink for RecordingSink {
    fn skill_started(&self, _id: ExecutionId, _name: &str, _step_count: usize, _inputs: &IndexMap<String, Value>) {
        self.events.lock().push("skill_started".to_string());
    }
    fn skill_completed(&self, _id: ExecutionId, _name: &str, _step_count: usize, _duration_secs: f64) {
        self.events.lock().push("skill_completed".to_string());
    }
    fn skill_failed(&self, _id: ExecutionId, _name: &str, _step_count: usize, _duration_secs: f64, _error: &str) {
        self.events.lock().push("skill_failed".to_string());
    }
    fn step_started(&self, _id: ExecutionId, _step_index: usize, name: &str) {
        self.events.lock().push(format!("step_started({name})"));
    }
    fn step_completed(&self, _id: ExecutionId, _step_index: usize, name: &str, _duration_secs: f64) {
        self.events.lock().push(format!("step_completed({name})"));
    }
    fn step_failed(&self, _id: ExecutionId, _step_index: usize, name: &str, _duration_secs: f64, _error: &str) {
        self.events.lock().push(format!("step_failed({name})"));
    }
    fn step_skipped(&self, _id: ExecutionId, _step_index: usize, name: &str) {
        self.events.lock().push(format!("step_skipped({name})"));
    }
}

struct FixedConfirmation(&'static str);

#[async_trait]
impl ConfirmationSource for FixedConfirmation {
    async fn request_confirmation(
        &self,
        _skill_id: ExecutionId,
        _step_index: usize,
        _prompt: &str,
        _options: &[String],
        _default: &str,
        _timeout_secs: u64,
    ) -> String {
        self.0.to_string()
    }
}

struct FixedHealer(ToolResult);

#[async_trait]
impl AutoHealer for FixedHealer {
    async fn heal(&self, _tool: &str, _args: &Value, _failed: &ToolResult) -> ToolResult {
        self.0.clone()
    }
}

fn step(name: &str, tool: &str, output: Option<&str>) -> Step {
    Step {
        name: name.to_string(),
        tool: tool.to_string(),
        args: IndexMap::new(),
        output: output.map(String::from),
        condition: None,
        confirm: None,
        on_error: None,
        retry: None,
    }
}

fn three_step_skill() -> Skill {
    Skill {
        name: "start_work".to_string(),
        description: "test".to_string(),
        inputs: vec![],
        steps: vec![
            step("fetch_issue", "jira_get_issue", Some("fetch_issue")),
            step("create_branch", "git_create_branch", None),
            step("transition", "jira_transition", Some("transition")),
        ],
        on_error: OnError::Abort,
    }
}

fn harness(
    invoker: ScriptedInvoker,
) -> (Executor<ScriptedInvoker, RecordingSink, FixedConfirmation, FixedHealer, FakeClock>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let exec = Executor::new(
        Arc::new(invoker),
        sink.clone(),
        Arc::new(FixedConfirmation("yes")),
        Arc::new(FixedHealer(ToolResult::success("healed"))),
        FakeClock::new(),
    );
    (exec, sink)
}

#[tokio::test]
async fn all_steps_succeed_in_textual_order() {
    let (exec, sink) = harness(ScriptedInvoker::new());
    let skill = three_step_skill();
    let outcome = exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
    assert_eq!(
        sink.log(),
        vec![
            "skill_started",
            "step_started(fetch_issue)",
            "step_completed(fetch_issue)",
            "step_started(create_branch)",
            "step_completed(create_branch)",
            "step_started(transition)",
            "step_completed(transition)",
            "skill_completed",
        ]
    );
    assert!(outcome.context.outputs.contains_key("fetch_issue"));
    assert!(outcome.context.outputs.contains_key("transition"));
}

#[tokio::test]
async fn missing_required_input_fails_before_any_step_runs() {
    let invoker = ScriptedInvoker::new();
    let (exec, sink) = harness(invoker);
    let skill = Skill {
        name: "needs_input".to_string(),
        description: "t".to_string(),
        inputs: vec![InputSpec { name: "key".to_string(), type_: InputType::String, required: true, default: None }],
        steps: vec![step("only", "whatever", None)],
        on_error: OnError::Abort,
    };

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Failed);
    assert!(outcome.error.is_some());
    assert_eq!(sink.log(), vec!["skill_failed"]);
}

#[tokio::test]
async fn skipped_condition_emits_step_skipped_and_continues() {
    let invoker = ScriptedInvoker::new();
    let (exec, sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.steps[1].condition = Some("false".to_string());

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
    assert!(sink.log().contains(&"step_skipped(create_branch)".to_string()));
    assert!(!sink.log().contains(&"step_started(create_branch)".to_string()));
}

#[tokio::test]
async fn on_error_abort_stops_the_skill() {
    let invoker = ScriptedInvoker::new();
    invoker.script("git_create_branch", vec![ToolResult::error_code("boom", ErrorCode::InternalError)]);
    let (exec, sink) = harness(invoker);
    let skill = three_step_skill();

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Failed);
    assert!(!sink.log().contains(&"step_started(transition)".to_string()));
}

#[tokio::test]
async fn on_error_continue_keeps_going_after_a_failed_step() {
    let invoker = ScriptedInvoker::new();
    invoker.script("git_create_branch", vec![ToolResult::error_code("boom", ErrorCode::InternalError)]);
    let (exec, sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.steps[1].on_error = Some(OnError::Continue);

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
    assert!(sink.log().contains(&"step_failed(create_branch)".to_string()));
    assert!(sink.log().contains(&"step_started(transition)".to_string()));
}

#[tokio::test]
async fn on_error_retry_succeeds_within_max_attempts() {
    let invoker = ScriptedInvoker::new();
    invoker.script(
        "git_create_branch",
        vec![ToolResult::error_code("boom", ErrorCode::ServiceUnavailable), ToolResult::success("ok")],
    );
    let (exec, _sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.steps[1].on_error = Some(OnError::Retry);
    skill.steps[1].retry =
        Some(RetryPolicy { max_attempts: 2, initial_delay_secs: 0.0, max_delay_secs: 0.0, multiplier: 1.0 });

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
}

#[tokio::test]
async fn on_error_retry_falls_through_to_abort_after_exhausting_attempts() {
    let invoker = ScriptedInvoker::new();
    invoker.script(
        "git_create_branch",
        vec![
            ToolResult::error_code("boom", ErrorCode::ServiceUnavailable),
            ToolResult::error_code("boom", ErrorCode::ServiceUnavailable),
            ToolResult::error_code("boom", ErrorCode::ServiceUnavailable),
        ],
    );
    let (exec, _sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.steps[1].on_error = Some(OnError::Retry);
    skill.steps[1].retry =
        Some(RetryPolicy { max_attempts: 2, initial_delay_secs: 0.0, max_delay_secs: 0.0, multiplier: 1.0 });

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Failed);
}

#[tokio::test]
async fn on_error_auto_heal_recovers_via_the_healer() {
    let invoker = ScriptedInvoker::new();
    invoker.script("git_create_branch", vec![ToolResult::error_code("auth", ErrorCode::AuthFailed)]);
    let (exec, _sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.steps[1].on_error = Some(OnError::AutoHeal);

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
}

#[tokio::test]
async fn confirmation_abort_stops_the_skill() {
    let invoker = ScriptedInvoker::new();
    let sink = Arc::new(RecordingSink::default());
    let exec = Executor::new(
        Arc::new(invoker),
        sink.clone(),
        Arc::new(FixedConfirmation("abort")),
        Arc::new(FixedHealer(ToolResult::success("healed"))),
        FakeClock::new(),
    );
    let mut skill = three_step_skill();
    skill.steps[1].confirm = Some(ConfirmBlock {
        prompt: "proceed?".to_string(),
        options: vec!["yes".to_string(), "abort".to_string()],
        default: "yes".to_string(),
        timeout_secs: 5,
    });

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Failed);
}

#[tokio::test]
async fn confirmation_skip_continues_past_the_step() {
    let invoker = ScriptedInvoker::new();
    let sink = Arc::new(RecordingSink::default());
    let exec = Executor::new(
        Arc::new(invoker),
        sink.clone(),
        Arc::new(FixedConfirmation("skip")),
        Arc::new(FixedHealer(ToolResult::success("healed"))),
        FakeClock::new(),
    );
    let mut skill = three_step_skill();
    skill.steps[1].confirm = Some(ConfirmBlock {
        prompt: "proceed?".to_string(),
        options: vec!["yes".to_string(), "skip".to_string()],
        default: "yes".to_string(),
        timeout_secs: 5,
    });

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
    assert!(sink.log().contains(&"step_skipped(create_branch)".to_string()));
}

#[tokio::test]
async fn cancellation_transitions_to_aborted_at_the_next_step() {
    let invoker = ScriptedInvoker::new();
    let (exec, sink) = harness(invoker);
    let skill = three_step_skill();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &cancel).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Aborted);
    assert!(sink.log().is_empty() || sink.log() == vec!["skill_started".to_string()]);
}

#[tokio::test]
async fn unresolved_template_reference_in_args_fails_the_skill() {
    let invoker = ScriptedInvoker::new();
    let (exec, _sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.steps[0].args.insert("key".to_string(), json!("${inputs.missing}"));

    let outcome =
        exec.execute(&skill, ExecutionId::new(), IndexMap::new(), &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Failed);
}

#[tokio::test]
async fn args_are_template_resolved_before_invocation() {
    let invoker = ScriptedInvoker::new();
    let (exec, _sink) = harness(invoker);
    let mut skill = three_step_skill();
    skill.inputs.push(InputSpec {
        name: "issue_key".to_string(),
        type_: InputType::String,
        required: true,
        default: None,
    });
    skill.steps[0].args.insert("key".to_string(), json!("${inputs.issue_key}"));

    let mut inputs = IndexMap::new();
    inputs.insert("issue_key".to_string(), json!("AAP-12345"));

    let outcome = exec.execute(&skill, ExecutionId::new(), inputs, &RuntimeContext::default(), &CancellationToken::new()).await;

    assert_eq!(outcome.context.status, ExecutionStatus::Completed);
}
