// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn step(name: &str, output: Option<&str>) -> Step {
    Step {
        name: name.to_string(),
        tool: "noop".to_string(),
        args: IndexMap::new(),
        output: output.map(str::to_string),
        condition: None,
        confirm: None,
        on_error: None,
        retry: None,
    }
}

fn skill_with_steps(steps: Vec<Step>) -> Skill {
    Skill {
        name: "start_work".to_string(),
        description: "begin work on an issue".to_string(),
        inputs: vec![],
        steps,
        on_error: OnError::Abort,
    }
}

#[test]
fn validate_shape_accepts_unique_output_names() {
    let skill = skill_with_steps(vec![
        step("fetch_issue", Some("issue")),
        step("create_branch", Some("branch")),
    ]);
    assert_eq!(skill.validate_shape(), Ok(()));
}

#[test]
fn validate_shape_rejects_duplicate_output_names() {
    let skill = skill_with_steps(vec![
        step("fetch_issue", Some("result")),
        step("transition", Some("result")),
    ]);
    assert_eq!(
        skill.validate_shape(),
        Err(SkillShapeError::DuplicateOutputName("result".to_string()))
    );
}

#[test]
fn error_strategy_for_prefers_step_override() {
    let skill = skill_with_steps(vec![step("a", None)]);
    let mut overridden = step("a", None);
    overridden.on_error = Some(OnError::Continue);

    assert_eq!(skill.error_strategy_for(&overridden), OnError::Continue);
    assert_eq!(skill.error_strategy_for(&step("a", None)), OnError::Abort);
}

#[test]
fn retry_policy_delay_grows_and_caps() {
    let policy = RetryPolicy {
        max_attempts: 5,
        initial_delay_secs: 1.0,
        max_delay_secs: 10.0,
        multiplier: 2.0,
    };
    assert_eq!(policy.delay_for_attempt(0), 1.0);
    assert_eq!(policy.delay_for_attempt(1), 2.0);
    assert_eq!(policy.delay_for_attempt(2), 4.0);
    assert_eq!(policy.delay_for_attempt(10), 10.0);
}

#[test]
fn deserializes_skill_yaml() {
    let yaml = r#"
name: start_work
description: begin work on an issue
inputs:
  - name: issue_key
    type: string
    required: true
steps:
  - name: fetch_issue
    tool: jira_fetch
    output: issue
"#;
    let skill: Skill = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(skill.name, "start_work");
    assert_eq!(skill.inputs[0].type_, InputType::String);
    assert_eq!(skill.on_error, OnError::Abort);
}

#[test]
fn execution_context_starts_pending() {
    let ctx = ExecutionContext::new("start_work", IndexMap::new(), 1_000);
    assert_eq!(ctx.status, ExecutionStatus::Pending);
    assert_eq!(ctx.current_step, 0);
    assert!(ctx.outputs.is_empty());
}
