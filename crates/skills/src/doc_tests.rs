// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const VALID_SKILL: &str = r#"
name: deploy_service
description: Build, test, then deploy.
inputs:
  - name: service
    type: string
    required: true
steps:
  - name: build
    tool: shell_exec
    args:
      cmd: "build ${inputs.service}"
    output: build_result
  - name: deploy
    tool: shell_exec
    args:
      cmd: "deploy ${outputs.build_result.artifact}"
    condition: "${outputs.build_result.ok}"
"#;

#[test]
fn parses_a_well_formed_skill() {
    let skill = parse_skill_yaml(VALID_SKILL).unwrap();
    assert_eq!(skill.name, "deploy_service");
    assert_eq!(skill.steps.len(), 2);
}

#[test]
fn rejects_a_step_referencing_an_undeclared_input() {
    let doc = r#"
name: broken
description: bad input reference
inputs: []
steps:
  - name: run
    tool: shell_exec
    args:
      cmd: "echo ${inputs.nonexistent}"
"#;
    let err = parse_skill_yaml(doc).unwrap_err();
    assert!(matches!(err, SkillDocError::UnknownReference { ref reference, .. } if reference == "inputs.nonexistent"));
}

#[test]
fn rejects_a_step_referencing_a_not_yet_assigned_output() {
    let doc = r#"
name: broken
description: forward reference
inputs: []
steps:
  - name: first
    tool: shell_exec
    args:
      cmd: "echo ${outputs.second.value}"
  - name: second
    tool: shell_exec
    args: {}
    output: second
"#;
    let err = parse_skill_yaml(doc).unwrap_err();
    assert!(matches!(err, SkillDocError::UnknownReference { ref step, .. } if step == "first"));
}

#[test]
fn rejects_duplicate_step_output_names() {
    let doc = r#"
name: broken
description: duplicate outputs
inputs: []
steps:
  - name: first
    tool: shell_exec
    args: {}
    output: shared
  - name: second
    tool: shell_exec
    args: {}
    output: shared
"#;
    let err = parse_skill_yaml(doc).unwrap_err();
    assert!(matches!(err, SkillDocError::Shape(SkillShapeError::DuplicateOutputName(ref name)) if name == "shared"));
}

struct FakeKnowledge;

impl ToolKnowledge for FakeKnowledge {
    fn is_known(&self, tool: &str) -> bool {
        tool == "shell_exec"
    }

    fn personas_providing(&self, tool: &str) -> Vec<String> {
        if tool == "jira_search" {
            vec!["pm".to_string(), "developer".to_string()]
        } else {
            Vec::new()
        }
    }
}

#[test]
fn check_tool_availability_warns_on_unknown_tools_only() {
    let doc = r#"
name: mixed
description: one known tool, one unknown
inputs: []
steps:
  - name: a
    tool: shell_exec
    args: {}
  - name: b
    tool: jira_search
    args: {}
"#;
    let skill = parse_skill_yaml(doc).unwrap();
    let warnings = check_tool_availability(&skill, &FakeKnowledge);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].tool, "jira_search");
    assert_eq!(warnings[0].providing_personas, vec!["pm", "developer"]);
}
