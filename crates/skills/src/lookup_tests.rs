// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;
use yare::parameterized;

const START_WORK: &str = r#"
name: start_work
description: fetch an issue and start a branch for it
inputs:
  - name: issue_key
    type: string
    required: true
steps:
  - name: fetch_issue
    tool: jira_get_issue
    args:
      key: "${inputs.issue_key}"
    output: fetch_issue
  - name: create_branch
    tool: git_create_branch
    args:
      name: "${outputs.fetch_issue.key}"
"#;

const BROKEN: &str = r#"
name: broken
description: references an unknown output
inputs: []
steps:
  - name: only_step
    tool: whatever
    args:
      x: "${outputs.nonexistent.field}"
"#;

#[test]
fn load_skill_finds_yaml_by_name() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("start_work.yaml"), START_WORK).expect("write");

    let skill = load_skill(dir.path(), "start_work").expect("load");
    assert_eq!(skill.name, "start_work");
    assert_eq!(skill.steps.len(), 2);
}

#[test]
fn load_skill_accepts_yml_extension() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("start_work.yml"), START_WORK).expect("write");

    let skill = load_skill(dir.path(), "start_work").expect("load");
    assert_eq!(skill.name, "start_work");
}

#[test]
fn load_skill_missing_file_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let err = load_skill(dir.path(), "nope").unwrap_err();
    assert!(matches!(err, SkillLookupError::NotFound(name) if name == "nope"));
}

#[test]
fn list_skill_names_sorts_and_dedups_extensions() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("b.yaml"), START_WORK).expect("write");
    fs::write(dir.path().join("a.yml"), START_WORK).expect("write");
    fs::write(dir.path().join("README.md"), "not a skill").expect("write");

    let names = list_skill_names(dir.path());
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn list_skill_names_empty_dir_returns_empty() {
    let dir = tempdir().expect("tempdir");
    assert!(list_skill_names(dir.path()).is_empty());
}

#[test]
fn list_skill_names_missing_dir_returns_empty() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist");
    assert!(list_skill_names(&missing).is_empty());
}

#[parameterized(
    valid = { START_WORK, true },
    broken_reference = { BROKEN, false },
)]
fn load_all_skills_skips_invalid_documents(content: &str, should_load: bool) {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("skill.yaml"), content).expect("write");

    let loaded = load_all_skills(dir.path());
    assert_eq!(loaded.len(), should_load as usize);
}

#[test]
fn load_all_skills_mixes_valid_and_invalid() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("start_work.yaml"), START_WORK).expect("write");
    fs::write(dir.path().join("broken.yaml"), BROKEN).expect("write");

    let loaded = load_all_skills(dir.path());
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "start_work");
}
