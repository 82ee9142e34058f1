// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios exercised against the compiled `warden` binary
//! itself, rather than any single crate's internals (§8 concrete
//! scenarios E1, E5, E6; §6.4 CLI exit codes). Per-component invariants
//! (ordering, debounce, retry bounds, ...) are covered by each crate's own
//! `#[cfg(test)]` modules; this suite checks that the wiring holds end to
//! end through the real stdio host protocol.

use std::io::Write;
use std::process::Stdio;

use assert_cmd::cargo::CommandCargoExt;
use serde_json::{json, Value};

fn warden_cmd() -> std::process::Command {
    std::process::Command::cargo_bin("warden").expect("warden binary must build")
}

fn write_persona(dir: &std::path::Path, name: &str, modules: &[&str]) {
    let personas = dir.join("personas");
    std::fs::create_dir_all(&personas).unwrap();
    let modules_yaml: String = modules.iter().map(|m| format!("  - {m}\n")).collect();
    std::fs::write(personas.join(format!("{name}.yaml")), format!("name: {name}\ndescription: test persona\nmodules:\n{modules_yaml}"))
        .unwrap();
}

/// Runs `warden` with the given args, feeds `requests` (one JSON value per
/// line) on stdin, closes stdin, and returns every `type`-tagged response
/// line the process wrote before it exited (it exits once stdin hits EOF,
/// per §4.11 "enter the host-protocol loop").
fn run_requests(project_dir: &std::path::Path, extra_args: &[&str], requests: &[Value]) -> Vec<Value> {
    let state_dir = tempfile::TempDir::new().unwrap();
    let mut cmd = warden_cmd();
    cmd.env("WARDEN_STATE_DIR", state_dir.path());
    cmd.arg("--no-bus").arg("--project-dir").arg(project_dir).args(extra_args);
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().expect("failed to spawn warden");
    {
        let mut stdin = child.stdin.take().unwrap();
        for req in requests {
            writeln!(stdin, "{req}").unwrap();
        }
    }
    let output = child.wait_with_output().expect("warden did not exit cleanly");
    assert!(output.status.success(), "warden exited with {:?}: {}", output.status, String::from_utf8_lossy(&output.stderr));

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("malformed response line {l:?}: {e}")))
        .collect()
}

/// **E1.** Boot with `--persona devops`: the catalogue contains exactly the
/// union of the protected core and every tool the persona's modules
/// declare.
#[test]
fn e1_boot_with_persona_loads_the_unions_declared_modules() {
    let project = tempfile::TempDir::new().unwrap();
    write_persona(project.path(), "devops", &["git"]);

    let responses = run_requests(project.path(), &["--persona", "devops"], &[json!({"op": "list_tools"})]);

    assert_eq!(responses.len(), 1);
    let tools = responses[0]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();

    for protected in ["persona_load", "persona_list", "debug", "session_start", "memory_ask", "memory_store"] {
        assert!(names.contains(&protected), "expected protected tool {protected:?} in {names:?}");
    }
    assert!(names.contains(&"git_status"), "expected devops's git module tools in {names:?}");

    let unique: std::collections::HashSet<&&str> = names.iter().collect();
    assert_eq!(names.len(), unique.len(), "catalogue must not list a tool name twice");
}

/// **E5.** Switching from one persona to another drops the first persona's
/// unique tools while the protected core survives, and the client sees the
/// switch succeed.
#[test]
fn e5_switching_personas_drops_the_previous_modules_tools() {
    let project = tempfile::TempDir::new().unwrap();
    write_persona(project.path(), "devops", &["git"]);
    write_persona(project.path(), "developer", &["ops"]);

    let responses = run_requests(
        project.path(),
        &["--persona", "devops"],
        &[
            json!({"op": "list_tools"}),
            json!({"op": "call_tool", "name": "persona_load", "args": {"persona": "developer"}}),
            json!({"op": "list_tools"}),
        ],
    );

    assert_eq!(responses.len(), 3);
    let before: Vec<&str> = responses[0]["tools"].as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert!(before.contains(&"git_status"));

    assert_eq!(responses[1]["type"], "tool_result");
    assert!(responses[1]["result"].as_str().unwrap().contains("developer"), "{:?}", responses[1]);

    let after: Vec<&str> = responses[2]["tools"].as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert!(!after.contains(&"git_status"), "devops-only tool must not survive the switch to developer");
    assert!(after.contains(&"credential_refresh"), "developer's ops module should now be live");
    for protected in ["persona_load", "persona_list", "debug", "session_start"] {
        assert!(after.contains(&protected), "protected tool {protected:?} must survive a persona switch");
    }
}

/// A skill run through `run_skill` over the real stdio protocol completes
/// and reports its outputs, exercising the same path §8's E2 describes
/// (step ordering itself is covered at the `warden-engine`/`warden-daemon`
/// unit level against a fake bus; this checks the wiring end to end).
#[test]
fn run_skill_over_stdio_executes_a_real_skill_file() {
    let project = tempfile::TempDir::new().unwrap();
    let skills_dir = project.path().join("skills");
    std::fs::create_dir_all(&skills_dir).unwrap();
    std::fs::write(
        skills_dir.join("remember.yaml"),
        r#"
name: remember
description: store then recall a note
inputs:
  - name: note
    type: string
    required: true
steps:
  - name: store
    tool: memory_store
    args:
      key: "scratch"
      value: "${inputs.note}"
    output: stored
  - name: recall
    tool: memory_ask
    args:
      key: "scratch"
    output: recalled
"#,
    )
    .unwrap();

    let responses = run_requests(
        project.path(),
        &[],
        &[json!({"op": "run_skill", "name": "remember", "inputs": {"note": "buy milk"}})],
    );

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["type"], "skill_result");
    assert_eq!(responses[0]["name"], "remember");
    assert_eq!(responses[0]["success"], true, "skill failed: {:?}", responses[0]["error"]);
}

/// §6.4: an invalid combination of module-selection flags is a bad-CLI-args
/// error (exit 64), not an internal failure.
#[test]
fn bad_cli_args_exit_with_64() {
    let status = warden_cmd().arg("--persona").arg("devops").arg("--all").status().unwrap();
    assert_eq!(status.code(), Some(64));
}

/// `--help` is not a CLI error: it exits 0 after printing usage.
#[test]
fn help_flag_exits_with_0() {
    let status = warden_cmd().arg("--help").status().unwrap();
    assert_eq!(status.code(), Some(0));
}

/// Exercises the same on-disk-state path §8's E6 describes (the debounced
/// write itself is unit-tested directly against `StateStore`): a
/// `session_start` call followed by stdin EOF drives the daemon through
/// shutdown, which flushes `state.json` and `workspaces.json` into the
/// configured state directory as valid JSON.
#[test]
fn e6_shutdown_flushes_valid_state_and_workspace_json_to_disk() {
    let project = tempfile::TempDir::new().unwrap();
    let state_dir = tempfile::TempDir::new().unwrap();

    let mut cmd = warden_cmd();
    cmd.env("WARDEN_STATE_DIR", state_dir.path());
    cmd.arg("--no-bus").arg("--project-dir").arg(project.path());
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("failed to spawn warden");
    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "{}", json!({"op": "call_tool", "name": "session_start", "args": {}})).unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let state_json = state_dir.path().join("state.json");
    let workspaces_json = state_dir.path().join("workspaces.json");
    assert!(state_json.is_file());
    assert!(workspaces_json.is_file());
    let _: Value = serde_json::from_str(&std::fs::read_to_string(workspaces_json).unwrap()).unwrap();
}
