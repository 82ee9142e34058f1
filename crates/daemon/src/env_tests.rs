// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_honors_the_explicit_override() {
    std::env::set_var("WARDEN_STATE_DIR", "/tmp/warden-explicit");
    let dir = state_dir().unwrap();
    assert_eq!(dir, PathBuf::from("/tmp/warden-explicit"));
    std::env::remove_var("WARDEN_STATE_DIR");
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg_state_home() {
    std::env::remove_var("WARDEN_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    let dir = state_dir().unwrap();
    assert_eq!(dir, PathBuf::from("/tmp/xdg/warden"));
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn credential_command_is_absent_when_unset() {
    std::env::remove_var("WARDEN_CREDENTIAL_CMD");
    assert_eq!(credential_command(), None);
}

#[test]
#[serial]
fn credential_command_reports_the_configured_program() {
    std::env::set_var("WARDEN_CREDENTIAL_CMD", "oc-login");
    assert_eq!(credential_command(), Some("oc-login".to_string()));
    std::env::remove_var("WARDEN_CREDENTIAL_CMD");
}

#[test]
#[serial]
fn network_command_splits_program_and_args() {
    std::env::set_var("WARDEN_NETWORK_CMD", "vpnctl up --profile work");
    let (program, args) = network_command().unwrap();
    assert_eq!(program, "vpnctl");
    assert_eq!(args, vec!["up".to_string(), "--profile".to_string(), "work".to_string()]);
    std::env::remove_var("WARDEN_NETWORK_CMD");
}

#[test]
#[serial]
fn network_command_is_absent_when_unset() {
    std::env::remove_var("WARDEN_NETWORK_CMD");
    assert_eq!(network_command(), None);
}
