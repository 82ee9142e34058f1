// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn classify_none_when_not_failed() {
    assert_eq!(FailureClass::classify(false, "unauthorized"), FailureClass::None);
}

#[parameterized(
    unauthorized = { "401 Unauthorized" },
    forbidden = { "403 Forbidden" },
    token_expired = { "token expired" },
    permission_denied = { "Permission Denied" },
)]
fn classify_auth_markers(body: &str) {
    assert_eq!(FailureClass::classify(true, body), FailureClass::Auth);
}

#[parameterized(
    no_route = { "no route to host" },
    connection_refused = { "connection refused" },
    timeout = { "request timeout" },
    dial_tcp = { "dial tcp 10.0.0.1:443: i/o timeout" },
)]
fn classify_network_markers(body: &str) {
    assert_eq!(FailureClass::classify(true, body), FailureClass::Network);
}

#[test]
fn classify_unknown_when_failed_but_unmatched() {
    assert_eq!(FailureClass::classify(true, "disk full"), FailureClass::Unknown);
}

#[test]
fn auth_takes_precedence_when_body_matches_both_rule_tables() {
    // "timeout" is a network marker but "token expired" is checked first.
    assert_eq!(
        FailureClass::classify(true, "token expired, retry caused timeout"),
        FailureClass::Auth
    );
}

#[test]
fn is_fixable_covers_auth_and_network_only() {
    assert!(FailureClass::Auth.is_fixable());
    assert!(FailureClass::Network.is_fixable());
    assert!(!FailureClass::Unknown.is_fixable());
    assert!(!FailureClass::None.is_fixable());
}

#[test]
fn infer_cluster_prefers_output_match_over_name_match() {
    let cluster = infer_cluster("prod-deploy", "401 from stage gateway", "ephemeral");
    assert_eq!(cluster, "stage");
}

#[test]
fn infer_cluster_falls_back_to_name_match() {
    let cluster = infer_cluster("konflux-build", "401 unauthorized", "ephemeral");
    assert_eq!(cluster, "konflux");
}

#[test]
fn infer_cluster_falls_back_to_default_when_no_label_present() {
    let cluster = infer_cluster("generic-tool", "401 unauthorized", "ephemeral");
    assert_eq!(cluster, "ephemeral");
}
