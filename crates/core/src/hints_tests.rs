// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    no_route = { "dial tcp: no route to host", Hint::SuggestLinkUp },
    connection_refused = { "Connection Refused by peer", Hint::SuggestLinkUp },
    unauthorized = { "401 Unauthorized", Hint::SuggestCredentialRefresh },
    token_expired = { "the token expired an hour ago", Hint::SuggestCredentialRefresh },
)]
fn lookup_hint_matches_generic_rules(body: &str, expected: Hint) {
    assert_eq!(lookup_hint(body, None), Some(expected));
}

#[test]
fn lookup_hint_prefers_service_token_rule_over_generic_auth_rule() {
    let hint = lookup_hint("unauthorized: JIRA_TOKEN missing", Some(("jira", "JIRA_TOKEN")));
    assert_eq!(hint, Some(Hint::SetEnvVar("JIRA_TOKEN")));
}

#[test]
fn lookup_hint_falls_back_to_generic_rule_when_service_does_not_match() {
    let hint = lookup_hint("unauthorized", Some(("jira", "JIRA_TOKEN")));
    assert_eq!(hint, Some(Hint::SuggestCredentialRefresh));
}

#[test]
fn lookup_hint_returns_none_for_unrecognized_body() {
    assert_eq!(lookup_hint("disk full", None), None);
}

#[test]
fn set_env_var_message_names_the_variable() {
    assert_eq!(
        Hint::SetEnvVar("JIRA_TOKEN").message(),
        "set the JIRA_TOKEN environment variable"
    );
}
