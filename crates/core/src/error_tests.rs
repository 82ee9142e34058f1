// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_matches_taxonomy_strings() {
    assert_eq!(ErrorCode::AuthFailed.to_string(), "AUTH_FAILED");
    assert_eq!(ErrorCode::DnsFailed.to_string(), "DNS_FAILED");
    assert_eq!(ErrorCode::InvalidInput.to_string(), "INVALID_INPUT");
}

#[test]
fn auth_classification_is_disjoint_from_network() {
    for code in [ErrorCode::AuthFailed, ErrorCode::AuthExpired, ErrorCode::PermissionDenied] {
        assert!(code.is_auth());
        assert!(!code.is_network());
    }
}

#[test]
fn network_classification_covers_timeout_and_connection_errors() {
    for code in [ErrorCode::ConnectionFailed, ErrorCode::DnsFailed, ErrorCode::Timeout] {
        assert!(code.is_network());
        assert!(!code.is_auth());
    }
}

#[test]
fn unrelated_codes_are_neither_auth_nor_network() {
    assert!(!ErrorCode::NotFound.is_auth());
    assert!(!ErrorCode::NotFound.is_network());
}
