// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test factories and `proptest` strategies, gated behind the
//! `test-support` feature so other crates can depend on them in their own
//! dev-dependencies without pulling `proptest` into their normal build.

#![cfg(any(test, feature = "test-support"))]

use crate::error::ErrorCode;
use crate::persona::Persona;
use crate::session::Session;

/// A minimal persona suitable for tests that don't care about its content.
pub fn sample_persona(name: impl Into<String>, modules: Vec<String>) -> Persona {
    Persona {
        name: name.into(),
        description: "test persona".to_string(),
        modules,
        prose: None,
        append: None,
        default_skills: vec![],
    }
}

/// A session created at `now_ms`, for workspace/staleness tests.
pub fn sample_session(persona: impl Into<String>, now_ms: u64) -> Session {
    Session::new(persona, now_ms)
}

#[cfg(feature = "proptest")]
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    /// An arbitrary error code, for exercising the full taxonomy in property tests.
    pub fn arb_error_code() -> impl Strategy<Value = ErrorCode> {
        prop_oneof![
            Just(ErrorCode::AuthFailed),
            Just(ErrorCode::AuthExpired),
            Just(ErrorCode::PermissionDenied),
            Just(ErrorCode::NotFound),
            Just(ErrorCode::AlreadyExists),
            Just(ErrorCode::Conflict),
            Just(ErrorCode::Timeout),
            Just(ErrorCode::RateLimited),
            Just(ErrorCode::InvalidInput),
            Just(ErrorCode::InvalidState),
            Just(ErrorCode::InternalError),
            Just(ErrorCode::ServiceUnavailable),
            Just(ErrorCode::DependencyFailed),
            Just(ErrorCode::ConnectionFailed),
            Just(ErrorCode::DnsFailed),
        ]
    }

    /// A plausible but arbitrary tool failure body, for auto-heal classification tests.
    pub fn arb_failure_body() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("401 Unauthorized".to_string()),
            Just("connection refused".to_string()),
            Just("no route to host".to_string()),
            Just("disk full".to_string()),
            "[a-z ]{1,40}",
        ]
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
