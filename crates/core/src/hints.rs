// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure failure-hint lookup for the Debug & Failure-Hint Wrapper (C5).
//!
//! The stateful wrapper that closes over a tool handler and the per-session
//! call counter lives in `warden_daemon::registry::debug`; this module only
//! holds the substring → remediation rule table so it can be unit-tested in
//! isolation.

/// A suggested remediation for an observed failure body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    SuggestLinkUp,
    SuggestCredentialRefresh,
    SetEnvVar(&'static str),
}

impl Hint {
    /// The human-readable line appended after the error body.
    pub fn message(&self) -> String {
        match self {
            Self::SuggestLinkUp => "try the link-up tool to restore connectivity".to_string(),
            Self::SuggestCredentialRefresh => {
                "try the credential-refresh tool for the affected cluster".to_string()
            }
            Self::SetEnvVar(name) => format!("set the {name} environment variable"),
        }
    }
}

/// Look up a remediation hint for an error body via case-insensitive substring match.
///
/// A service-specific token error (the body names a known service whose
/// token env var is configured) takes precedence over the generic
/// auth/network rules.
pub fn lookup_hint(body: &str, service_token_env: Option<(&str, &'static str)>) -> Option<Hint> {
    let lower = body.to_lowercase();

    if let Some((needle, env_name)) = service_token_env {
        if lower.contains(&needle.to_lowercase()) {
            return Some(Hint::SetEnvVar(env_name));
        }
    }

    if lower.contains("no route") || lower.contains("connection refused") {
        return Some(Hint::SuggestLinkUp);
    }
    if lower.contains("unauthorized") || lower.contains("token expired") {
        return Some(Hint::SuggestCredentialRefresh);
    }
    None
}

#[cfg(test)]
#[path = "hints_tests.rs"]
mod tests;
