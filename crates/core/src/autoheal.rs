// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure failure classification for the Auto-Heal Wrapper (C6).
//!
//! The retry loop, fix dispatch, and failure-pattern logging live in
//! `warden_daemon::registry::autoheal`; this module only holds the
//! classification and cluster-inference rules so they can be tested without
//! a running daemon.

/// Known cluster labels the auth fix can target.
pub const KNOWN_CLUSTERS: &[&str] = &["stage", "prod", "ephemeral", "konflux"];

/// A classified failure, or the absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    Auth,
    Network,
    Unknown,
    None,
}

crate::simple_display!(FailureClass {
    Auth => "auth",
    Network => "network",
    Unknown => "unknown",
    None => "none",
});

impl FailureClass {
    /// Classify a tool's output/exception text by case-insensitive substring match.
    ///
    /// `None` means the tool did not fail at all; `Unknown` means it failed
    /// but matched neither the auth nor network rule table.
    pub fn classify(failed: bool, body: &str) -> Self {
        if !failed {
            return Self::None;
        }
        let lower = body.to_lowercase();
        const AUTH_MARKERS: &[&str] =
            &["unauthorized", "401", "403", "token expired", "permission denied"];
        const NETWORK_MARKERS: &[&str] =
            &["no route to host", "connection refused", "timeout", "dial tcp"];

        if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::Auth
        } else if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::Network
        } else {
            Self::Unknown
        }
    }

    /// Whether this class has a known fix action mapped to it.
    pub fn is_fixable(self) -> bool {
        matches!(self, Self::Auth | Self::Network)
    }
}

/// Infer the target cluster for the auth fix from a tool's name and output,
/// per the output-match-first precedence (§9 open question resolution).
///
/// Scans the output first, then the tool name, for one of [`KNOWN_CLUSTERS`];
/// falls back to `default_cluster` if neither mentions a known label.
pub fn infer_cluster<'a>(tool_name: &str, output: &str, default_cluster: &'a str) -> &'a str {
    let output_lower = output.to_lowercase();
    if let Some(found) = KNOWN_CLUSTERS.iter().find(|c| output_lower.contains(*c)) {
        return found;
    }
    let name_lower = tool_name.to_lowercase();
    if let Some(found) = KNOWN_CLUSTERS.iter().find(|c| name_lower.contains(*c)) {
        return found;
    }
    default_cluster
}

#[cfg(test)]
#[path = "autoheal_tests.rs"]
mod tests;
