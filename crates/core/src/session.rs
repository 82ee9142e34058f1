// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session data model (§3).

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Stable identifier for a conversation within a workspace.
    pub struct SessionId("ses-");
}

/// The age beyond which a session becomes eligible for cleanup.
pub const STALENESS_THRESHOLD_MS: u64 = 24 * 60 * 60 * 1000;

/// A conversation within a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub persona: String,
    pub project: Option<String>,
    pub active_issue_key: Option<String>,
    pub branch: Option<String>,
    pub created_at_ms: u64,
    pub last_activity_ms: u64,
}

impl Session {
    pub fn new(persona: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id: SessionId::new(),
            persona: persona.into(),
            project: None,
            active_issue_key: None,
            branch: None,
            created_at_ms: now_ms,
            last_activity_ms: now_ms,
        }
    }

    /// Record activity at the given time.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    /// Whether this session's last activity is older than `threshold_ms`.
    pub fn is_stale(&self, now_ms: u64, threshold_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_activity_ms) >= threshold_ms
    }
}

crate::builder! {
    pub struct SessionBuilder => Session {
        into {
            persona: String = "developer",
        }
        set {
            project: Option<String> = None,
            active_issue_key: Option<String> = None,
            branch: Option<String> = None,
            created_at_ms: u64 = 0,
            last_activity_ms: u64 = 0,
        }
        computed {
            id: SessionId = SessionId::new(),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
