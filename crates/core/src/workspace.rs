// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace data model (§3, C3).
//!
//! A workspace is identified by an opaque URI supplied by the host client.
//! Persistence (the single JSON file, the 5 s throttle) lives in
//! `warden_storage::workspace_registry`; this module only holds the data
//! shape and its pure invariants.

use crate::session::{Session, SessionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A client workspace: current persona, detected project, and its sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub uri: String,
    pub persona: String,
    pub project: Option<String>,
    pub sessions: IndexMap<SessionId, Session>,
    pub active_session: Option<SessionId>,
    #[serde(default)]
    pub tool_filter_cache: Vec<String>,
}

impl Workspace {
    pub fn new(uri: impl Into<String>, default_persona: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            persona: default_persona.into(),
            project: None,
            sessions: IndexMap::new(),
            active_session: None,
            tool_filter_cache: Vec::new(),
        }
    }

    /// Add a session, making it active.
    pub fn add_session(&mut self, session: Session) -> SessionId {
        let id = session.id;
        self.sessions.insert(id, session);
        self.active_session = Some(id);
        id
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active_session.and_then(|id| self.sessions.get(&id))
    }

    /// Remove every session older than `threshold_ms`, never removing the
    /// active session even if it qualifies.
    pub fn cleanup_stale(&mut self, now_ms: u64, threshold_ms: u64) -> Vec<SessionId> {
        let active = self.active_session;
        let stale: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|(id, session)| Some(**id) != active && session.is_stale(now_ms, threshold_ms))
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            self.sessions.shift_remove(id);
        }
        stale
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
