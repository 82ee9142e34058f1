// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Bus outbound message families (C8, §4.8) and inbound control
//! messages, tagged by `type` on the wire per §6.2.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use warden_core::event::{ConfirmationId, ExecutionId, MemoryQueryId};

/// Every event family the bus fans out, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SkillStarted {
        skill_id: ExecutionId,
        name: String,
        step_count: usize,
        inputs: IndexMap<String, serde_json::Value>,
    },
    SkillCompleted {
        skill_id: ExecutionId,
        name: String,
        step_count: usize,
        duration_secs: f64,
    },
    SkillFailed {
        skill_id: ExecutionId,
        name: String,
        step_count: usize,
        duration_secs: f64,
        error: String,
    },
    StepStarted {
        skill_id: ExecutionId,
        step_index: usize,
        name: String,
    },
    StepCompleted {
        skill_id: ExecutionId,
        step_index: usize,
        name: String,
        duration_secs: f64,
    },
    StepFailed {
        skill_id: ExecutionId,
        step_index: usize,
        name: String,
        duration_secs: f64,
        error: String,
    },
    StepSkipped {
        skill_id: ExecutionId,
        step_index: usize,
        name: String,
    },
    HealTriggered {
        skill_id: Option<ExecutionId>,
        tool_name: String,
        class: String,
        fix_action: String,
    },
    HealCompleted {
        skill_id: Option<ExecutionId>,
        tool_name: String,
        class: String,
        fix_action: String,
        success: bool,
    },
    ConfirmationRequired {
        id: ConfirmationId,
        prompt: String,
        options: Vec<String>,
        default: String,
        claude_suggestion: Option<String>,
        timeout_secs: u64,
    },
    ConfirmationAnswered {
        id: ConfirmationId,
        response: String,
    },
    ConfirmationExpired {
        id: ConfirmationId,
        default: String,
    },
    MemoryQueryStarted {
        id: MemoryQueryId,
        query: String,
    },
    MemoryQueryCompleted {
        id: MemoryQueryId,
        query: String,
        sources: Vec<String>,
        latency_secs: f64,
    },
    MemoryQueryIntentClassified {
        id: MemoryQueryId,
        query: String,
        intent: String,
    },
}

/// Inbound messages the bus accepts from a connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    Heartbeat,
    ConfirmationResponse {
        id: ConfirmationId,
        response: String,
        #[serde(default)]
        remember: bool,
    },
    PauseTimer {
        id: ConfirmationId,
    },
    ResumeTimer {
        id: ConfirmationId,
    },
}

/// The bus's greeting sent immediately on a new connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "hello")]
pub struct Hello {
    pub running_skills: Vec<ExecutionId>,
    pub pending_confirmations: Vec<ConfirmationId>,
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
