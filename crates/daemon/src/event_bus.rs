// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Event Bus (C8, §4.8): a localhost WebSocket acceptor that fans
//! skill/step/heal/confirmation/memory-query events out to every connected
//! client and resolves the Skill Engine's `request_confirmation` futures
//! from client responses.
//!
//! Three separate [`parking_lot::Mutex`]es guard clients, running skills,
//! and pending confirmations (§5 "distinct mutexes... so a slow consumer on
//! one set cannot stall the others") rather than one lock over a combined
//! struct.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use indexmap::IndexMap;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use warden_core::event::ExecutionId;
use warden_engine::traits::{ConfirmationSource, EventSink};
use warden_wire::{Event, Hello, InboundMessage};

use crate::registry::HealSink;

/// How often a pending confirmation's deadline is checked. Pausing a timer
/// simply stops ticks from counting toward the deadline.
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct RunningSkillSnapshot {
    name: String,
    step_count: usize,
}

struct PendingConfirmation {
    paused: AtomicBool,
    sender: Mutex<Option<oneshot::Sender<String>>>,
}

/// The Event Bus singleton. Cheap to clone via `Arc` and shared between the
/// skill engine (as [`EventSink`]/[`ConfirmationSource`]), the auto-heal
/// wrapper (as [`HealSink`]), and the WebSocket acceptor task.
pub struct EventBus {
    next_client_id: AtomicU64,
    clients: Mutex<IndexMap<u64, mpsc::UnboundedSender<Message>>>,
    running_skills: Mutex<IndexMap<ExecutionId, RunningSkillSnapshot>>,
    pending: Mutex<IndexMap<warden_core::event::ConfirmationId, Arc<PendingConfirmation>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            next_client_id: AtomicU64::new(0),
            clients: Mutex::new(IndexMap::new()),
            running_skills: Mutex::new(IndexMap::new()),
            pending: Mutex::new(IndexMap::new()),
        }
    }

    /// Bind `addr` and accept WebSocket connections until `cancel` fires.
    /// One task per connection; the accept loop itself never blocks on a
    /// slow client.
    pub async fn serve(self: Arc<Self>, addr: SocketAddr, cancel: CancellationToken) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "event bus listening");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("event bus accept loop stopping");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = accepted?;
                    let bus = Arc::clone(&self);
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        if let Err(err) = bus.handle_connection(stream, cancel).await {
                            tracing::warn!(%peer, error = %err, "event bus connection ended with an error");
                        }
                    });
                }
            }
        }
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: tokio::net::TcpStream,
        cancel: CancellationToken,
    ) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        let ws = tokio_tungstenite::accept_async(stream).await?;
        let (mut sink, mut stream) = ws.split();

        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        self.clients.lock().insert(id, tx);

        let hello = Hello {
            running_skills: self.running_skills.lock().keys().cloned().collect(),
            pending_confirmations: self.pending.lock().keys().cloned().collect(),
        };
        if let Ok(payload) = serde_json::to_string(&hello) {
            let _ = sink.send(Message::Text(payload.into())).await;
        }

        let outbound = async {
            while let Some(msg) = rx.recv().await {
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
        };

        let inbound = async {
            while let Some(Ok(msg)) = stream.next().await {
                if let Message::Text(text) = msg {
                    match serde_json::from_str::<InboundMessage>(&text) {
                        Ok(InboundMessage::Heartbeat) => {
                            if let Some(tx) = self.clients.lock().get(&id) {
                                let _ = tx.send(Message::Text("{\"type\":\"heartbeat_ack\"}".into()));
                            }
                        }
                        Ok(other) => self.handle_inbound(other),
                        Err(err) => tracing::warn!(error = %err, "dropping malformed event bus message"),
                    }
                }
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = outbound => {}
            _ = inbound => {}
        }

        self.clients.lock().shift_remove(&id);
        Ok(())
    }

    fn handle_inbound(&self, msg: InboundMessage) {
        match msg {
            InboundMessage::Heartbeat => {}
            InboundMessage::ConfirmationResponse { id, response, .. } => {
                if let Some(pending) = self.pending.lock().get(&id) {
                    if let Some(sender) = pending.sender.lock().take() {
                        let _ = sender.send(response);
                    }
                }
            }
            InboundMessage::PauseTimer { id } => {
                if let Some(pending) = self.pending.lock().get(&id) {
                    pending.paused.store(true, Ordering::Relaxed);
                }
            }
            InboundMessage::ResumeTimer { id } => {
                if let Some(pending) = self.pending.lock().get(&id) {
                    pending.paused.store(false, Ordering::Relaxed);
                }
            }
        }
    }

    /// Push `server_stopping` to every connected client and drop them,
    /// called from shutdown (§4.11).
    pub fn notify_stopping(&self) {
        self.broadcast_raw("{\"type\":\"server_stopping\"}");
        self.clients.lock().clear();
    }

    fn broadcast(&self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(payload) => self.broadcast_raw(&payload),
            Err(err) => tracing::warn!(error = %err, "failed to serialize event bus message"),
        }
    }

    fn broadcast_raw(&self, payload: &str) {
        let mut clients = self.clients.lock();
        clients.retain(|_, tx| tx.send(Message::Text(payload.to_string().into())).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn register_client_for_test(&self) -> mpsc::UnboundedReceiver<Message> {
        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.lock().insert(id, tx);
        rx
    }

    #[cfg(test)]
    pub(crate) fn inject_inbound_for_test(&self, msg: InboundMessage) {
        self.handle_inbound(msg);
    }
}

impl EventSink for EventBus {
    fn skill_started(
        &self,
        id: ExecutionId,
        name: &str,
        step_count: usize,
        inputs: &IndexMap<String, serde_json::Value>,
    ) {
        self.running_skills.lock().insert(id, RunningSkillSnapshot { name: name.to_string(), step_count });
        self.broadcast(&Event::SkillStarted { skill_id: id, name: name.to_string(), step_count, inputs: inputs.clone() });
    }

    fn skill_completed(&self, id: ExecutionId, name: &str, step_count: usize, duration_secs: f64) {
        self.running_skills.lock().shift_remove(&id);
        self.broadcast(&Event::SkillCompleted { skill_id: id, name: name.to_string(), step_count, duration_secs });
    }

    fn skill_failed(&self, id: ExecutionId, name: &str, step_count: usize, duration_secs: f64, error: &str) {
        self.running_skills.lock().shift_remove(&id);
        self.broadcast(&Event::SkillFailed {
            skill_id: id,
            name: name.to_string(),
            step_count,
            duration_secs,
            error: error.to_string(),
        });
    }

    fn step_started(&self, id: ExecutionId, step_index: usize, name: &str) {
        self.broadcast(&Event::StepStarted { skill_id: id, step_index, name: name.to_string() });
    }

    fn step_completed(&self, id: ExecutionId, step_index: usize, name: &str, duration_secs: f64) {
        self.broadcast(&Event::StepCompleted { skill_id: id, step_index, name: name.to_string(), duration_secs });
    }

    fn step_failed(&self, id: ExecutionId, step_index: usize, name: &str, duration_secs: f64, error: &str) {
        self.broadcast(&Event::StepFailed {
            skill_id: id,
            step_index,
            name: name.to_string(),
            duration_secs,
            error: error.to_string(),
        });
    }

    fn step_skipped(&self, id: ExecutionId, step_index: usize, name: &str) {
        self.broadcast(&Event::StepSkipped { skill_id: id, step_index, name: name.to_string() });
    }
}

#[async_trait]
impl ConfirmationSource for EventBus {
    /// §4.8 confirmation flow: create a pending record, fan out
    /// `confirmation_required`, and block this step's executor (not the
    /// whole bus) until a client answers or the deadline — measured in
    /// unpaused ticks — elapses.
    async fn request_confirmation(
        &self,
        _skill_id: ExecutionId,
        _step_index: usize,
        prompt: &str,
        options: &[String],
        default: &str,
        timeout_secs: u64,
    ) -> String {
        let id = warden_core::event::ConfirmationId::new();
        let (tx, mut rx) = oneshot::channel::<String>();
        let pending = Arc::new(PendingConfirmation { paused: AtomicBool::new(false), sender: Mutex::new(Some(tx)) });
        self.pending.lock().insert(id, Arc::clone(&pending));

        self.broadcast(&Event::ConfirmationRequired {
            id,
            prompt: prompt.to_string(),
            options: options.to_vec(),
            default: default.to_string(),
            claude_suggestion: None,
            timeout_secs,
        });

        let max_ticks = ((timeout_secs * 1000) / TICK.as_millis() as u64).max(1);
        let mut elapsed_ticks: u64 = 0;
        let answer = loop {
            match tokio::time::timeout(TICK, &mut rx).await {
                Ok(Ok(response)) => break Some(response),
                Ok(Err(_)) => break None,
                Err(_) => {
                    if !pending.paused.load(Ordering::Relaxed) {
                        elapsed_ticks += 1;
                    }
                    if elapsed_ticks >= max_ticks {
                        break None;
                    }
                }
            }
        };

        self.pending.lock().shift_remove(&id);
        match answer {
            Some(response) => {
                self.broadcast(&Event::ConfirmationAnswered { id, response: response.clone() });
                response
            }
            None => {
                self.broadcast(&Event::ConfirmationExpired { id, default: default.to_string() });
                default.to_string()
            }
        }
    }
}

impl HealSink for EventBus {
    fn heal_triggered(&self, tool_name: &str, class: &str, fix_action: &str) {
        self.broadcast(&Event::HealTriggered {
            skill_id: None,
            tool_name: tool_name.to_string(),
            class: class.to_string(),
            fix_action: fix_action.to_string(),
        });
    }

    fn heal_completed(&self, tool_name: &str, class: &str, fix_action: &str, success: bool) {
        self.broadcast(&Event::HealCompleted {
            skill_id: None,
            tool_name: tool_name.to_string(),
            class: class.to_string(),
            fix_action: fix_action.to_string(),
            success,
        });
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
