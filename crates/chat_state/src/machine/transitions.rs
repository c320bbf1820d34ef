//! Session transitions - the deterministic fold
//!
//! Implements the event-driven fold that is the single writer of session
//! state. Inputs arrive strictly in the order the stream ingestion engine
//! emits them.

use chat_core::{Message, StreamEvent};
use serde::Serialize;
use uuid::Uuid;

use super::states::SessionPhase;

/// Fixed user-facing reply appended on any failure.
pub const ERROR_REPLY: &str = "Sorry, an error occurred. Please try again.";

/// The inputs the fold accepts.
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// User submitted a prompt (already trimmed).
    Submit { prompt: String },
    /// A classified protocol event from the engine.
    Event(StreamEvent),
    /// The engine failed outside the protocol (request, transport, or a
    /// stream that ended without a terminal event).
    Failure { diagnostic: String },
}

/// Record of one applied fold step.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The phase before the transition.
    pub from: SessionPhase,
    /// The phase after the transition.
    pub to: SessionPhase,
    /// The input that was folded.
    pub input: SessionInput,
    /// Whether the fold changed any session state at all. `false` means
    /// the input was a no-op (guard rejected it, or it was diagnostic
    /// only).
    pub changed: bool,
}

/// The full state of one conversation, plus its fold.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Identifier of this session (one per process run).
    id: Uuid,
    /// Ordered conversation turns, append-only.
    messages: Vec<Message>,
    /// Progress strings for the in-flight request, reset on submit.
    status_feed: Vec<String>,
    phase: SessionPhase,
    /// Next message id; messages are ordered by creation.
    next_message_id: u64,
    /// Fold history (limited), for debugging.
    #[serde(skip)]
    history: Vec<StateTransition>,
    #[serde(skip)]
    max_history: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            status_feed: Vec::new(),
            phase: SessionPhase::Idle,
            next_message_id: 1,
            history: Vec::new(),
            max_history: 50,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True exactly while a request is outstanding.
    pub fn pending(&self) -> bool {
        self.phase == SessionPhase::Awaiting
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn status_feed(&self) -> &[String] {
        &self.status_feed
    }

    /// Get the fold history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Transition 1: submit a prompt.
    ///
    /// Guarded twice: the trimmed input must be non-empty, and the phase
    /// must be `Idle` (a submit while `Awaiting` is a no-op, not queued).
    /// On success the trimmed prompt is returned for the caller to send;
    /// the user message is appended, the status feed cleared, and the
    /// session moves to `Awaiting`.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let prompt = input.trim();
        if prompt.is_empty() || !self.phase.accepts_user_input() {
            tracing::debug!(phase = ?self.phase, "submit rejected by guard");
            self.record(
                SessionInput::Submit {
                    prompt: prompt.to_string(),
                },
                self.phase,
                false,
            );
            return None;
        }

        let from = self.phase;
        let message = Message::user(self.take_message_id(), prompt);
        self.messages.push(message);
        self.status_feed.clear();
        self.phase = SessionPhase::Awaiting;

        tracing::debug!(session = %self.id, "submit accepted, awaiting response");
        self.record(
            SessionInput::Submit {
                prompt: prompt.to_string(),
            },
            from,
            true,
        );
        Some(prompt.to_string())
    }

    /// Transitions 2-4 and 6: fold one classified protocol event.
    pub fn fold(&mut self, event: StreamEvent) -> StateTransition {
        let from = self.phase;
        let changed = match &event {
            StreamEvent::Status { message } => {
                if self.pending() {
                    self.status_feed.push(message.clone());
                    true
                } else {
                    tracing::warn!("status event while idle, ignored");
                    false
                }
            }
            StreamEvent::Result { content } => {
                if self.pending() {
                    let message = Message::assistant(self.take_message_id(), content.clone());
                    self.messages.push(message);
                    self.phase = SessionPhase::Idle;
                    true
                } else {
                    tracing::warn!("result event while idle, ignored");
                    false
                }
            }
            StreamEvent::Error { message } => {
                if self.pending() {
                    self.apply_failure(message.clone());
                    true
                } else {
                    tracing::warn!("error event while idle, ignored");
                    false
                }
            }
            StreamEvent::Malformed { raw } => {
                // Diagnostic only: never reaches messages or the feed.
                tracing::debug!(raw = %raw, "malformed protocol line");
                false
            }
        };
        self.record(SessionInput::Event(event), from, changed)
    }

    /// Transition 5: the engine failed without a protocol-level error
    /// event. Same user-visible effect as an `error` event, with the
    /// failure's diagnostic text in place of the payload.
    pub fn fail(&mut self, diagnostic: impl Into<String>) -> StateTransition {
        let diagnostic = diagnostic.into();
        let from = self.phase;
        let changed = if self.pending() {
            self.apply_failure(diagnostic.clone());
            true
        } else {
            false
        };
        self.record(SessionInput::Failure { diagnostic }, from, changed)
    }

    fn apply_failure(&mut self, diagnostic: String) {
        self.status_feed.push(diagnostic);
        let message = Message::assistant(self.take_message_id(), ERROR_REPLY);
        self.messages.push(message);
        self.phase = SessionPhase::Idle;
    }

    fn take_message_id(&mut self) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }

    fn record(&mut self, input: SessionInput, from: SessionPhase, changed: bool) -> StateTransition {
        let transition = StateTransition {
            from,
            to: self.phase,
            input,
            changed,
        };
        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
        transition
    }
}
