//! chat_state - State machine for the chat session lifecycle
//!
//! This crate owns the session data (`messages`, `status_feed`, `pending`)
//! and is its single writer: every change goes through the enumerated
//! transitions in `machine`, never through ad hoc field writes.

pub mod machine;

// Re-export commonly used types
pub use machine::{ERROR_REPLY, Session, SessionInput, SessionPhase, StateTransition};
