//! # Session Manager
//!
//! Owns one [`chat_state::Session`] and the single active engine instance,
//! and drives classified events from the engine into the session fold in
//! strict emission order. Single-flight by supersession: opening a new
//! request first cancels the previous one.

pub mod manager;

// Re-exports
pub use manager::ChatSession;
