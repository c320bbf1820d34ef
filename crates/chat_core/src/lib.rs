//! chat_core - Core types shared across the fusion chat crates
//!
//! This crate provides the foundational types used by the other crates:
//! - `message` - Message and Role for conversation turns
//! - `event` - StreamEvent, the decoded protocol unit from the backend
//! - `config` - Backend endpoint configuration

pub mod config;
pub mod event;
pub mod message;

// Re-export commonly used types
pub use config::Config;
pub use event::StreamEvent;
pub use message::{Message, Role};
