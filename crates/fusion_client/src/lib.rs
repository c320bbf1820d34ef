//! fusion_client - Stream ingestion engine for the fusion backend
//!
//! Turns a byte-oriented response body into an ordered, lazy, single-pass
//! sequence of [`chat_core::StreamEvent`] values, tolerating partial
//! delivery and malformed lines without losing synchronization. Two backend
//! shapes are supported behind one trait: the streaming endpoint
//! (`data: <json>` lines) and the batch endpoint (one JSON object, surfaced
//! as a single synthetic `result` event).

pub mod client;
pub mod client_trait;
pub mod error;
pub mod framing;

pub use client::{backend_for, BatchBackend, StreamingBackend};
pub use client_trait::{EventStream, FusionBackend};
pub use error::EngineError;
