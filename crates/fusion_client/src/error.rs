//! Engine error taxonomy

use thiserror::Error;

/// Failures the engine can surface to its caller.
///
/// Malformed protocol lines are not errors: they become
/// [`chat_core::StreamEvent::Malformed`] events and are swallowed after
/// logging. Backend-reported errors arrive as `error` events, not here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Non-success response status at open time, before any event.
    #[error("request failed with status {status}")]
    RequestFailed { status: reqwest::StatusCode },

    /// Transport-level I/O failure at open time or mid-stream.
    #[error("transport failed: {0}")]
    TransportFailed(#[from] reqwest::Error),

    /// The transport closed cleanly but no `result` or `error` event was
    /// ever seen. Detected by the caller driving the stream.
    #[error("stream ended without a terminal event")]
    StreamEndedWithoutTerminal,
}

pub type Result<T> = std::result::Result<T, EngineError>;
