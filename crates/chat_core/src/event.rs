//! StreamEvent - A single decoded protocol unit from the backend
//!
//! Produced by the stream ingestion engine, consumed immediately by the
//! session fold, never retained.

/// One classified protocol event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// Human-readable progress update for the status feed.
    Status { message: String },
    /// The final answer text. Terminal.
    Result { content: String },
    /// The backend explicitly reported a failure. Terminal.
    Error { message: String },
    /// A protocol line that failed to parse. Diagnostic only, never shown
    /// to the end user.
    Malformed { raw: String },
}

impl StreamEvent {
    /// A terminal event ends the stream's logical lifetime.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result { .. } | Self::Error { .. })
    }

    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Result { .. } => "result",
            Self::Error { .. } => "error",
            Self::Malformed { .. } => "malformed",
        }
    }
}
