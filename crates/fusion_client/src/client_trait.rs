//! Backend trait - one abstract capability, two wire shapes

use std::pin::Pin;

use async_trait::async_trait;
use chat_core::StreamEvent;
use futures_util::Stream;

use crate::error::EngineError;

/// A lazy, single-pass, forward-only sequence of classified events.
///
/// The sequence is finite: it ends at the first terminal event or when the
/// transport signals completion, whichever comes first. It is not
/// restartable; issue a new request for a new sequence. Dropping it closes
/// the underlying transport and discards any buffered partial line.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, EngineError>> + Send>>;

/// The one capability both backend shapes implement:
/// `issue(prompt) -> sequence of StreamEvent`.
#[async_trait]
pub trait FusionBackend: Send + Sync {
    /// Issue the outbound request for one prompt.
    ///
    /// Fails with [`EngineError::RequestFailed`] on a non-success response
    /// status, before any event is produced.
    async fn issue(&self, prompt: &str) -> Result<EventStream, EngineError>;
}
