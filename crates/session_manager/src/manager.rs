//! ChatSession - the session controller
//!
//! The session state machine never performs I/O and the engine never
//! mutates session state; this controller is the seam between them. It is
//! the only holder of `&mut Session`, so the single-writer discipline the
//! fold relies on holds by construction.

use std::time::Duration;

use chat_core::{Config, Message};
use chat_state::Session;
use fusion_client::{backend_for, EngineError, EventStream, FusionBackend};
use futures_util::StreamExt;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

pub struct ChatSession {
    session: Session,
    backend: Box<dyn FusionBackend>,
    idle_timeout: Duration,
    /// Cancellation handle for the active engine instance, if any.
    /// At most one engine may be active per session; submit performs
    /// release-before-acquire on this slot.
    active: Option<CancellationToken>,
}

impl ChatSession {
    pub fn new(config: &Config) -> Self {
        Self::with_backend(
            backend_for(config),
            Duration::from_secs(config.idle_timeout_secs),
        )
    }

    /// Build a controller around any backend. Used by the batch/stream
    /// selection in `new` and by tests that script the engine.
    pub fn with_backend(backend: Box<dyn FusionBackend>, idle_timeout: Duration) -> Self {
        Self {
            session: Session::new(),
            backend,
            idle_timeout,
            active: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn status_feed(&self) -> &[String] {
        self.session.status_feed()
    }

    pub fn pending(&self) -> bool {
        self.session.pending()
    }

    /// Submit a prompt and drive the resulting event sequence to its end.
    ///
    /// Returns `false` when the guard rejected the input (empty prompt, or
    /// a request already outstanding); the session is untouched in that
    /// case. Every failure path folds into the session as the fixed error
    /// reply, so the session is always `Idle` when this returns `true`.
    pub async fn submit(&mut self, input: &str) -> bool {
        let Some(prompt) = self.session.submit(input) else {
            return false;
        };

        // Cancel-then-replace: release the previous engine instance before
        // acquiring a new one.
        if let Some(previous) = self.active.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.active = Some(token.clone());

        let opened = self.backend.issue(&prompt).await;
        match opened {
            Ok(stream) => self.drive(stream, token).await,
            Err(err) => {
                warn!("engine failed to open: {err}");
                self.session.fail(err.to_string());
            }
        }
        self.active = None;
        true
    }

    /// Cancel the outstanding request, if any.
    ///
    /// Closes the transport immediately; session state already folded from
    /// earlier events stays as it is. A session left `Awaiting` by an
    /// abandoned request is folded back to `Idle`.
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
        if self.session.pending() {
            self.session.fail("request cancelled");
        }
    }

    /// Fold events in emission order until a terminal event, failure,
    /// cancellation, inactivity timeout, or end of stream.
    async fn drive(&mut self, mut stream: EventStream, token: CancellationToken) {
        loop {
            let step = tokio::select! {
                _ = token.cancelled() => {
                    debug!("engine superseded, dropping transport");
                    return;
                }
                step = tokio::time::timeout(self.idle_timeout, stream.next()) => step,
            };

            match step {
                Err(_) => {
                    warn!(
                        "no engine activity for {}s, treating as transport failure",
                        self.idle_timeout.as_secs()
                    );
                    self.session
                        .fail(format!("no activity for {}s", self.idle_timeout.as_secs()));
                    return;
                }
                Ok(None) => {
                    // Clean transport end with no terminal event: implicit
                    // error, the session must not hang in Awaiting.
                    self.session
                        .fail(EngineError::StreamEndedWithoutTerminal.to_string());
                    return;
                }
                Ok(Some(Ok(event))) => {
                    let terminal = event.is_terminal();
                    self.session.fold(event);
                    if terminal {
                        return;
                    }
                }
                Ok(Some(Err(err))) => {
                    warn!("engine stream failed: {err}");
                    self.session.fail(err.to_string());
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chat_core::StreamEvent;
    use chat_state::ERROR_REPLY;

    /// Engine double that yields a scripted event sequence.
    struct Scripted {
        events: Vec<StreamEvent>,
    }

    #[async_trait]
    impl FusionBackend for Scripted {
        async fn issue(&self, _prompt: &str) -> Result<EventStream, EngineError> {
            let events = self.events.clone();
            let stream: EventStream = Box::pin(futures_util::stream::iter(
                events.into_iter().map(Ok::<_, EngineError>),
            ));
            Ok(stream)
        }
    }

    /// Engine double whose stream never produces anything.
    struct Stalled;

    #[async_trait]
    impl FusionBackend for Stalled {
        async fn issue(&self, _prompt: &str) -> Result<EventStream, EngineError> {
            let stream: EventStream =
                Box::pin(futures_util::stream::pending::<Result<StreamEvent, EngineError>>());
            Ok(stream)
        }
    }

    fn scripted(events: Vec<StreamEvent>) -> ChatSession {
        ChatSession::with_backend(Box::new(Scripted { events }), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_scripted_round_trip() {
        let mut chat = scripted(vec![
            StreamEvent::Status {
                message: "Thinking...".into(),
            },
            StreamEvent::Result {
                content: "Recursion is...".into(),
            },
        ]);

        assert!(chat.submit("Explain recursion").await);
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].content, "Recursion is...");
        assert_eq!(chat.status_feed(), ["Thinking..."]);
        assert!(!chat.pending());
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let mut chat = scripted(vec![]);
        assert!(!chat.submit("   ").await);
        assert!(chat.messages().is_empty());
    }

    #[tokio::test]
    async fn test_stream_end_without_terminal_folds_failure() {
        let mut chat = scripted(vec![StreamEvent::Status {
            message: "only status".into(),
        }]);

        chat.submit("q").await;

        assert!(!chat.pending());
        assert_eq!(chat.messages()[1].content, ERROR_REPLY);
        assert_eq!(
            chat.status_feed().last().unwrap(),
            "stream ended without a terminal event"
        );
    }

    #[tokio::test]
    async fn test_inactivity_timeout_folds_failure() {
        let mut chat =
            ChatSession::with_backend(Box::new(Stalled), Duration::from_millis(50));

        chat.submit("q").await;

        assert!(!chat.pending());
        assert_eq!(chat.messages()[1].content, ERROR_REPLY);
        assert!(chat.status_feed().last().unwrap().contains("no activity"));
    }

    #[tokio::test]
    async fn test_cancel_when_idle_is_a_no_op() {
        let mut chat = scripted(vec![]);
        chat.cancel();
        assert!(chat.messages().is_empty());
        assert!(!chat.pending());
    }

    #[tokio::test]
    async fn test_sessions_survive_failure_and_accept_next_submit() {
        let mut chat = scripted(vec![StreamEvent::Error {
            message: "backend down".into(),
        }]);

        chat.submit("first").await;
        assert!(!chat.pending());
        assert_eq!(chat.messages()[1].content, ERROR_REPLY);

        // Ready for the next submit; the feed resets.
        chat.submit("second").await;
        assert_eq!(chat.messages().len(), 4);
    }
}
