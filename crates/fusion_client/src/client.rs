//! Backend implementations for the two observed wire shapes

use async_stream::try_stream;
use async_trait::async_trait;
use chat_core::{Config, StreamEvent};
use futures_util::StreamExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::client_trait::{EventStream, FusionBackend};
use crate::error::EngineError;
use crate::framing::{classify_line, FrameBuffer};

/// Outbound request body, fixed by the backend contract.
#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

/// Batch endpoint response: one JSON object carrying the final combined
/// answer.
#[derive(Deserialize)]
struct GenerateResponse {
    content: String,
}

/// Pick the backend the configuration asks for.
pub fn backend_for(config: &Config) -> Box<dyn FusionBackend> {
    if config.streaming {
        Box::new(StreamingBackend::new(config))
    } else {
        Box::new(BatchBackend::new(config))
    }
}

/// Streaming shape: a continuous body of `data: <json>` lines.
pub struct StreamingBackend {
    http: reqwest::Client,
    url: String,
}

impl StreamingBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.stream_url(),
        }
    }
}

#[async_trait]
impl FusionBackend for StreamingBackend {
    async fn issue(&self, prompt: &str) -> Result<EventStream, EngineError> {
        info!("POST {} (streaming)", self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&PromptRequest { prompt })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::RequestFailed { status });
        }

        let stream: EventStream = Box::pin(try_stream! {
            let mut body = response.bytes_stream();
            let mut frames = FrameBuffer::new();

            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                for line in frames.push(&chunk) {
                    if let Some(event) = classify_line(&line) {
                        debug!("classified {} event", event.kind());
                        let terminal = event.is_terminal();
                        yield event;
                        if terminal {
                            // Terminal event ends the sequence; the rest of
                            // the body is dropped with the transport.
                            return;
                        }
                    }
                }
            }

            if !frames.remainder().is_empty() {
                debug!(
                    "transport ended with {} unterminated bytes buffered",
                    frames.remainder().len()
                );
            }
        });
        Ok(stream)
    }
}

/// Batch shape: a single JSON response, surfaced as a one-element sequence
/// yielding a synthetic `result` event.
pub struct BatchBackend {
    http: reqwest::Client,
    url: String,
}

impl BatchBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.generate_url(),
        }
    }
}

#[async_trait]
impl FusionBackend for BatchBackend {
    async fn issue(&self, prompt: &str) -> Result<EventStream, EngineError> {
        info!("POST {} (batch)", self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&PromptRequest { prompt })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::RequestFailed { status });
        }

        let reply: GenerateResponse = response.json().await?;
        let stream: EventStream = Box::pin(futures_util::stream::once(async move {
            Ok(StreamEvent::Result {
                content: reply.content,
            })
        }));
        Ok(stream)
    }
}
