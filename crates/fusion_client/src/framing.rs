//! Line framing and event classification
//!
//! The backend writes `data: <json>\n` lines, but the transport delivers
//! arbitrary byte chunks: a chunk boundary can split the `data: ` prefix,
//! a JSON value, or a multi-byte UTF-8 sequence. The frame buffer
//! accumulates raw bytes and releases only complete newline-terminated
//! lines, so decoding always sees whole lines.

use bytes::BytesMut;
use chat_core::StreamEvent;
use serde::Deserialize;

/// Prefix that marks a protocol line.
const DATA_PREFIX: &str = "data: ";

/// Wire payload carried by one protocol line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePayload {
    Status { message: String },
    Result { content: String },
    Error { message: String },
}

/// Accumulation buffer for partially delivered lines.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buffer: BytesMut,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete line it finishes.
    ///
    /// The trailing fragment after the last newline stays buffered for the
    /// next arrival.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line = self.buffer.split_to(pos + 1);
            line.truncate(pos);
            let bytes: &[u8] = line.strip_suffix(b"\r").unwrap_or(&line[..]);
            lines.push(String::from_utf8_lossy(bytes).into_owned());
        }
        lines
    }

    /// Bytes of the final, never-terminated fragment. Only used for
    /// diagnostics when the transport ends.
    pub fn remainder(&self) -> &[u8] {
        &self.buffer
    }
}

/// Classify one complete line.
///
/// Returns `None` for anything that is not a protocol line (blank
/// keep-alives and the like). A protocol line that fails to parse, or
/// carries an unknown discriminant, classifies as `Malformed`.
pub fn classify_line(line: &str) -> Option<StreamEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    match serde_json::from_str::<WirePayload>(payload) {
        Ok(WirePayload::Status { message }) => Some(StreamEvent::Status { message }),
        Ok(WirePayload::Result { content }) => Some(StreamEvent::Result { content }),
        Ok(WirePayload::Error { message }) => Some(StreamEvent::Error { message }),
        Err(err) => {
            log::debug!("unparsable protocol line ({}): {}", err, line);
            Some(StreamEvent::Malformed {
                raw: line.to_string(),
            })
        }
    }
}
