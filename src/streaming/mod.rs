//! SSE (Server-Sent Events) streaming
//!
//! Line buffering for upstream provider streams, the event type relayed to
//! clients, and the relay that connects the two.

pub mod relay;

use bytes::Bytes;
use serde_json::json;

pub use relay::relay;

/// Final line of every successful stream
pub const DONE_MARKER: &str = "[DONE]";

/// One event on the client-facing stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A fragment of generated text
    Content(String),
    /// The generation failed; nothing follows
    Error(String),
    /// The generation finished; nothing follows
    Done,
}

impl StreamEvent {
    /// Encode as one SSE `data:` frame
    pub fn to_sse(&self) -> Bytes {
        let payload = match self {
            StreamEvent::Content(text) => json!({ "content": text }).to_string(),
            StreamEvent::Error(message) => json!({ "error": message }).to_string(),
            StreamEvent::Done => DONE_MARKER.to_string(),
        };
        Bytes::from(format!("data: {}\n\n", payload))
    }
}

/// Reassembles upstream SSE lines from arbitrarily split byte chunks.
///
/// Bytes are kept until a `\n` arrives, so a multi-byte character cut by a
/// chunk boundary decodes intact. Lines come back without their `\r\n` or
/// `\n` terminator; blank separator lines are dropped.
///
/// ```
/// use sketchgen::streaming::SseLineBuffer;
///
/// let mut buffer = SseLineBuffer::new();
/// assert!(buffer.feed("data: {\"content\":\"流程".as_bytes()).is_empty());
/// assert_eq!(buffer.feed("图\"}\r\n".as_bytes()), vec!["data: {\"content\":\"流程图\"}"]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Consume the buffer, returning a final line the body never terminated
    pub fn finish(self) -> Option<String> {
        let line = self.pending.strip_suffix(b"\r").unwrap_or(&self.pending[..]);
        (!line.is_empty()).then(|| String::from_utf8_lossy(line).into_owned())
    }
}
