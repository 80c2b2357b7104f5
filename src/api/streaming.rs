//! Streaming Support
//!
//! Line framing and payload parsing for the backend's `data: {json}` event stream.

use crate::api::query::ChatMessage;
use crate::error::{ChatStreamError, Result};
use crate::ingest::EventSink;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix that marks a line as an event frame
pub const DATA_PREFIX: &str = "data: ";

/// Payload carried by one `data: ` frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Discriminant: "assistant", "error", or anything else (ignored)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Text carried by the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl EventPayload {
    /// Read a payload from a parsed frame, leniently
    ///
    /// Returns `None` when the frame is not a JSON object. A `type` that is not a string
    /// is ignored. Numeric and boolean `content` is taken as its JSON text; null, arrays
    /// and objects count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let kind = object.get("type").and_then(Value::as_str).map(str::to_owned);
        let content = object.get("content").and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(_) | Value::Bool(_) => Some(c.to_string()),
            _ => None,
        });

        Some(Self { kind, content })
    }

    /// Decide what, if anything, this payload dispatches
    pub fn into_event(self) -> Option<StreamEvent> {
        match self.kind.as_deref() {
            Some("assistant") => self
                .content
                .filter(|c| !c.is_empty())
                .map(StreamEvent::Chunk),
            Some("error") => Some(StreamEvent::Error(self.content.unwrap_or_default())),
            _ => None,
        }
    }
}

/// A dispatched stream event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Assistant content to append to the reply
    Chunk(String),

    /// Error reported in-band by the backend
    Error(String),
}

impl StreamEvent {
    /// Deliver this event to a sink
    pub fn dispatch<S: EventSink + ?Sized>(&self, sink: &mut S) {
        match self {
            StreamEvent::Chunk(content) => sink.on_chunk(content),
            StreamEvent::Error(content) => sink.on_error(content),
        }
    }
}

/// Parse one complete line into a StreamEvent
///
/// Lines without the exact `data: ` prefix are not frames and yield `Ok(None)`, as do
/// frames whose payload dispatches nothing. Malformed JSON and a bare `null` yield
/// `FrameParse`. With duplicate keys the last one wins.
pub fn parse_sse_line(line: &str) -> Result<Option<StreamEvent>> {
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    let value: Value = serde_json::from_str(data).map_err(|e| {
        ChatStreamError::FrameParse(format!("Failed to parse SSE data: {}. Data: {}", e, data))
    })?;

    if value.is_null() {
        return Err(ChatStreamError::FrameParse(format!(
            "SSE data is null. Data: {}",
            data
        )));
    }

    Ok(EventPayload::from_value(&value).and_then(EventPayload::into_event))
}

/// Accumulates decoded text and releases only newline-terminated lines
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and drain every line whose terminator has been seen
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(text);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let mut complete = std::mem::replace(&mut self.buffer, rest);
        complete.pop(); // trailing '\n'

        complete.split('\n').map(str::to_owned).collect()
    }

    /// Text received after the last line terminator
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Consume the framer, returning the unterminated remainder
    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Sink that assembles assistant chunks into a single reply
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Accumulated assistant content
    pub content: String,

    /// In-band errors reported by the backend, in order
    pub errors: Vec<String>,

    /// Number of content chunks received
    pub chunks: usize,
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the backend reported any in-band error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Convert to the final assistant message
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::assistant(self.content)
    }
}

impl EventSink for StreamAccumulator {
    fn on_chunk(&mut self, content: &str) {
        self.content.push_str(content);
        self.chunks += 1;
    }

    fn on_error(&mut self, content: &str) {
        self.errors.push(content.to_string());
    }
}
