//! Stream Ingestion
//!
//! Turns an HTTP response body into ordered sink callbacks. A line is only
//! processed once its `\n` terminator has been received, so the dispatched
//! events do not depend on how the transport fragments the body.

use crate::api::streaming::{parse_sse_line, LineFramer, StreamEvent};
use crate::error::{ChatStreamError, Result};
use crate::ingest::decoder::Utf8StreamDecoder;
use crate::ingest::idle::IdleTimeout;
use crate::ingest::sink::EventSink;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tracing::{debug, warn};

/// Counters for one ingestion call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Complete lines framed
    pub lines: usize,

    /// Content chunks dispatched
    pub chunks: usize,

    /// Error frames dispatched
    pub errors: usize,

    /// Frames skipped because their payload failed to parse
    pub malformed: usize,
}

/// Synchronous decode-frame-parse pipeline for a single stream
#[derive(Debug, Default)]
pub struct FrameDecoder {
    decoder: Utf8StreamDecoder,
    framer: LineFramer,
    stats: IngestStats,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning the events it completes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let text = self.decoder.decode(bytes);
        let mut events = Vec::new();

        for line in self.framer.push(&text) {
            self.stats.lines += 1;

            match parse_sse_line(&line) {
                Ok(Some(event)) => {
                    match &event {
                        StreamEvent::Chunk(_) => self.stats.chunks += 1,
                        StreamEvent::Error(_) => self.stats.errors += 1,
                    }
                    events.push(event);
                }
                Ok(None) => {}
                Err(e) => {
                    self.stats.malformed += 1;
                    warn!(error = %e, line = %line, "Error parsing SSE data");
                }
            }
        }

        events
    }

    /// Counters so far
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// End of stream: the unterminated remainder is dropped, never dispatched
    pub fn finish(self) -> IngestStats {
        let residual = self.framer.finish();
        if !residual.is_empty() || self.decoder.pending_len() > 0 {
            debug!(
                residual_bytes = residual.len(),
                pending_bytes = self.decoder.pending_len(),
                "Discarding unterminated trailing data"
            );
        }
        self.stats
    }
}

/// Drives a byte source through a [`FrameDecoder`] and dispatches the results
#[derive(Debug, Default, Clone)]
pub struct StreamIngestor {
    idle_timeout: Option<Duration>,
}

impl StreamIngestor {
    /// Create an ingestor that waits on a stalled source indefinitely
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `Timeout` if the source delivers nothing for `window`
    pub fn with_idle_timeout(mut self, window: Duration) -> Self {
        self.idle_timeout = Some(window);
        self
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Ingest a byte source until it completes, dispatching events to `sink`
    ///
    /// `None` means the response had no readable body and fails with
    /// `StreamUnavailable` before anything is dispatched. A source error ends
    /// ingestion and is returned as is.
    pub async fn ingest<S, B, K>(&self, source: Option<S>, sink: &mut K) -> Result<IngestStats>
    where
        S: Stream<Item = Result<B>>,
        B: AsRef<[u8]>,
        K: EventSink + ?Sized,
    {
        let source = source.ok_or_else(body_unavailable)?;
        let mut source = Box::pin(IdleTimeout::new(source, self.idle_timeout));
        let mut frames = FrameDecoder::new();

        while let Some(chunk) = source.next().await {
            let chunk = chunk?;
            for event in frames.feed(chunk.as_ref()) {
                event.dispatch(&mut *sink);
            }
        }

        let stats = frames.finish();
        debug!(
            lines = stats.lines,
            chunks = stats.chunks,
            errors = stats.errors,
            malformed = stats.malformed,
            "Stream complete"
        );
        Ok(stats)
    }

    /// Same pipeline as [`ingest`](Self::ingest), exposed as a pull stream of events
    pub fn events<S, B>(&self, source: Option<S>) -> impl Stream<Item = Result<StreamEvent>>
    where
        S: Stream<Item = Result<B>>,
        B: AsRef<[u8]>,
    {
        let idle_timeout = self.idle_timeout;

        async_stream::try_stream! {
            let source = source.ok_or_else(body_unavailable)?;
            let mut source = Box::pin(IdleTimeout::new(source, idle_timeout));
            let mut frames = FrameDecoder::new();

            while let Some(chunk) = source.next().await {
                let chunk = chunk?;
                for event in frames.feed(chunk.as_ref()) {
                    yield event;
                }
            }

            frames.finish();
        }
    }
}

fn body_unavailable() -> ChatStreamError {
    ChatStreamError::StreamUnavailable("Response body is not readable".to_string())
}
