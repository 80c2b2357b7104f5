//! Ingest Module
//!
//! Incremental decoding of streamed response bodies into dispatched events.

pub mod decoder;
pub mod idle;
pub mod ingestor;
pub mod sink;

pub use decoder::Utf8StreamDecoder;
pub use idle::IdleTimeout;
pub use ingestor::{FrameDecoder, IngestStats, StreamIngestor};
pub use sink::{Callbacks, EventSink};
