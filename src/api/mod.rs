//! API Module
//!
//! Backend request/response types and event stream framing.

pub mod query;
pub mod streaming;

pub use query::{ChatMessage, QueryRequest, Role, StatusResponse};
pub use streaming::{
    parse_sse_line, EventPayload, LineFramer, StreamAccumulator, StreamEvent, DATA_PREFIX,
};
