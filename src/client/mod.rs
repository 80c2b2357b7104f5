//! Client Module
//!
//! HTTP transport and loading-state tracking.

pub mod http;
pub mod loading;

pub use http::{ByteStream, HttpClient};
pub use loading::{LoadingFlag, LoadingGuard};
