//! Chatstream Error Types
//!
//! Error handling for stream ingestion and the backend client.

use thiserror::Error;

/// Main error type for chatstream operations
#[derive(Debug, Error)]
pub enum ChatStreamError {
    /// The response carried no readable body; ingestion never starts
    #[error("Stream unavailable: {0}")]
    StreamUnavailable(String),

    /// A single frame's payload was not valid JSON (recovered per line)
    #[error("Frame parse error: {0}")]
    FrameParse(String),

    /// The underlying byte source failed mid-stream
    #[error("Source read failed: {0}")]
    SourceRead(String),

    /// Configuration errors (invalid JSON, unreadable file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed or returned a non-success status
    #[error("Request failed: {0}")]
    Request(String),

    /// Response parsing failed
    #[error("Response error: {0}")]
    Response(String),

    /// Connect timeout, or the stream went idle for too long
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ChatStreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatStreamError::Timeout(err.to_string())
        } else if err.is_connect() {
            ChatStreamError::Request(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ChatStreamError::Response(format!("Failed to decode response: {}", err))
        } else if err.is_body() {
            ChatStreamError::SourceRead(err.to_string())
        } else {
            ChatStreamError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatStreamError {
    fn from(err: serde_json::Error) -> Self {
        ChatStreamError::Response(format!("JSON parsing error: {}", err))
    }
}

impl From<std::io::Error> for ChatStreamError {
    fn from(err: std::io::Error) -> Self {
        ChatStreamError::Config(format!("IO error: {}", err))
    }
}

/// Result type alias for chatstream operations
pub type Result<T> = std::result::Result<T, ChatStreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ChatStreamError::StreamUnavailable("no body".to_string());
        assert_eq!(err.to_string(), "Stream unavailable: no body");

        let err = ChatStreamError::SourceRead("reset by peer".to_string());
        assert_eq!(err.to_string(), "Source read failed: reset by peer");
    }

    #[test]
    fn test_from_serde_json() {
        let err: ChatStreamError = serde_json::from_str::<serde_json::Value>("{not json}")
            .unwrap_err()
            .into();
        assert!(matches!(err, ChatStreamError::Response(_)));
    }
}
