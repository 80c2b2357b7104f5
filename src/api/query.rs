//! Query API
//!
//! Request and response bodies exchanged with the chat backend.

use serde::{Deserialize, Serialize};

/// Body of a streaming query request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,
}

impl QueryRequest {
    /// Create a new query request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Backend health report returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// "ok" when the service is healthy
    pub status: String,

    /// Human-readable status message
    #[serde(default)]
    pub message: String,

    /// Backend version string
    #[serde(default)]
    pub version: String,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
