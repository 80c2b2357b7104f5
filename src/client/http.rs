//! HTTP Client
//!
//! Async HTTP transport for the chat backend: opens streaming POSTs and fetches JSON.

use crate::config::BackendConfig;
use crate::error::{ChatStreamError, Result};
use bytes::Bytes;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::pin::Pin;
use tracing::{debug, warn};

/// A response body delivered chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// HTTP client for the chat backend
pub struct HttpClient {
    /// Inner reqwest client
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// No overall request timeout is set: a streamed answer may legitimately take
    /// minutes. Stalls are handled by the ingestor's idle timeout instead.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .default_headers(Self::build_headers(config))
            .build()
            .map_err(|e| {
                ChatStreamError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    fn build_headers(config: &BackendConfig) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            match (
                HeaderName::try_from(key.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(val)) => {
                    headers.insert(name, val);
                }
                _ => warn!(header = %key, "Skipping invalid configured header"),
            }
        }
        headers
    }

    /// Make a streaming POST request
    ///
    /// Returns `Ok(None)` when the response by definition carries no body
    /// (204 No Content, 205 Reset Content).
    pub async fn post_stream(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<Option<ByteStream>> {
        use async_stream::stream;
        use futures::StreamExt;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await?;

        let response = Self::check_status(response, "Streaming request").await?;

        if matches!(
            response.status(),
            StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT
        ) {
            debug!(status = %response.status(), "Response has no body");
            return Ok(None);
        }

        // Convert to our stream type
        let mut byte_stream = response.bytes_stream();
        let s = stream! {
            while let Some(chunk) = byte_stream.next().await {
                yield chunk.map_err(|e| ChatStreamError::SourceRead(e.to_string()));
            }
        };

        Ok(Some(Box::pin(s)))
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response, "Request").await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ChatStreamError::Response(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                truncate(&body, 500)
            ))
        })
    }

    async fn check_status(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ChatStreamError::Request(format!(
            "{} failed with status {}: {}",
            what,
            status,
            truncate(&body, 500)
        )))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
