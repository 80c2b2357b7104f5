//! Chatstream - streaming chat client
//!
//! Sends queries to a chat backend and ingests its newline-delimited
//! `data: {json}` event stream incrementally, dispatching assistant content and
//! in-band errors to caller-supplied handlers as they arrive.

use futures::{Stream, StreamExt};

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod explorer;
pub mod ingest;

use api::{QueryRequest, StatusResponse, StreamAccumulator, StreamEvent};
use client::{HttpClient, LoadingFlag};
use config::{BackendConfig, ConfigLoader};
use error::Result;
use ingest::{Callbacks, EventSink, IngestStats, StreamIngestor};
use tracing::debug;

/// The main chat client
pub struct ChatClient {
    /// Backend configuration
    config: BackendConfig,

    /// HTTP client
    http_client: HttpClient,

    /// Stream ingestor, configured with the idle timeout
    ingestor: StreamIngestor,

    /// Set while a query is streaming
    loading: LoadingFlag,
}

impl ChatClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        let loader = ConfigLoader::new()?;
        Self::from_config(loader.into_config())
    }

    /// Create a client with a custom config path
    pub fn with_config_path(path: &str) -> Result<Self> {
        let loader = ConfigLoader::from_path(path)?;
        Self::from_config(loader.into_config())
    }

    /// Create a client from a config object
    pub fn from_config(config: BackendConfig) -> Result<Self> {
        let mut ingestor = StreamIngestor::new();
        if let Some(window) = config.idle_timeout() {
            ingestor = ingestor.with_idle_timeout(window);
        }

        Ok(Self {
            http_client: HttpClient::new(&config)?,
            config,
            ingestor,
            loading: LoadingFlag::new(),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Whether a query is currently streaming
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// A handle observers can poll for the loading state
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Send a query and dispatch the streamed answer to `sink`
    pub async fn stream_query<K>(&self, query: &str, sink: &mut K) -> Result<IngestStats>
    where
        K: EventSink + ?Sized,
    {
        let _loading = self.loading.begin();

        let url = self.config.query_url();
        debug!(url = %url, "Sending query");

        let body = self
            .http_client
            .post_stream(&url, &QueryRequest::new(query))
            .await?;

        self.ingestor.ingest(body, sink).await
    }

    /// Send a query with separate content and error handlers
    pub async fn query_with_callbacks<C, E>(
        &self,
        query: &str,
        on_chunk: C,
        on_error: E,
    ) -> Result<IngestStats>
    where
        C: FnMut(&str),
        E: FnMut(&str),
    {
        let mut sink = Callbacks::new(on_chunk, on_error);
        self.stream_query(query, &mut sink).await
    }

    /// Send a query and collect the whole answer
    pub async fn ask(&self, query: &str) -> Result<StreamAccumulator> {
        let mut acc = StreamAccumulator::new();
        self.stream_query(query, &mut acc).await?;
        Ok(acc)
    }

    /// Send a query and return its events as a stream
    ///
    /// The loading flag stays set until the returned stream is exhausted or dropped.
    pub async fn query_events(
        &self,
        query: &str,
    ) -> Result<impl Stream<Item = Result<StreamEvent>> + Send> {
        let loading = self.loading.begin();

        let url = self.config.query_url();
        debug!(url = %url, "Sending query");

        let body = self
            .http_client
            .post_stream(&url, &QueryRequest::new(query))
            .await?;
        let events = self.ingestor.events(body);

        Ok(async_stream::stream! {
            let _loading = loading;
            futures::pin_mut!(events);
            while let Some(event) = events.next().await {
                yield event;
            }
        })
    }

    /// Fetch the backend health report
    pub async fn status(&self) -> Result<StatusResponse> {
        self.http_client.get_json(&self.config.status_url()).await
    }
}
