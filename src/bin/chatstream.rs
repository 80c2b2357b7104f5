//! chatstream CLI
//!
//! Sends a query to the chat backend and prints the answer as it streams in.

use anyhow::{bail, Context, Result};
use chatstream::api::StreamEvent;
use chatstream::ChatClient;
use clap::Parser;
use futures::StreamExt;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatstream", about = "Stream an answer from the chat backend")]
struct Args {
    /// Config file to load on top of the built-in defaults
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Print the backend status instead of sending a query
    #[arg(long)]
    status: bool,

    /// The question to ask
    query: Vec<String>,
}

impl Args {
    fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

/// Write one event: content to `out` as it arrives, in-band errors to `err`
fn print_event(
    out: &mut impl Write,
    err: &mut impl Write,
    event: &StreamEvent,
) -> std::io::Result<()> {
    match event {
        StreamEvent::Chunk(content) => {
            write!(out, "{}", content)?;
            out.flush()
        }
        StreamEvent::Error(content) => writeln!(err, "error: {}", content),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let client = match &args.config {
        Some(path) => ChatClient::with_config_path(path),
        None => ChatClient::new(),
    }
    .context("failed to create client")?;

    if args.status {
        let status = client.status().await.context("status request failed")?;
        println!("{} - {} (v{})", status.status, status.message, status.version);
        return Ok(());
    }

    let query = args.query_text();
    if query.trim().is_empty() {
        bail!("a query is required unless --status is given");
    }

    let events = client.query_events(&query).await.context("query failed")?;
    futures::pin_mut!(events);

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    while let Some(event) = events.next().await {
        let event = event.context("query failed")?;
        // dropping the stream on a write error ends the request
        print_event(&mut stdout, &mut stderr, &event).context("failed to write output")?;
    }

    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
