//! Patch Client: a terminal subscriber for the Datastar demo server.
//!
//! It opens one of the server's streaming routes, decodes every
//! `datastar-patch-elements` / `datastar-patch-signals` frame and logs a
//! one-line summary of it. Handy for watching a stream without a browser.
//!
//! Usage example (CLI):
//! ```bash
//! patch_client --server 127.0.0.1:8001 --route /stream-typewriter --max-events 20
//! ```
//!
//! The client stops when the server ends the stream, when `--max-events` is
//! reached, or on Ctrl+C.
#![warn(missing_docs)]
mod args;
mod reader;

use crate::args::Args;
use crate::reader::{StopReason, describe, read_events};
use clap::Parser;
use log::{error, info};
use patch_common::PatchError;
use patch_common::Result;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::io::BufReader;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// Content type the server streams.
const EVENT_STREAM: &str = "text/event-stream";

/// Opens `url` and logs events until the stream stops.
fn start_stream_loop(url: &str, max_events: Option<usize>, shutdown: Arc<AtomicBool>) -> Result<(), PatchError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(None::<Duration>)
        .build()
        .map_err(|e| PatchError::Http(format!("Failed to build HTTP client: {}", e)))?;

    info!("Connecting to {}", url);
    let response = client
        .get(url)
        .header(ACCEPT, EVENT_STREAM)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .map_err(|e| PatchError::Http(format!("Request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PatchError::Http(format!("{} returned {}", url, status)));
    }
    info!("Stream open ({}). Press Ctrl+C to exit.", status);

    let (reason, received) = read_events(BufReader::new(response), max_events, &shutdown, |event| {
        info!("{}", describe(event));
    })?;
    match reason {
        StopReason::EndOfStream => info!("Server closed the stream after {} events", received),
        StopReason::Limit => info!("Received {} events, stopping", received),
        StopReason::Shutdown => info!("Stream loop stopping after {} events...", received),
    }
    Ok(())
}

fn main() -> Result<(), PatchError> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| PatchError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let url = args.url();
    if let Err(e) = start_stream_loop(&url, args.max_events, shutdown) {
        error!("Stream error: {}", e);
        return Err(e);
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
