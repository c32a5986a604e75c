//! Datastar streaming demo server.
//!
//! This binary serves three demos over HTTP. Each page declares its initial
//! signals and opens a Server-Sent Events stream once loaded; the server then
//! pushes Datastar patch directives down that stream:
//!
//! - `/` with `/load/{stage}` or `/stream-cascade` — progressive loading, one
//!   element patch per stage, each stage's markup chaining to the next.
//! - `/typewriter` with `/stream-typewriter` — a text revealed a few characters
//!   at a time through the `content` signal.
//! - `/ticker` with `/stream-ticker` — an endless random walk over a list of
//!   simulated stocks, pushed through the `stocks` signal once per period.
//!
//! Concurrency and shutdown:
//! - Every streaming request gets its own generator and `StreamSession`,
//!   spawned on the tokio runtime and fed to the response body through a
//!   one-frame channel. No state is shared between connections.
//! - A client that goes away closes the channel; its session notices on the
//!   next send or while waiting for its next tick and stops.
//! - Ctrl-C cancels every session in the registry and then the server token.
//!   Every session also holds a child of that token, so open streams end and
//!   `axum::serve` drains gracefully.
//!
//! Note: this file only orchestrates; the generators, their data and the HTTP
//! plumbing live in the `patch_server` library.
#![warn(missing_docs)]
use clap::Parser;
use log::{error, info};
use patch_common::PatchError;
use patch_server::config::{Args, ServerConfig};
use patch_server::routes::{self, AppState};
use patch_server::stream::SessionRegistry;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Initializes the global logger.
///
/// Uses `env_logger` with the default environment-based configuration and a minimum
/// log level of `Info`.
fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// On Ctrl-C, cancel every open session, then `shutdown`.
fn spawn_signal_watcher(shutdown: CancellationToken, sessions: SessionRegistry) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl-C, shutting down: {}", e),
        }
        let open = sessions.cancel_all();
        info!("Cancelled {} open streams", open);
        shutdown.cancel();
    });
}

/// Application entry point.
///
/// Binds the listener, installs the Ctrl-C watcher and serves the routes until
/// the shutdown token is cancelled.
#[tokio::main]
async fn main() -> Result<(), PatchError> {
    init_logger();

    let config = ServerConfig::from(Args::parse());
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Datastar demo server listening on http://{}", listener.local_addr()?);

    let shutdown = CancellationToken::new();
    let state = AppState::new(config, shutdown.clone());
    spawn_signal_watcher(shutdown.clone(), state.sessions.clone());

    let app = routes::router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Server stopped");
    Ok(())
}
