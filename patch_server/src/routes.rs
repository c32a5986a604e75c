//! HTTP routes of the demo server.
//!
//! Page routes return static HTML; streaming routes build a fresh generator per
//! request and hand it to the stream adapter. Everything in `AppState` is
//! read-only and shared by `Arc`; each session gets its own child of the
//! server shutdown token and is tracked in the session registry while it runs.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use log::{error, warn};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::generator::EventGenerator;
use crate::generator::cascade::CascadeGenerator;
use crate::generator::ticker::{TickerGenerator, UniformWalk};
use crate::generator::typewriter::{BANNER, TypewriterGenerator};
use crate::model::entity::{StockSeed, default_seeds};
use crate::model::stage::CascadePlan;
use crate::pages;
use crate::stream::{SessionRegistry, StreamSession, serve};

/// Shared, read-only state of the routes.
#[derive(Clone)]
pub struct AppState {
    /// Server settings.
    pub config: Arc<ServerConfig>,
    /// Ticker seed list.
    pub seeds: Arc<[StockSeed]>,
    /// Cascade stage plan.
    pub cascade: Arc<CascadePlan>,
    /// Text typed by the typewriter.
    pub typewriter_text: Arc<str>,
    /// Parent of every session's cancellation token.
    pub shutdown: CancellationToken,
    /// Sessions currently streaming.
    pub sessions: SessionRegistry,
}

impl AppState {
    /// State with the standard demo data.
    pub fn new(config: ServerConfig, shutdown: CancellationToken) -> Self {
        Self {
            config: Arc::new(config),
            seeds: default_seeds().into(),
            cascade: Arc::new(CascadePlan::standard()),
            typewriter_text: Arc::from(BANNER),
            shutdown,
            sessions: SessionRegistry::new(),
        }
    }

    fn session(&self, generator: impl EventGenerator + 'static) -> StreamSession {
        StreamSession::new(generator, self.shutdown.child_token()).track(&self.sessions)
    }

    fn stage_index(&self, name: &str) -> Result<usize, StatusCode> {
        self.cascade.position(name).map_err(|e| {
            warn!("Rejected cascade request: {}", e);
            StatusCode::NOT_FOUND
        })
    }
}

/// Build the router with every page and streaming route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/typewriter", get(pages::typewriter))
        .route("/ticker", get(pages::ticker))
        .route("/load/{stage}", get(load_stage))
        .route("/stream-cascade", get(stream_cascade))
        .route("/stream-typewriter", get(stream_typewriter))
        .route("/stream-ticker", get(stream_ticker))
        .with_state(state)
}

/// GET /load/{stage}: one cascade stage. Its markup triggers the next request.
async fn load_stage(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Response, StatusCode> {
    let index = state.stage_index(&stage)?;
    let generator = CascadeGenerator::single(state.cascade.clone(), index, state.config.stage_delay);
    Ok(serve(state.session(generator)))
}

/// Query of `/stream-cascade`.
#[derive(Debug, Default, Deserialize)]
pub struct CascadeQuery {
    /// Stage to resume from; earlier stages are skipped.
    pub from: Option<String>,
}

/// GET /stream-cascade[?from=<stage>]: every stage on a single connection.
async fn stream_cascade(
    State(state): State<AppState>,
    Query(query): Query<CascadeQuery>,
) -> Result<Response, StatusCode> {
    let mut generator = CascadeGenerator::full(state.cascade.clone(), state.config.stage_delay);
    if let Some(from) = query.from.as_deref() {
        generator.seek(state.stage_index(from)?);
    }
    Ok(serve(state.session(generator)))
}

/// GET /stream-typewriter
async fn stream_typewriter(State(state): State<AppState>) -> Response {
    let generator = TypewriterGenerator::new(
        state.typewriter_text.clone(),
        state.config.typewriter_chunk,
        state.config.typewriter_delay,
    );
    serve(state.session(generator))
}

/// GET /stream-ticker
async fn stream_ticker(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let walk = UniformWalk::new(state.config.max_delta).map_err(|e| {
        error!("Cannot start ticker: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let generator = TickerGenerator::new(&state.seeds, walk, state.config.ticker_period);
    Ok(serve(state.session(generator)))
}
