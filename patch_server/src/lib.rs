//! Datastar streaming demo server library.
//!
//! This crate aggregates:
//! - `config` — command-line arguments and the `ServerConfig` they produce.
//! - `model` — stock entities and cascade stages behind the demos.
//! - `generator` — the cooperative event generators (cascade, typewriter, ticker).
//! - `stream` — sessions, pacing, the session registry and the SSE response adapter.
//! - `pages` — the static HTML pages.
//! - `routes` — the axum router tying pages and streams together.
#![warn(missing_docs)]
pub mod config;
pub mod generator;
pub mod model;
pub mod pages;
pub mod routes;
pub mod stream;
