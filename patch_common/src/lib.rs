//!
//! Common types and utilities shared by the patch server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `PatchError` used across the workspace.
//! - `result` — handy `Result<T, PatchError>` alias.
//! - `event` — the `PatchEvent` model (element patches and signal patches).
//! - `wire` — the encoder turning a `PatchEvent` into Datastar SSE frames.
//! - `sse` — a line-oriented SSE parser that turns frames back into events.
//! - `net` — networking defaults and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod event;
pub mod net;
pub mod result;
pub mod sse;
pub mod wire;

pub use error::PatchError;
pub use event::PatchEvent;
pub use result::Result;
