//! Error types shared between client and server.
//!
//! The `PatchError` enum unifies the failure cases of encoding, decoding and
//! transporting patch events, allowing every crate to propagate a single error
//! type.
use std::io;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum PatchError {
    /// I/O error originating from sockets or the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An SSE frame named an event type that is not a Datastar directive.
    #[error("Unknown event type: {0}")]
    UnknownEvent(String),

    /// A frame was missing a data line the directive requires.
    #[error("Missing field in frame: {0}")]
    MissingField(&'static str),

    /// A cascade stage name that the stage plan does not contain.
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// HTTP transport failure on the client side; contains a short context string.
    #[error("HTTP error: {0}")]
    Http(String),
}
