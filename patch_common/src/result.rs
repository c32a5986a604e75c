//! Result type alias shared across the workspace.
//!
//! Defaults the error type to the common `PatchError`, so functions can simply
//! return `Result<T>`.
use crate::error::PatchError;

/// Workspace-wide `Result` alias with `PatchError` as the default error.
pub type Result<T, E = PatchError> = std::result::Result<T, E>;
