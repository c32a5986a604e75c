//! Stream adapter: turns an event generator into a live SSE response.
//!
//! - `pacer` — the injectable clock that carries out suspensions.
//! - `session` — one connection: drives the generator, detects disconnects,
//!   honours cancellation.
//! - `registry` — the open sessions and their cancel handles.
//! - `adapter` — spawns a session and wires it into an axum `Response`.

pub mod adapter;
pub mod pacer;
pub mod registry;
pub mod session;

pub use adapter::serve;
pub use registry::SessionRegistry;
pub use session::{SessionOutcome, SessionReport, StreamSession};
