//! Pacing clock for stream sessions.
//!
//! Generators only say how long they want to stay suspended; a `Pacer` decides
//! how that wait is carried out. Production uses the tokio timer, tests swap in
//! a pacer that returns at once and records what was asked for.

use std::time::Duration;

use futures::future::BoxFuture;

/// Timer-driven resume primitive.
pub trait Pacer: Send {
    /// Resolve after `delay`.
    fn pause(&mut self, delay: Duration) -> BoxFuture<'_, ()>;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    fn pause(&mut self, delay: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(delay))
    }
}
