//! One open streaming connection.
//!
//! A `StreamSession` owns its generator, its pacer and a cancellation token.
//! `run` drives the generator tick by tick and hands every encoded frame to the
//! connection's frame channel. It ends when:
//! - the generator is exhausted (`Completed`),
//! - the channel is closed because the client went away (`Disconnected`), or
//! - the token is cancelled by its handle or by server shutdown (`Cancelled`).
//!
//! Disconnects are noticed both on send and while suspended, so a dropped
//! client stops the session within one tick period.

use std::convert::Infallible;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use patch_common::wire;
use strum_macros::Display;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::generator::{EventGenerator, GeneratorState};
use crate::stream::pacer::{Pacer, TokioPacer};
use crate::stream::registry::{SessionRegistry, SessionTicket};

/// Channel half that feeds the HTTP body.
pub type FrameSender = mpsc::Sender<Result<Bytes, Infallible>>;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionOutcome {
    /// The generator ran out of events.
    Completed,
    /// The client went away.
    Disconnected,
    /// The cancellation handle fired (explicit cancel or server shutdown).
    Cancelled,
}

/// Summary of a finished session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Why the session ended.
    pub outcome: SessionOutcome,
    /// Frames handed to the transport.
    pub events_sent: usize,
    /// Generator state at the end.
    pub final_state: GeneratorState,
    /// Lifetime of the session in milliseconds.
    pub elapsed_ms: i64,
}

/// A single client connection being served by one generator.
pub struct StreamSession {
    created_at: DateTime<Utc>,
    cancel: CancellationToken,
    generator: Box<dyn EventGenerator>,
    pacer: Box<dyn Pacer>,
    ticket: Option<SessionTicket>,
}

impl StreamSession {
    /// New session paced by the tokio timer.
    pub fn new(generator: impl EventGenerator + 'static, cancel: CancellationToken) -> Self {
        Self {
            created_at: Utc::now(),
            cancel,
            generator: Box::new(generator),
            pacer: Box::new(TokioPacer),
            ticket: None,
        }
    }

    /// Replace the pacer.
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    /// Handle that stops the session at its next suspension point.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Keep this session's cancel handle in `registry` until it finishes.
    pub fn track(mut self, registry: &SessionRegistry) -> Self {
        self.ticket = Some(registry.register(self.cancel_handle()));
        self
    }

    /// Drive the generator until it completes, the client leaves or the session
    /// is cancelled. Frames are sent strictly in generation order.
    pub async fn run(mut self, frames: FrameSender) -> SessionReport {
        let name = self.generator.name();
        let id = self
            .ticket
            .as_ref()
            .map_or_else(|| "-".to_string(), |ticket| ticket.id().to_string());
        info!("Session opened: {} [{}] ({})", name, id, self.created_at.to_rfc3339());

        let mut events_sent = 0;
        let outcome = loop {
            let delay = self.generator.next_delay();
            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break SessionOutcome::Cancelled,
                    _ = frames.closed() => break SessionOutcome::Disconnected,
                    _ = self.pacer.pause(delay) => {}
                }
            } else if self.cancel.is_cancelled() {
                break SessionOutcome::Cancelled;
            }

            let Some(event) = self.generator.resume() else {
                break SessionOutcome::Completed;
            };
            let frame = match wire::encode(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    error!("Failed to encode {} event, skipping it: {}", name, e);
                    continue;
                }
            };

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break SessionOutcome::Cancelled,
                sent = frames.send(Ok(frame)) => {
                    if sent.is_err() {
                        break SessionOutcome::Disconnected;
                    }
                }
            }
            events_sent += 1;
            debug!("{} sent {} #{}", name, event.event_name(), events_sent);
        };

        if outcome != SessionOutcome::Completed {
            self.generator.cancel();
        }
        let report = SessionReport {
            outcome,
            events_sent,
            final_state: self.generator.state(),
            elapsed_ms: (Utc::now() - self.created_at).num_milliseconds(),
        };
        info!(
            "Session closed: {} [{}] {} ({}) after {} events in {} ms",
            name, id, report.outcome, report.final_state, report.events_sent, report.elapsed_ms
        );
        drop(self.ticket.take());
        report
    }
}
