//! Event generators.
//!
//! A generator is a cooperative producer of time-paced patch events. It never
//! sleeps itself: before each resume the stream session asks `next_delay()`,
//! waits that long on its injected pacer, then calls `resume()` for exactly one
//! event. This keeps the tick logic testable without wall-clock delays.
//!
//! Every generator walks the same state machine:
//!
//! ```text
//! Created -> Running -> (Suspended <-> Running)* -> Completed | Cancelled
//! ```
//!
//! - `cascade` — progressive loading, one element patch per stage.
//! - `typewriter` — character-by-character reveal through a `content` signal.
//! - `ticker` — infinite random-walk price updates through a `stocks` signal.

use std::time::Duration;

use patch_common::PatchEvent;
use strum_macros::Display;

pub mod cascade;
pub mod ticker;
pub mod typewriter;

/// Lifecycle state of a generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GeneratorState {
    /// Built, never resumed.
    #[default]
    Created,
    /// Computing the next event.
    Running,
    /// Parked at a tick boundary.
    Suspended,
    /// Ran out of events.
    Completed,
    /// Stopped through `cancel()`.
    Cancelled,
}

impl GeneratorState {
    /// `Completed` or `Cancelled`. Terminal states are never left.
    pub fn is_terminal(self) -> bool {
        matches!(self, GeneratorState::Completed | GeneratorState::Cancelled)
    }
}

/// State machine bookkeeping shared by the concrete generators.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: GeneratorState,
}

impl Lifecycle {
    /// Current state.
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Enter `Running`. Returns `false` when the generator is already terminal.
    fn enter(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = GeneratorState::Running;
        true
    }

    fn suspend(&mut self) {
        self.state = GeneratorState::Suspended;
    }

    fn complete(&mut self) {
        self.state = GeneratorState::Completed;
    }

    fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = GeneratorState::Cancelled;
        }
    }
}

/// A cooperative, suspension-capable producer of patch events.
pub trait EventGenerator: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Lifecycle bookkeeping.
    fn lifecycle(&self) -> &Lifecycle;

    /// Mutable lifecycle bookkeeping.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// How long to stay suspended before the next `resume()`.
    fn next_delay(&self) -> Duration;

    /// Compute the next event, or `None` when the sequence is exhausted.
    /// Only called from `resume()`, while `Running`.
    fn step(&mut self) -> Option<PatchEvent>;

    /// Current lifecycle state.
    fn state(&self) -> GeneratorState {
        self.lifecycle().state()
    }

    /// Run one tick. Returns `None` once the generator is completed or cancelled;
    /// a terminal generator is never restarted.
    fn resume(&mut self) -> Option<PatchEvent> {
        if !self.lifecycle_mut().enter() {
            return None;
        }
        match self.step() {
            Some(event) => {
                self.lifecycle_mut().suspend();
                Some(event)
            }
            None => {
                self.lifecycle_mut().complete();
                None
            }
        }
    }

    /// Stop the generator. No further events are produced. Idempotent.
    fn cancel(&mut self) {
        self.lifecycle_mut().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        left: u32,
        lifecycle: Lifecycle,
    }

    impl EventGenerator for Countdown {
        fn name(&self) -> &'static str {
            "countdown"
        }

        fn lifecycle(&self) -> &Lifecycle {
            &self.lifecycle
        }

        fn lifecycle_mut(&mut self) -> &mut Lifecycle {
            &mut self.lifecycle
        }

        fn next_delay(&self) -> Duration {
            Duration::ZERO
        }

        fn step(&mut self) -> Option<PatchEvent> {
            if self.left == 0 {
                return None;
            }
            self.left -= 1;
            Some(PatchEvent::signal("left", self.left))
        }
    }

    fn countdown(left: u32) -> Countdown {
        Countdown {
            left,
            lifecycle: Lifecycle::default(),
        }
    }

    #[test]
    fn walks_created_suspended_completed() {
        let mut generator = countdown(2);
        assert_eq!(generator.state(), GeneratorState::Created);
        assert!(generator.resume().is_some());
        assert_eq!(generator.state(), GeneratorState::Suspended);
        assert!(generator.resume().is_some());
        assert!(generator.resume().is_none());
        assert_eq!(generator.state(), GeneratorState::Completed);
        assert!(generator.resume().is_none());
    }

    #[test]
    fn cancel_stops_production_and_is_sticky() {
        let mut generator = countdown(5);
        generator.resume();
        generator.cancel();
        assert_eq!(generator.state(), GeneratorState::Cancelled);
        assert!(generator.resume().is_none());
        generator.cancel();
        assert_eq!(generator.state(), GeneratorState::Cancelled);
    }

    #[test]
    fn cancel_after_completion_keeps_completed() {
        let mut generator = countdown(0);
        assert!(generator.resume().is_none());
        generator.cancel();
        assert_eq!(generator.state(), GeneratorState::Completed);
    }

    #[test]
    fn state_names() {
        assert_eq!(GeneratorState::Suspended.to_string(), "suspended");
        assert!(GeneratorState::Cancelled.is_terminal());
        assert!(!GeneratorState::Running.is_terminal());
    }
}
