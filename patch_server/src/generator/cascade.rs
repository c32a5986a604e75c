//! Progressive loading generator.
//!
//! Walks a window of a `CascadePlan`. For every stage it emits the stage markup
//! as an element patch (after the stage delay), then a `current_stage` signal.
//! The cursor only ever moves forward: `seek` with a stale index is ignored.

use std::sync::Arc;
use std::time::Duration;

use patch_common::PatchEvent;

use crate::generator::{EventGenerator, Lifecycle};
use crate::model::stage::{CascadePlan, Continuation};

/// Signal carrying the name of the last revealed stage.
pub const CURRENT_STAGE_SIGNAL: &str = "current_stage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fragment,
    Signal,
}

/// Emits stage fragments in increasing stage order, then ends.
pub struct CascadeGenerator {
    plan: Arc<CascadePlan>,
    cursor: usize,
    end: usize,
    phase: Phase,
    delay: Duration,
    continuation: Continuation,
    lifecycle: Lifecycle,
}

impl CascadeGenerator {
    /// Every stage of `plan` on one connection.
    pub fn full(plan: Arc<CascadePlan>, delay: Duration) -> Self {
        let end = plan.len();
        Self::window(plan, 0, end, delay, Continuation::ServerPush)
    }

    /// Only the stage at `index`; its markup asks the client to fetch the next one.
    /// An index past the end yields an already exhausted generator.
    pub fn single(plan: Arc<CascadePlan>, index: usize, delay: Duration) -> Self {
        let end = plan.len().min(index.saturating_add(1));
        let start = index.min(end);
        Self::window(plan, start, end, delay, Continuation::ClientFetch)
    }

    fn window(
        plan: Arc<CascadePlan>,
        cursor: usize,
        end: usize,
        delay: Duration,
        continuation: Continuation,
    ) -> Self {
        Self {
            plan,
            cursor,
            end,
            phase: Phase::Fragment,
            delay,
            continuation,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Index of the next stage to reveal.
    pub fn stage(&self) -> usize {
        self.cursor
    }

    /// Jump forward to stage `index`. Indices at or behind the cursor are ignored,
    /// so replaying a stale stage never regresses the cascade.
    pub fn seek(&mut self, index: usize) {
        if index > self.cursor {
            self.cursor = index.min(self.end);
            self.phase = Phase::Fragment;
        }
    }
}

impl EventGenerator for CascadeGenerator {
    fn name(&self) -> &'static str {
        "cascade"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn next_delay(&self) -> Duration {
        if self.cursor < self.end && self.phase == Phase::Fragment {
            self.delay
        } else {
            Duration::ZERO
        }
    }

    fn step(&mut self) -> Option<PatchEvent> {
        if self.cursor >= self.end {
            return None;
        }
        match self.phase {
            Phase::Fragment => {
                let html = self.plan.render(self.cursor, self.continuation)?;
                self.phase = Phase::Signal;
                Some(PatchEvent::elements(html))
            }
            Phase::Signal => {
                let name = self.plan.get(self.cursor)?.name.clone();
                self.cursor += 1;
                self.phase = Phase::Fragment;
                Some(PatchEvent::signal(CURRENT_STAGE_SIGNAL, name))
            }
        }
    }
}
