//! Stock ticker generator.
//!
//! Owns a fresh `SimulatedEntity` per seed and random-walks their prices
//! forever. Each tick moves every entity once and emits the full current list
//! in the `stocks` signal together with a `tick` counter. The counter makes
//! consecutive patches distinct even when no price moved, which is what the
//! client keys its flash animation on.
//!
//! The sequence is infinite: it only ends through `cancel()`.

use std::time::Duration;

use patch_common::{PatchError, PatchEvent, Result};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use serde_json::{Map, Value};

use crate::generator::{EventGenerator, GeneratorState, Lifecycle};
use crate::model::entity::{SimulatedEntity, StockSeed};

/// Signal carrying the entity list.
pub const STOCKS_SIGNAL: &str = "stocks";
/// Signal carrying the tick counter.
pub const TICK_SIGNAL: &str = "tick";

/// Source of per-tick price deltas.
pub trait PriceWalk: Send {
    /// Delta to apply to `entity` on this tick.
    fn delta(&mut self, entity: &SimulatedEntity) -> f64;
}

/// Deltas drawn uniformly from `[-max_delta, max_delta]`.
pub struct UniformWalk {
    rng: StdRng,
    range: Uniform<f64>,
}

impl UniformWalk {
    /// Walk seeded from the OS.
    ///
    /// Fails unless `max_delta` is finite, non-negative and small enough for
    /// the range width to stay finite.
    pub fn new(max_delta: f64) -> Result<Self> {
        Ok(Self {
            rng: StdRng::from_os_rng(),
            range: delta_range(max_delta)?,
        })
    }

    /// Reproducible walk.
    pub fn seeded(max_delta: f64, seed: u64) -> Result<Self> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            range: delta_range(max_delta)?,
        })
    }
}

fn delta_range(max_delta: f64) -> Result<Uniform<f64>> {
    Uniform::new_inclusive(-max_delta, max_delta)
        .map_err(|e| PatchError::Format(format!("invalid price delta bound {}: {}", max_delta, e)))
}

impl PriceWalk for UniformWalk {
    fn delta(&mut self, _entity: &SimulatedEntity) -> f64 {
        self.range.sample(&mut self.rng)
    }
}

/// Infinite price-update stream over its own entities.
pub struct TickerGenerator<W: PriceWalk = UniformWalk> {
    entities: Vec<SimulatedEntity>,
    walk: W,
    period: Duration,
    ticks: u64,
    lifecycle: Lifecycle,
}

impl<W: PriceWalk> TickerGenerator<W> {
    /// Fresh state built from the immutable `seeds`; nothing is shared with
    /// other tickers.
    pub fn new(seeds: &[StockSeed], walk: W, period: Duration) -> Self {
        Self {
            entities: seeds.iter().map(SimulatedEntity::from_seed).collect(),
            walk,
            period,
            ticks: 0,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Current entity states.
    pub fn entities(&self) -> &[SimulatedEntity] {
        &self.entities
    }

    /// Number of ticks produced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn snapshot(&self) -> PatchEvent {
        let stocks = self
            .entities
            .iter()
            .map(SimulatedEntity::to_signal_value)
            .collect();
        let mut values = Map::new();
        values.insert(STOCKS_SIGNAL.into(), Value::Array(stocks));
        values.insert(TICK_SIGNAL.into(), Value::from(self.ticks));
        PatchEvent::signals(values)
    }
}

impl<W: PriceWalk> EventGenerator for TickerGenerator<W> {
    fn name(&self) -> &'static str {
        "ticker"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn next_delay(&self) -> Duration {
        if self.state() == GeneratorState::Created {
            Duration::ZERO
        } else {
            self.period
        }
    }

    fn step(&mut self) -> Option<PatchEvent> {
        for entity in &mut self.entities {
            let delta = self.walk.delta(entity);
            entity.apply_delta(delta);
        }
        self.ticks += 1;
        Some(self.snapshot())
    }
}
