//! Domain models for the demo drivers.
//!
//! - `entity` — simulated stock entities, seeds and price formatting for the ticker.
//! - `stage` — the cascade stage plan and its markup for progressive loading.

pub mod entity;
pub mod stage;
