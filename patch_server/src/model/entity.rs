//! Simulated stock entities for the ticker demo.
//!
//! A `SimulatedEntity` is the mutable price state of one symbol. It is created
//! from an immutable `StockSeed` and mutated only by the ticker generator that
//! owns it. This module also holds the display formatting of prices and changes
//! that ends up in the `stocks` signal.

use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

/// Prices never drop below this value.
pub const PRICE_FLOOR: f64 = 1.0;

/// Direction of the last price move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Price went up.
    Up,
    /// Price went down.
    Down,
    /// Price did not change (or no tick happened yet).
    #[default]
    None,
}

impl Direction {
    /// Classify a move from `old` to `new`.
    pub fn between(old: f64, new: f64) -> Self {
        if new > old {
            Direction::Up
        } else if new < old {
            Direction::Down
        } else {
            Direction::None
        }
    }
}

/// Immutable seed data for one symbol. Shared read-only across sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSeed {
    /// Ticker symbol, e.g. `AAPL`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Starting price.
    pub price: f64,
}

impl StockSeed {
    /// Build a seed.
    pub fn new(symbol: &str, name: &str, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
        }
    }
}

/// Seed list served by the ticker demo.
pub fn default_seeds() -> Vec<StockSeed> {
    vec![
        StockSeed::new("AAPL", "Apple Inc.", 178.50),
        StockSeed::new("GOOGL", "Alphabet Inc.", 141.25),
        StockSeed::new("MSFT", "Microsoft Corp.", 378.00),
        StockSeed::new("TSLA", "Tesla Inc.", 248.75),
        StockSeed::new("AMZN", "Amazon.com Inc.", 178.00),
        StockSeed::new("DSTR", "Datastar Labs", 127.50),
    ]
}

/// Result of applying one price step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMove {
    /// Price before the step.
    pub old_price: f64,
    /// Price after the step and the floor clamp.
    pub new_price: f64,
    /// Percentage change relative to `old_price`.
    pub change_pct: f64,
    /// Direction relative to `old_price`.
    pub direction: Direction,
}

/// Mutable price state of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedEntity {
    /// Ticker symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Current price, always `>= PRICE_FLOOR`.
    pub price: f64,
    /// Percentage change of the last step.
    pub change_pct: f64,
    /// Direction of the last step.
    pub direction: Direction,
}

impl SimulatedEntity {
    /// Fresh entity from a seed. A seed price below the floor is clamped.
    pub fn from_seed(seed: &StockSeed) -> Self {
        Self {
            symbol: seed.symbol.clone(),
            name: seed.name.clone(),
            price: seed.price.max(PRICE_FLOOR),
            change_pct: 0.0,
            direction: Direction::None,
        }
    }

    /// Move the price by `delta`, clamp it to the floor and record the change.
    ///
    /// Change and direction are computed against the previous stored price, so a
    /// step that is swallowed by the clamp reports `Direction::None`.
    pub fn apply_delta(&mut self, delta: f64) -> PriceMove {
        let old_price = self.price;
        let new_price = (old_price + delta).max(PRICE_FLOOR);
        let change_pct = (new_price - old_price) / old_price * 100.0;
        let direction = Direction::between(old_price, new_price);

        self.price = new_price;
        self.change_pct = change_pct;
        self.direction = direction;

        PriceMove {
            old_price,
            new_price,
            change_pct,
            direction,
        }
    }

    /// Display form pushed to the client: symbol, name, formatted price and
    /// change, direction tag.
    pub fn to_signal_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("symbol".into(), Value::String(self.symbol.clone()));
        fields.insert("name".into(), Value::String(self.name.clone()));
        fields.insert("price".into(), Value::String(format_price(self.price)));
        fields.insert("change".into(), Value::String(format_change(self.change_pct)));
        fields.insert("dir".into(), Value::String(self.direction.to_string()));
        Value::Object(fields)
    }
}

/// `$1234.50`
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// `+1.18%` / `-0.40%`; zero is shown as `+0.00%`.
pub fn format_change(change_pct: f64) -> String {
    let sign = if change_pct >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change_pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dstr() -> SimulatedEntity {
        SimulatedEntity::from_seed(&StockSeed::new("DSTR", "Datastar Labs", 127.50))
    }

    #[test]
    fn forced_up_move() {
        let mut entity = dstr();
        let step = entity.apply_delta(1.50);
        assert_eq!(step.direction, Direction::Up);
        assert_eq!(format_price(entity.price), "$129.00");
        assert_eq!(format_change(entity.change_pct), "+1.18%");

        let value = entity.to_signal_value();
        assert_eq!(value["price"], json!("$129.00"));
        assert_eq!(value["change"], json!("+1.18%"));
        assert_eq!(value["dir"], json!("up"));
        assert_eq!(value["symbol"], json!("DSTR"));
        assert_eq!(value["name"], json!("Datastar Labs"));
    }

    #[test]
    fn down_move_has_negative_sign() {
        let mut entity = dstr();
        entity.apply_delta(-0.51);
        assert_eq!(entity.direction, Direction::Down);
        assert_eq!(format_change(entity.change_pct), "-0.40%");
    }

    #[test]
    fn zero_delta_is_none() {
        let mut entity = dstr();
        let step = entity.apply_delta(0.0);
        assert_eq!(step.direction, Direction::None);
        assert_eq!(entity.to_signal_value()["dir"], json!("none"));
        assert_eq!(format_change(step.change_pct), "+0.00%");
    }

    #[test]
    fn floor_clamp_uses_previous_price_for_direction() {
        let mut entity = SimulatedEntity::from_seed(&StockSeed::new("PNY", "Penny", 1.50));
        let step = entity.apply_delta(-2.0);
        assert_eq!(step.new_price, PRICE_FLOOR);
        assert_eq!(step.direction, Direction::Down);

        let step = entity.apply_delta(-2.0);
        assert_eq!(step.new_price, PRICE_FLOOR);
        assert_eq!(step.direction, Direction::None);
    }

    #[test]
    fn seed_below_floor_is_clamped() {
        let entity = SimulatedEntity::from_seed(&StockSeed::new("Z", "Zero", 0.0));
        assert_eq!(entity.price, PRICE_FLOOR);
    }

    #[test]
    fn direction_string_forms() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!(Direction::default(), Direction::None);
    }

    #[test]
    fn default_seeds_have_unique_symbols() {
        let seeds = default_seeds();
        let mut symbols: Vec<&str> = seeds.iter().map(|s| s.symbol.as_str()).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), seeds.len());
        assert!(seeds.iter().all(|s| s.price >= PRICE_FLOOR));
    }
}
