//! Command-line arguments and runtime configuration of the demo server.
//!
//! `Args` is the `clap` surface; it converts into a plain `ServerConfig` that
//! the routes carry in their state and tests can build directly.
use std::time::Duration;

use clap::Parser;
use patch_common::net::{self, DEFAULT_HOST, HTTP_PORT};

/// Largest accepted `--max-delta`.
pub const MAX_DELTA_LIMIT: f64 = 1e6;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to bind the HTTP server to.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind the HTTP server to.
    #[clap(long, default_value_t = HTTP_PORT)]
    pub port: u16,

    /// Delay between typewriter ticks, in milliseconds.
    #[clap(long, default_value_t = 15)]
    pub typewriter_delay_ms: u64,

    /// Characters revealed per typewriter tick.
    #[clap(long, default_value_t = 1)]
    pub typewriter_chunk: usize,

    /// Period of the stock ticker, in milliseconds.
    #[clap(long, default_value_t = 1000)]
    pub ticker_period_ms: u64,

    /// Largest absolute price move per ticker step. The sign is ignored.
    #[clap(long, default_value_t = 2.0, value_parser = parse_max_delta, allow_hyphen_values = true)]
    pub max_delta: f64,

    /// Delay before each cascade stage is revealed, in milliseconds.
    #[clap(long, default_value_t = 300)]
    pub stage_delay_ms: u64,
}

/// Server settings used by the routes and generators.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Pause between typewriter ticks.
    pub typewriter_delay: Duration,
    /// Characters per typewriter tick.
    pub typewriter_chunk: usize,
    /// Ticker period.
    pub ticker_period: Duration,
    /// Bound of the uniform price delta.
    pub max_delta: f64,
    /// Pause before each cascade fragment.
    pub stage_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: HTTP_PORT,
            typewriter_delay: Duration::from_millis(15),
            typewriter_chunk: 1,
            ticker_period: Duration::from_secs(1),
            max_delta: 2.0,
            stage_delay: Duration::from_millis(300),
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            typewriter_delay: Duration::from_millis(args.typewriter_delay_ms),
            typewriter_chunk: args.typewriter_chunk,
            ticker_period: Duration::from_millis(args.ticker_period_ms),
            max_delta: args.max_delta,
            stage_delay: Duration::from_millis(args.stage_delay_ms),
        }
    }
}

/// Parse `--max-delta`: a finite magnitude no larger than [`MAX_DELTA_LIMIT`].
fn parse_max_delta(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("`{}` is not a number: {}", raw, e))?;
    let value = value.abs();
    if !value.is_finite() || value > MAX_DELTA_LIMIT {
        return Err(format!("must be a finite value no larger than {}", MAX_DELTA_LIMIT));
    }
    Ok(value)
}

impl ServerConfig {
    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        net::addr(&self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_args_defaults() {
        let args = Args::try_parse_from(["patch_server"]).unwrap();
        assert_eq!(ServerConfig::from(args), ServerConfig::default());
    }

    #[test]
    fn default_bind_addr() {
        assert_eq!(ServerConfig::default().bind_addr(), "127.0.0.1:8001");
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "patch_server",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--typewriter-delay-ms",
            "5",
            "--typewriter-chunk",
            "4",
            "--ticker-period-ms",
            "250",
            "--max-delta",
            "0.5",
            "--stage-delay-ms",
            "0",
        ])
        .unwrap();
        let cfg = ServerConfig::from(args);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.typewriter_delay, Duration::from_millis(5));
        assert_eq!(cfg.typewriter_chunk, 4);
        assert_eq!(cfg.ticker_period, Duration::from_millis(250));
        assert_eq!(cfg.max_delta, 0.5);
        assert_eq!(cfg.stage_delay, Duration::ZERO);
    }

    #[test]
    fn negative_delta_bound_is_made_positive() {
        let args = Args::try_parse_from(["patch_server", "--max-delta=-3"]).unwrap();
        assert_eq!(ServerConfig::from(args).max_delta, 3.0);
    }

    #[test]
    fn rejects_unusable_delta_bounds() {
        for bad in ["inf", "-inf", "NaN", "1e308", "1000001", "lots"] {
            let parsed = Args::try_parse_from(["patch_server", "--max-delta", bad]);
            assert!(parsed.is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn accepts_the_delta_limit_and_zero() {
        for (raw, expected) in [("1e6", MAX_DELTA_LIMIT), ("0", 0.0)] {
            let args = Args::try_parse_from(["patch_server", "--max-delta", raw]).unwrap();
            assert_eq!(ServerConfig::from(args).max_delta, expected);
        }
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Args::try_parse_from(["patch_server", "--port", "not-a-port"]).is_err());
    }
}
