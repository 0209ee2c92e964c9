//! Configuration module for candlechart.
//!
//! Structured configuration loading from environment variables, with
//! defaults suited to a demo run against the mock feed.

use crate::domain::market::bar_interval::BarInterval;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Candle granularity; the boundary close fires once per interval.
    pub bar_interval: BarInterval,
    /// Tick-poll cadence in milliseconds.
    pub poll_interval_ms: u64,
    /// Path of the historical seed CSV.
    pub seed_file: String,
    /// Number of seed bars to read from the file.
    pub seed_length: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let bar_interval = env::var("BAR_INTERVAL")
            .unwrap_or_else(|_| "5m".to_string())
            .parse::<BarInterval>()
            .context("Failed to parse BAR_INTERVAL")?;

        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "250".to_string())
            .parse::<u64>()
            .context("Failed to parse POLL_INTERVAL_MS")?;

        let seed_file = env::var("SEED_FILE").unwrap_or_else(|_| "seed.csv".to_string());

        let seed_length = env::var("SEED_LENGTH")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<usize>()
            .context("Failed to parse SEED_LENGTH")?;

        Ok(Self {
            bar_interval,
            poll_interval_ms,
            seed_file,
            seed_length,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
