use candlechart::application::market_data::chart_service::ChartService;
use candlechart::config::Config;
use candlechart::domain::market::chart::{CandleChart, ChartSeed};
use candlechart::domain::ports::SeedSource;
use candlechart::infrastructure::csv_seed::CsvSeedSource;
use candlechart::infrastructure::mock::MockTickSource;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "candlechart", about = "Tick-to-candle aggregation demo")]
struct Args {
    /// Seed CSV file (overrides SEED_FILE)
    #[arg(long)]
    seed_file: Option<String>,

    /// Bar interval, e.g. 5m, 15m, 60m (overrides BAR_INTERVAL)
    #[arg(long)]
    bar_interval: Option<String>,

    /// Tick-poll cadence in milliseconds (overrides POLL_INTERVAL_MS)
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Number of seed bars to read (overrides SEED_LENGTH)
    #[arg(long)]
    seed_length: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut config = Config::from_env().context("Failed to load config")?;
    if let Some(seed_file) = args.seed_file {
        config.seed_file = seed_file;
    }
    if let Some(interval) = args.bar_interval {
        config.bar_interval = interval.parse().context("Failed to parse --bar-interval")?;
    }
    if let Some(ms) = args.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(len) = args.seed_length {
        config.seed_length = len;
    }

    info!(
        "Starting candlechart ({} bars, polling every {}ms)",
        config.bar_interval, config.poll_interval_ms
    );

    let seed = if Path::new(&config.seed_file).exists() {
        CsvSeedSource::new(&config.seed_file, config.seed_length)
            .load()
            .context("Failed to load seed data")?
    } else {
        warn!(
            "Seed file {} not found, starting with an empty history",
            config.seed_file
        );
        ChartSeed {
            bars: Vec::new(),
            market_condition_coefficient: Decimal::ONE,
        }
    };

    let ticks = MockTickSource::new(0, dec!(68000));
    ticks.start_random_walk(Duration::from_millis(500));

    let chart = CandleChart::new(seed, Arc::new(ticks));
    let service = ChartService::new(
        chart,
        config.bar_interval.to_duration(),
        config.poll_interval(),
    );
    service.start().await;

    // Display sink: a JSON snapshot line every few seconds until Ctrl-C
    let mut display = tokio::time::interval(Duration::from_secs(5));
    loop {
        tokio::select! {
            _ = display.tick() => {
                let snapshot = service.snapshot().await;
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                service.stop().await;
                break;
            }
        }
    }

    Ok(())
}
