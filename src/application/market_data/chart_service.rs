use crate::domain::errors::QueryError;
use crate::domain::market::candlestick::{Candlestick, OhlcField};
use crate::domain::market::chart::CandleChart;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{info, warn};

/// Read-only view of the chart state for display sinks.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    pub as_of: DateTime<Utc>,
    pub committed: usize,
    pub current: Option<Candlestick>,
    pub last_close: Option<Decimal>,
    pub market_condition_coefficient: Decimal,
}

/// Drives a [`CandleChart`] with its two periodic events.
///
/// The chart requires its caller to serialize mutation and queries; this
/// service is that caller. One mutex wraps the chart, and the boundary-close
/// task, the tick-poll task, and every query passthrough go through it.
pub struct ChartService {
    chart: Arc<Mutex<CandleChart>>,
    bar_interval: Duration,
    poll_interval: Duration,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ChartService {
    pub fn new(chart: CandleChart, bar_interval: Duration, poll_interval: Duration) -> Self {
        Self {
            chart: Arc::new(Mutex::new(chart)),
            bar_interval,
            poll_interval,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Begins invoking the chart's boundary-close event once per bar
    /// interval and its tick-poll event at the poll cadence. Calling again
    /// while running is a no-op.
    pub async fn start(&self) {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            warn!("ChartService: already started");
            return;
        }

        let chart = Arc::clone(&self.chart);
        let bar_interval = self.bar_interval;
        tasks.push(tokio::spawn(async move {
            // First close lands one full interval out, not immediately
            let mut ticker = time::interval_at(Instant::now() + bar_interval, bar_interval);
            loop {
                ticker.tick().await;
                chart.lock().await.close_boundary();
            }
        }));

        let chart = Arc::clone(&self.chart);
        let poll_interval = self.poll_interval;
        tasks.push(tokio::spawn(async move {
            let mut ticker = time::interval(poll_interval);
            loop {
                ticker.tick().await;
                chart.lock().await.poll();
            }
        }));

        info!(
            "ChartService: started (bar interval {:?}, polling every {:?})",
            self.bar_interval, self.poll_interval
        );
    }

    /// Stops both periodic tasks. The chart keeps its state, and `start`
    /// may be called again afterwards.
    pub async fn stop(&self) {
        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            task.abort();
        }
        info!("ChartService: stopped");
    }

    pub async fn started(&self) -> bool {
        !self.tasks.lock().await.is_empty()
    }

    /// Runs one tick-poll event outside the periodic schedule.
    pub async fn poll_once(&self) {
        self.chart.lock().await.poll();
    }

    /// Runs one boundary-close event outside the periodic schedule.
    pub async fn close_boundary(&self) {
        self.chart.lock().await.close_boundary();
    }

    pub async fn last_n(&self, n: usize) -> Result<Vec<Candlestick>, QueryError> {
        self.chart.lock().await.last_n(n)
    }

    pub async fn average_last(&self, field: OhlcField, n: usize) -> Result<Decimal, QueryError> {
        self.chart.lock().await.average_last(field, n)
    }

    pub async fn high(&self, n: usize) -> Result<Decimal, QueryError> {
        self.chart.lock().await.high(n)
    }

    pub async fn low(&self, n: usize) -> Result<Decimal, QueryError> {
        self.chart.lock().await.low(n)
    }

    pub async fn open(&self, n: usize) -> Result<Decimal, QueryError> {
        self.chart.lock().await.open(n)
    }

    pub async fn close(&self, n: usize) -> Result<Decimal, QueryError> {
        self.chart.lock().await.close(n)
    }

    pub async fn snapshot(&self) -> ChartSnapshot {
        let chart = self.chart.lock().await;
        ChartSnapshot {
            as_of: Utc::now(),
            committed: chart.history_len(),
            current: chart.current().copied(),
            last_close: chart.close(1).ok(),
            market_condition_coefficient: chart.market_condition_coefficient(),
        }
    }
}
