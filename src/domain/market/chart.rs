use crate::domain::errors::QueryError;
use crate::domain::market::candlestick::{Candlestick, OhlcField};
use crate::domain::ports::TickSource;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Seed data handed over by a `SeedSource` at construction time.
///
/// `bars` is newest-first, the order the reporting export produces; the
/// chart reverses it to oldest-first when it takes ownership.
#[derive(Debug, Clone)]
pub struct ChartSeed {
    pub bars: Vec<Candlestick>,
    pub market_condition_coefficient: Decimal,
}

/// Single-symbol candlestick aggregation state machine.
///
/// Owns the committed candle history (oldest first, append-only), the one
/// in-progress candle, and volume-change detection against the tick source.
/// Two events mutate it: [`CandleChart::poll`] (tick-poll) and
/// [`CandleChart::close_boundary`] (periodic boundary close, invoked by the
/// host scheduler). The chart applies no locking of its own; the caller must
/// serialize both events and all queries, e.g. behind one mutex.
pub struct CandleChart {
    history: Vec<Candlestick>,
    current: Option<Candlestick>,
    last_volume: i64,
    market_condition_coefficient: Decimal,
    tick_source: Arc<dyn TickSource>,
}

impl CandleChart {
    /// Builds a chart from seed data and a tick source.
    ///
    /// Reverses the seed bars to oldest-first, stores the coefficient
    /// verbatim, and takes the tick source's volume reading as the change
    /// detection baseline. No boundary timer is started here; driving
    /// [`CandleChart::close_boundary`] is the scheduler's job.
    pub fn new(seed: ChartSeed, tick_source: Arc<dyn TickSource>) -> Self {
        let ChartSeed {
            mut bars,
            market_condition_coefficient,
        } = seed;
        bars.reverse();

        let last_volume = tick_source.current_volume();

        info!(
            "CandleChart: seeded with {} bars, coefficient {}, baseline volume {}",
            bars.len(),
            market_condition_coefficient,
            last_volume
        );

        Self {
            history: bars,
            current: None,
            last_volume,
            market_condition_coefficient,
            tick_source,
        }
    }

    /// Tick-poll event: checks the tick source for a new trade.
    ///
    /// A volume reading equal to the last observed one means no new trade to
    /// record, so the poll is a no-op; this gates out duplicate/stale price
    /// snapshots when polled faster than the feed updates. On a volume
    /// change, the last traded price is applied to the in-progress candle,
    /// opening it if this is the first trade since the last boundary close.
    pub fn poll(&mut self) {
        let volume = self.tick_source.current_volume();
        if volume == self.last_volume {
            return;
        }

        self.last_volume = volume;
        let price = self.tick_source.last_price();

        match &mut self.current {
            Some(candle) => candle.update(price),
            None => {
                debug!("CandleChart: opening candle @ {}", price);
                self.current = Some(Candlestick::open_at(price));
            }
        }
    }

    /// Boundary-close event: commits the in-progress candle, if any.
    ///
    /// A candle that saw at least one trade is appended to history; either
    /// way the in-progress slot is reset so the next trade opens a fresh
    /// candle. This is the only way history grows after construction.
    pub fn close_boundary(&mut self) {
        match self.current.take() {
            Some(candle) => {
                info!(
                    "CandleChart: candle committed → O:{} H:{} L:{} C:{}",
                    candle.open, candle.high, candle.low, candle.close
                );
                self.history.push(candle);
            }
            None => debug!("CandleChart: boundary close with no trades, nothing committed"),
        }
    }

    /// Returns the most recent `n` candles from the merged view (committed
    /// history followed by the in-progress candle), oldest-to-newest.
    ///
    /// `n` of zero is an invalid window. An `n` larger than the merged view
    /// clamps to what is available.
    pub fn last_n(&self, n: usize) -> Result<Vec<Candlestick>, QueryError> {
        if n < 1 {
            return Err(QueryError::InvalidWindow { n });
        }

        // The in-progress candle, when present, occupies the newest slot of
        // the window; the remainder comes off the history tail.
        let from_history = match self.current {
            Some(_) => n - 1,
            None => n,
        }
        .min(self.history.len());

        let mut window = Vec::with_capacity(from_history + 1);
        window.extend_from_slice(&self.history[self.history.len() - from_history..]);
        if let Some(candle) = self.current {
            window.push(candle);
        }

        Ok(window)
    }

    /// Arithmetic mean of `field` across the last `n` candles of the merged
    /// view. A window that resolves to zero candles is reported as
    /// [`QueryError::EmptyWindow`] rather than dividing by zero.
    pub fn average_last(&self, field: OhlcField, n: usize) -> Result<Decimal, QueryError> {
        let window = self.last_n(n)?;
        if window.is_empty() {
            return Err(QueryError::EmptyWindow);
        }

        let sum: Decimal = window.iter().map(|candle| candle.field(field)).sum();
        Ok(sum / Decimal::from(window.len()))
    }

    /// High of the `n`-th most recent *committed* candle (1 = most recent).
    pub fn high(&self, n: usize) -> Result<Decimal, QueryError> {
        self.committed(n).map(|candle| candle.high)
    }

    /// Low of the `n`-th most recent *committed* candle (1 = most recent).
    pub fn low(&self, n: usize) -> Result<Decimal, QueryError> {
        self.committed(n).map(|candle| candle.low)
    }

    /// Open of the `n`-th most recent *committed* candle (1 = most recent).
    pub fn open(&self, n: usize) -> Result<Decimal, QueryError> {
        self.committed(n).map(|candle| candle.open)
    }

    /// Close of the `n`-th most recent *committed* candle (1 = most recent).
    pub fn close(&self, n: usize) -> Result<Decimal, QueryError> {
        self.committed(n).map(|candle| candle.close)
    }

    // Indexed lookups deliberately exclude the in-progress candle: they are
    // back-references into immutable bars, while last_n/average_last want
    // the freshest data. Do not "fix" the asymmetry.
    fn committed(&self, n: usize) -> Result<&Candlestick, QueryError> {
        let len = self.history.len();
        if n < 1 || n > len {
            return Err(QueryError::IndexOutOfRange { index: n, len });
        }
        Ok(&self.history[len - n])
    }

    /// Market-condition coefficient loaded at construction, read-only.
    pub fn market_condition_coefficient(&self) -> Decimal {
        self.market_condition_coefficient
    }

    /// Number of committed candles.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of candles in the merged view.
    pub fn merged_len(&self) -> usize {
        self.history.len() + usize::from(self.current.is_some())
    }

    /// The in-progress candle, if any trade arrived since the last boundary.
    pub fn current(&self) -> Option<&Candlestick> {
        self.current.as_ref()
    }

    /// Committed candles, oldest first.
    pub fn history(&self) -> &[Candlestick] {
        &self.history
    }
}
