use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects one of the four OHLC fields for windowed statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OhlcField {
    Open,
    High,
    Low,
    Close,
}

impl fmt::Display for OhlcField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OhlcField::Open => write!(f, "open"),
            OhlcField::High => write!(f, "high"),
            OhlcField::Low => write!(f, "low"),
            OhlcField::Close => write!(f, "close"),
        }
    }
}

/// One OHLC bar.
///
/// A value of this type always carries at least one observed price: it is
/// created from its first price via [`Candlestick::open_at`]. "No ticks
/// observed yet" is represented by the chart holding no bar at all
/// (`Option<Candlestick>`), so committed history can never contain an empty
/// bar.
///
/// Invariant: `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candlestick {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Candlestick {
    /// Opens a new bar from the first observed price. All four fields start
    /// at `price`.
    pub fn open_at(price: Decimal) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    /// Applies a subsequent trade price to this in-progress bar.
    ///
    /// Close becomes the latest price; high/low are extended as needed; open
    /// never changes. Repeating the same price is a no-op beyond the first
    /// application.
    pub fn update(&mut self, price: Decimal) {
        if price > self.high {
            self.high = price;
        }
        if price < self.low {
            self.low = price;
        }
        self.close = price;
    }

    /// Reads the field selected by `field`.
    pub fn field(&self, field: OhlcField) -> Decimal {
        match field {
            OhlcField::Open => self.open,
            OhlcField::High => self.high,
            OhlcField::Low => self.low,
            OhlcField::Close => self.close,
        }
    }
}
