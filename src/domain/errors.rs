use thiserror::Error;

/// Errors reported by the chart's windowed query operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid window: n must be >= 1, got {n}")]
    InvalidWindow { n: usize },

    #[error("window resolved to zero candles")]
    EmptyWindow,

    #[error("index {index} out of range: {len} committed candles")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while loading historical seed data.
///
/// Any of these fails chart construction as a whole; there is no
/// partially-seeded chart.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed data: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed seed row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("seed data ended after {got} bars, expected {expected}")]
    TooShort { expected: usize, got: usize },

    #[error("missing market condition coefficient record")]
    MissingCoefficient,
}
