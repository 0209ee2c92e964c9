use crate::domain::errors::SeedError;
use crate::domain::market::chart::ChartSeed;
use rust_decimal::Decimal;

/// Level-1 feed capability the chart polls for new trades.
///
/// Reads must be cheap and non-blocking; any real I/O belongs inside the
/// implementation, behind its own buffering. No freshness guarantee is
/// assumed beyond "reflects the latest known trade at call time".
pub trait TickSource: Send + Sync {
    /// Cumulative traded volume as of the latest known trade.
    fn current_volume(&self) -> i64;

    /// Last traded price.
    fn last_price(&self) -> Decimal;
}

/// Construction-time supplier of historical bars plus the market-condition
/// coefficient. Consumed exactly once, before the chart exists.
pub trait SeedSource {
    fn load(&self) -> Result<ChartSeed, SeedError>;
}
