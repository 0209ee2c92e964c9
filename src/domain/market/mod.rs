// Candle aggregation domain
pub mod bar_interval;
pub mod candlestick;
pub mod chart;
