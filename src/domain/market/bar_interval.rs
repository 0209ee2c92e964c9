use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Candle granularity: how often the boundary close fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarInterval {
    FiveMin,
    FifteenMin,
    SixtyMin,
}

impl BarInterval {
    /// Returns the length of one bar in minutes
    pub fn to_minutes(&self) -> u64 {
        match self {
            BarInterval::FiveMin => 5,
            BarInterval::FifteenMin => 15,
            BarInterval::SixtyMin => 60,
        }
    }

    /// Returns the length of one bar as a `Duration`
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs(self.to_minutes() * 60)
    }

    /// Returns all supported intervals in ascending order
    pub fn all() -> Vec<BarInterval> {
        vec![
            BarInterval::FiveMin,
            BarInterval::FifteenMin,
            BarInterval::SixtyMin,
        ]
    }
}

impl FromStr for BarInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "5m" | "5min" | "fivemin" => Ok(BarInterval::FiveMin),
            "15m" | "15min" | "fifteenmin" => Ok(BarInterval::FifteenMin),
            "60m" | "60min" | "1h" | "sixtymin" => Ok(BarInterval::SixtyMin),
            _ => Err(anyhow!(
                "Invalid bar interval: '{}'. Valid options: 5Min, 15Min, 60Min",
                s
            )),
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarInterval::FiveMin => write!(f, "5Min"),
            BarInterval::FifteenMin => write!(f, "15Min"),
            BarInterval::SixtyMin => write!(f, "60Min"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minutes() {
        assert_eq!(BarInterval::FiveMin.to_minutes(), 5);
        assert_eq!(BarInterval::FifteenMin.to_minutes(), 15);
        assert_eq!(BarInterval::SixtyMin.to_minutes(), 60);
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(BarInterval::FiveMin.to_duration(), Duration::from_secs(300));
        assert_eq!(
            BarInterval::SixtyMin.to_duration(),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            BarInterval::from_str("5m").unwrap(),
            BarInterval::FiveMin
        );
        assert_eq!(
            BarInterval::from_str("15Min").unwrap(),
            BarInterval::FifteenMin
        );
        assert_eq!(
            BarInterval::from_str("1h").unwrap(),
            BarInterval::SixtyMin
        );
        assert!(BarInterval::from_str("invalid").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for interval in BarInterval::all() {
            let parsed = BarInterval::from_str(&interval.to_string()).unwrap();
            assert_eq!(parsed, interval);
        }
    }
}
