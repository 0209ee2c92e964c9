use crate::domain::errors::SeedError;
use crate::domain::market::candlestick::Candlestick;
use crate::domain::market::chart::ChartSeed;
use crate::domain::ports::SeedSource;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Loads chart seed data from a CSV export.
///
/// The file carries bar rows in newest-first order with the reporting
/// source's column mapping (high, close, low, open), followed by one
/// single-field record holding the market-condition coefficient. Exactly
/// `seed_length` bar rows are consumed; anything short of that, or a missing
/// coefficient record, fails the load as a whole.
pub struct CsvSeedSource {
    path: PathBuf,
    seed_length: usize,
}

impl CsvSeedSource {
    pub fn new(path: impl Into<PathBuf>, seed_length: usize) -> Self {
        Self {
            path: path.into(),
            seed_length,
        }
    }

    fn read_from<R: Read>(reader: R, seed_length: usize) -> Result<ChartSeed, SeedError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut bars = Vec::with_capacity(seed_length);
        let mut coefficient = None;

        for (idx, record) in rdr.records().enumerate() {
            let row = idx + 1;
            let record = record?;

            if bars.len() < seed_length {
                // A single-field record is the coefficient: the bar section
                // ended before enough bars were read
                if record.len() == 1 {
                    return Err(SeedError::TooShort {
                        expected: seed_length,
                        got: bars.len(),
                    });
                }
                bars.push(parse_bar(&record, row)?);
            } else {
                coefficient = Some(parse_field(&record, 0, row)?);
                break;
            }
        }

        if bars.len() < seed_length {
            return Err(SeedError::TooShort {
                expected: seed_length,
                got: bars.len(),
            });
        }

        let market_condition_coefficient = coefficient.ok_or(SeedError::MissingCoefficient)?;

        Ok(ChartSeed {
            bars,
            market_condition_coefficient,
        })
    }
}

impl SeedSource for CsvSeedSource {
    fn load(&self) -> Result<ChartSeed, SeedError> {
        let file = File::open(&self.path)?;
        let seed = Self::read_from(file, self.seed_length)?;

        info!(
            "CsvSeedSource: loaded {} bars from {} (coefficient {})",
            seed.bars.len(),
            self.path.display(),
            seed.market_condition_coefficient
        );

        Ok(seed)
    }
}

// Column order is the reporting export's: high, close, low, open.
fn parse_bar(record: &StringRecord, row: usize) -> Result<Candlestick, SeedError> {
    if record.len() < 4 {
        return Err(SeedError::Malformed {
            row,
            reason: format!("expected 4 fields, got {}", record.len()),
        });
    }

    let high = parse_field(record, 0, row)?;
    let close = parse_field(record, 1, row)?;
    let low = parse_field(record, 2, row)?;
    let open = parse_field(record, 3, row)?;

    if low > open.min(close) || open.max(close) > high {
        return Err(SeedError::Malformed {
            row,
            reason: format!("violates OHLC ordering: O:{open} H:{high} L:{low} C:{close}"),
        });
    }

    Ok(Candlestick {
        open,
        high,
        low,
        close,
    })
}

fn parse_field(record: &StringRecord, col: usize, row: usize) -> Result<Decimal, SeedError> {
    let raw = record.get(col).ok_or_else(|| SeedError::Malformed {
        row,
        reason: format!("missing field {}", col + 1),
    })?;

    Decimal::from_str(raw).map_err(|e| SeedError::Malformed {
        row,
        reason: format!("field {} '{}': {}", col + 1, raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // Newest-first, columns high,close,low,open; trailing coefficient record
    const SEED: &str = "\
13,12,10,11
12,11,9,10
1.5
";

    #[test]
    fn test_reads_bars_and_coefficient() {
        let seed = CsvSeedSource::read_from(SEED.as_bytes(), 2).unwrap();

        assert_eq!(seed.bars.len(), 2);
        // Newest-first order is preserved; reversal is the chart's job
        assert_eq!(seed.bars[0].high, dec!(13));
        assert_eq!(seed.bars[0].close, dec!(12));
        assert_eq!(seed.bars[0].low, dec!(10));
        assert_eq!(seed.bars[0].open, dec!(11));
        assert_eq!(seed.bars[1].open, dec!(10));
        assert_eq!(seed.market_condition_coefficient, dec!(1.5));
    }

    #[test]
    fn test_short_file_fails_atomically() {
        let err = CsvSeedSource::read_from(SEED.as_bytes(), 5).unwrap_err();

        assert!(matches!(
            err,
            SeedError::TooShort {
                expected: 5,
                got: 2
            }
        ));
    }

    #[test]
    fn test_truncated_file_without_coefficient() {
        let input = "13,12,10,11\n";
        let err = CsvSeedSource::read_from(input.as_bytes(), 2).unwrap_err();

        assert!(matches!(
            err,
            SeedError::TooShort {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_missing_coefficient_record() {
        let input = "13,12,10,11\n12,11,9,10\n";
        let err = CsvSeedSource::read_from(input.as_bytes(), 2).unwrap_err();

        assert!(matches!(err, SeedError::MissingCoefficient));
    }

    #[test]
    fn test_non_numeric_field_is_malformed() {
        let input = "13,abc,10,11\n1.5\n";
        let err = CsvSeedSource::read_from(input.as_bytes(), 1).unwrap_err();

        match err {
            SeedError::Malformed { row, reason } => {
                assert_eq!(row, 1);
                assert!(reason.contains("abc"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_too_few_columns_is_malformed() {
        let input = "13,12\n1.5\n";
        let err = CsvSeedSource::read_from(input.as_bytes(), 1).unwrap_err();

        assert!(matches!(err, SeedError::Malformed { row: 1, .. }));
    }

    #[test]
    fn test_inverted_ohlc_is_malformed() {
        // Low above open violates the bar invariant
        let input = "13,12,11.5,11\n1.5\n";
        let err = CsvSeedSource::read_from(input.as_bytes(), 1).unwrap_err();

        assert!(matches!(err, SeedError::Malformed { row: 1, .. }));
    }

    #[test]
    fn test_missing_file_fails_load() {
        let source = CsvSeedSource::new("/nonexistent/seed.csv", 2);

        assert!(matches!(source.load(), Err(SeedError::Io(_))));
    }
}
