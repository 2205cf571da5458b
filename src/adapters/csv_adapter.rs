//! CSV file data adapter.
//!
//! Reads `<CODE>_price.csv` (`date,open,high,low,close,volume`, volume in
//! shares) and the optional `<CODE>_chips.csv` (`date,name,buy,sell`) from
//! a base directory. Numeric price cells that are blank or malformed load
//! as missing and are coerced downstream by the normalizer; an unparseable
//! date is an acquisition failure and errors here.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::candle::RawBar;
use crate::domain::chips::ChipRecord;
use crate::domain::error::TwquantError;
use crate::ports::data_port::MarketDataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn price_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}_price.csv", code))
    }

    fn chips_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}_chips.csv", code))
    }
}

fn parse_date(record: &csv::StringRecord, path: &Path) -> Result<NaiveDate, TwquantError> {
    let date_str = record.get(0).ok_or_else(|| TwquantError::Data {
        reason: format!("{}: missing date column", path.display()),
    })?;
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| TwquantError::Data {
        reason: format!("{}: invalid date '{}': {}", path.display(), date_str, e),
    })
}

/// A blank or non-numeric cell is missing data, not an error.
fn parse_cell(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record.get(idx).and_then(|s| s.trim().parse().ok())
}

impl MarketDataPort for CsvAdapter {
    fn fetch_price_bars(&self, code: &str) -> Result<Vec<RawBar>, TwquantError> {
        let path = self.price_path(code);
        if !path.exists() {
            return Err(TwquantError::NoData {
                code: code.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| TwquantError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TwquantError::Data {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            bars.push(RawBar {
                date: parse_date(&record, &path)?,
                open: parse_cell(&record, 1),
                high: parse_cell(&record, 2),
                low: parse_cell(&record, 3),
                close: parse_cell(&record, 4),
                volume: parse_cell(&record, 5),
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn fetch_chip_records(&self, code: &str) -> Result<Vec<ChipRecord>, TwquantError> {
        let path = self.chips_path(code);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| TwquantError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TwquantError::Data {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            records.push(ChipRecord {
                date: parse_date(&record, &path)?,
                investor: record.get(1).unwrap_or_default().to_string(),
                buy: parse_cell(&record, 2).unwrap_or(0.0),
                sell: parse_cell(&record, 3).unwrap_or(0.0),
            });
        }

        Ok(records)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TwquantError> {
        let bars = self.fetch_price_bars(code)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
