#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use twquant::domain::candle::{normalize, Candle, RawBar};
use twquant::domain::chips::ChipRecord;
use twquant::domain::error::TwquantError;
use twquant::ports::data_port::MarketDataPort;

pub struct MockMarketData {
    pub bars: HashMap<String, Vec<RawBar>>,
    pub chips: HashMap<String, Vec<ChipRecord>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            chips: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<RawBar>) -> Self {
        self.bars.insert(code.to_string(), bars);
        self
    }

    pub fn with_chips(mut self, code: &str, chips: Vec<ChipRecord>) -> Self {
        self.chips.insert(code.to_string(), chips);
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_price_bars(&self, code: &str) -> Result<Vec<RawBar>, TwquantError> {
        self.bars
            .get(code)
            .cloned()
            .ok_or_else(|| TwquantError::NoData {
                code: code.to_string(),
            })
    }

    fn fetch_chip_records(&self, code: &str) -> Result<Vec<ChipRecord>, TwquantError> {
        Ok(self.chips.get(code).cloned().unwrap_or_default())
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TwquantError> {
        match self.bars.get(code) {
            Some(bars) if !bars.is_empty() => Ok(Some((
                bars.first().unwrap().date,
                bars.last().unwrap().date,
                bars.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Zero-range bars (open = high = low = close), one per day from
/// 2024-01-01, 1000 shares of volume each.
pub fn raw_bars(closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
            volume: Some(1000.0),
        })
        .collect()
}

pub fn candles(closes: &[f64]) -> Vec<Candle> {
    normalize(&raw_bars(closes))
}

/// 61 bars: a steady rally, a three-bar dip that crosses %K under %D while
/// flat, a second rally whose %K/%D up-cross lands with MA5 above MA20
/// (bar 35), then a decline that crosses back down (bar 46) and keeps
/// falling. Exactly one long round trip: in at 158, out at 202.
pub fn single_cross_long_closes() -> Vec<f64> {
    let mut closes = Vec::with_capacity(61);
    for i in 0..30 {
        closes.push(100.0 + 2.0 * i as f64);
    }
    closes.extend([153.0, 148.0, 143.0]);
    for i in 33..=45u32 {
        closes.push(143.0 + 5.0 * (i - 32) as f64);
    }
    for i in 46..=60u32 {
        closes.push(208.0 - 6.0 * (i - 45) as f64);
    }
    closes
}

/// The long scenario reflected around 300: every comparison mirrors, so
/// the short strategy sees one round trip, in at 142 and out at 98.
pub fn single_cross_short_closes() -> Vec<f64> {
    single_cross_long_closes()
        .into_iter()
        .map(|c| 300.0 - c)
        .collect()
}

/// 61 bars: rally to 129, a 14-bar slide that drags RSI below 30 at bar 39
/// (close 119), then a recovery that lifts RSI above 70 at bar 53
/// (close 125) and keeps rising.
pub fn value_cycle_closes() -> Vec<f64> {
    let mut closes = Vec::with_capacity(61);
    for i in 0..30 {
        closes.push(100.0 + i as f64);
    }
    for i in 30..=43u32 {
        closes.push(129.0 - (i - 29) as f64);
    }
    for i in 44..=60u32 {
        closes.push(115.0 + (i - 43) as f64);
    }
    closes
}

/// Same shape as the long scenario through bar 35 (entry at 158), but the
/// second rally never breaks: the position stays open to the final close
/// of 283.
pub fn entry_without_exit_closes() -> Vec<f64> {
    let mut closes = Vec::with_capacity(61);
    for i in 0..30 {
        closes.push(100.0 + 2.0 * i as f64);
    }
    closes.extend([153.0, 148.0, 143.0]);
    for i in 33..=60u32 {
        closes.push(143.0 + 5.0 * (i - 32) as f64);
    }
    closes
}
