//! Technical indicator engine.
//!
//! Every indicator is a pure function over the full candle sequence,
//! returning columns aligned by index with the candles. Values that are not
//! yet computable during an indicator's warm-up are either absent
//! (`Option<f64>` columns for moving averages and Bollinger Bands) or a
//! neutral constant (50 for %K/%D and RSI, 0 for the MACD triplet) — never
//! a silent zero standing in for "computed".
//!
//! %K/%D and MACD carry smoothing state across the whole sequence and must
//! walk bars strictly left to right; the remaining families are windowed and
//! independent per index.

pub mod bollinger;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

use crate::domain::candle::Candle;

/// Moving-average windows computed for every series.
pub const MA_WINDOWS: [usize; 3] = [5, 20, 60];

/// The candle sequence with every derived indicator column, plus the
/// institutional chip columns filled in by the chip aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub candles: Vec<Candle>,
    pub ma5: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma60: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub dif: Vec<f64>,
    /// MACD signal line (the "MACD" value in TWSE charting convention).
    pub macd: Vec<f64>,
    pub osc: Vec<f64>,
    pub rsi: Vec<f64>,
    /// Net foreign-investor lots per day, where chip data matched.
    pub foreign: Vec<Option<i64>>,
    pub trust: Vec<Option<i64>>,
    pub dealer: Vec<Option<i64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

/// Compute the full indicator set over a candle sequence: MA(5/20/60),
/// Bollinger(20, x2), stochastic %K/%D(9), MACD(12,26,9) and RSI(14).
/// Chip columns start out absent; `merge_chips` fills them.
pub fn compute_indicators(candles: Vec<Candle>) -> IndicatorSeries {
    let ma5 = sma::calculate_ma(&candles, MA_WINDOWS[0]);
    let ma20 = sma::calculate_ma(&candles, MA_WINDOWS[1]);
    let ma60 = sma::calculate_ma(&candles, MA_WINDOWS[2]);
    let bands = bollinger::calculate_bollinger(
        &candles,
        bollinger::DEFAULT_PERIOD,
        bollinger::DEFAULT_MULTIPLIER,
    );
    let kd = stochastic::calculate_kd(&candles, stochastic::DEFAULT_PERIOD);
    let macd = macd::calculate_macd(&candles);
    let rsi = rsi::calculate_rsi(&candles, rsi::DEFAULT_PERIOD);

    let n = candles.len();
    IndicatorSeries {
        candles,
        ma5,
        ma20,
        ma60,
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
        k: kd.k,
        d: kd.d,
        dif: macd.dif,
        macd: macd.macd,
        osc: macd.osc,
        rsi,
        foreign: vec![None; n],
        trust: vec![None; n],
        dealer: vec![None; n],
    }
}

/// Round to two decimals for emitted column values. Smoothing state is
/// never rounded; only the copies written into the columns are.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) fn test_candles(closes: &[f64]) -> Vec<Candle> {
    use crate::domain::candle::{normalize, RawBar};
    use chrono::NaiveDate;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let raw: Vec<RawBar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawBar {
            date: start + chrono::Duration::days(i as i64),
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
            volume: Some(1000.0),
        })
        .collect();
    normalize(&raw)
}
