//! Composite fitness score.
//!
//! A fixed additive checklist over the latest bar's indicators, the
//! five-day institutional flows and the instrument's fundamentals. Starts
//! from 60 and caps at 99; the constants and their order are part of the
//! scoring contract and must not be reordered.

use crate::domain::chips::{five_day_net, ChipDay};
use crate::domain::indicator::IndicatorSeries;

pub const BASE_SCORE: i32 = 60;
pub const MAX_SCORE: i32 = 99;

/// Static fundamentals for one instrument. Zero means unknown and earns
/// no bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fundamentals {
    /// Trailing price/earnings ratio.
    pub pe: f64,
    /// Dividend yield in percent.
    pub dividend_yield: f64,
    /// Price/book ratio. Reported alongside the score but not scored.
    pub pb: f64,
}

/// Latest-bar snapshot consumed by [`score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub k: f64,
    pub d: f64,
    pub osc: f64,
    /// Trailing five-day net foreign lots.
    pub foreign_5d: i64,
    /// Trailing five-day net trust lots.
    pub trust_5d: i64,
}

impl ScoreInputs {
    /// Snapshot the most recent bar of a series. An empty series yields
    /// neutral inputs (no indicator condition can fire), keeping the score
    /// total-function over any input.
    pub fn from_series(series: &IndicatorSeries, summary: &[ChipDay]) -> Self {
        let (foreign_5d, trust_5d) = five_day_net(summary);
        match series.len().checked_sub(1) {
            None => ScoreInputs {
                ma5: None,
                ma20: None,
                k: 50.0,
                d: 50.0,
                osc: 0.0,
                foreign_5d,
                trust_5d,
            },
            Some(last) => ScoreInputs {
                ma5: series.ma5[last],
                ma20: series.ma20[last],
                k: series.k[last],
                d: series.d[last],
                osc: series.osc[last],
                foreign_5d,
                trust_5d,
            },
        }
    }
}

/// Score the snapshot. Each condition is evaluated independently; the sum
/// of all bonuses exceeds the cap, so a full house still reads 99.
pub fn score(inputs: &ScoreInputs, fundamentals: &Fundamentals) -> i32 {
    let mut total = BASE_SCORE;
    if fundamentals.pe > 0.0 && fundamentals.pe < 15.0 {
        total += 15;
    }
    if fundamentals.dividend_yield > 4.0 {
        total += 10;
    }
    if let (Some(ma5), Some(ma20)) = (inputs.ma5, inputs.ma20) {
        if ma5 > ma20 {
            total += 10;
        }
    }
    if inputs.k > inputs.d && inputs.k < 80.0 {
        total += 10;
    }
    if inputs.osc > 0.0 {
        total += 5;
    }
    if inputs.foreign_5d > 0 {
        total += 5;
    }
    if inputs.trust_5d > 0 {
        total += 5;
    }
    total.min(MAX_SCORE)
}
