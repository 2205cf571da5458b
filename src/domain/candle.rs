//! Candle representation and raw-bar normalization.
//!
//! Upstream price feeds disagree on field names and occasionally omit
//! numeric fields entirely. `RawBar` models one raw record with every
//! numeric field optional; [`normalize`] coerces missing fields to zero so
//! the sequence stays aligned, converts share volume to board lots, and
//! stamps each candle with its up/down flag and display color.

use chrono::NaiveDate;

/// Shares per board lot on the TWSE.
pub const SHARES_PER_LOT: f64 = 1000.0;

/// Candle body color for a close at or above the open (TWSE convention).
pub const UP_COLOR: &str = "#f87171";
/// Candle body color for a close below the open.
pub const DOWN_COLOR: &str = "#34d399";

/// One raw price record as delivered by a data provider. A `None` field
/// stands for a missing or non-numeric upstream value.
#[derive(Debug, Clone)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    /// Traded volume in shares.
    pub volume: Option<f64>,
}

/// One trading period after normalization. Immutable once produced;
/// indicator values live in parallel columns, never on the candle itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Short period label (`MM-DD`), used for display axes.
    pub day: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Volume in board lots (shares rounded / 1000).
    pub volume: i64,
    pub is_up: bool,
    pub color: &'static str,
}

impl Candle {
    fn from_raw(raw: &RawBar) -> Self {
        let open = raw.open.unwrap_or(0.0);
        let close = raw.close.unwrap_or(0.0);
        let is_up = close >= open;
        Candle {
            day: raw.date.format("%m-%d").to_string(),
            date: raw.date,
            open,
            high: raw.high.unwrap_or(0.0),
            low: raw.low.unwrap_or(0.0),
            close,
            volume: (raw.volume.unwrap_or(0.0) / SHARES_PER_LOT).round() as i64,
            is_up,
            color: if is_up { UP_COLOR } else { DOWN_COLOR },
        }
    }
}

/// Convert raw provider records into candles, one-to-one and in order.
/// Empty input produces empty output; malformed bars pass through with
/// missing fields coerced to zero rather than being rejected.
pub fn normalize(raw: &[RawBar]) -> Vec<Candle> {
    raw.iter().map(Candle::from_raw).collect()
}
