//! Simple moving average over closes.
//!
//! Warmup: the first (window - 1) indices are absent.

use crate::domain::candle::Candle;
use crate::domain::indicator::round2;

/// Trailing arithmetic mean of closes, rounded to two decimals. Indices
/// before the warm-up are `None`; a zero window yields an all-`None` column.
pub fn calculate_ma(candles: &[Candle], window: usize) -> Vec<Option<f64>> {
    candles
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let sum: f64 = candles[i + 1 - window..=i].iter().map(|c| c.close).sum();
            Some(round2(sum / window as f64))
        })
        .collect()
}
