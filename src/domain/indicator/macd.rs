//! MACD (Moving Average Convergence Divergence).
//!
//! DIF  = EMA(fast) - EMA(slow) of closes
//! MACD = EMA(signal) of DIF (the signal line)
//! OSC  = DIF - MACD
//!
//! Default spans: fast=12, slow=26, signal=9, with alpha = 2/(span+1).
//! Both close EMAs are seeded with the first close and the signal EMA with
//! the first bar's DIF, so every column is defined from index 0 (the first
//! bar's triplet is zero). All three accumulators are carried across the
//! whole sequence in order; this is a strict left-to-right fold.

use crate::domain::candle::Candle;
use crate::domain::indicator::round2;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub dif: Vec<f64>,
    /// Signal line.
    pub macd: Vec<f64>,
    pub osc: Vec<f64>,
}

/// EMA accumulators threaded through the fold, unrounded.
struct MacdState {
    ema_fast: f64,
    ema_slow: f64,
    signal: f64,
}

fn ema_step(prev: f64, value: f64, span: usize) -> f64 {
    let alpha = 2.0 / (span as f64 + 1.0);
    value * alpha + prev * (1.0 - alpha)
}

pub fn calculate_macd(candles: &[Candle]) -> MacdSeries {
    if candles.is_empty() {
        return MacdSeries {
            dif: Vec::new(),
            macd: Vec::new(),
            osc: Vec::new(),
        };
    }

    let seed = candles[0].close;
    let mut state = MacdState {
        ema_fast: seed,
        ema_slow: seed,
        signal: 0.0,
    };

    let mut raw_dif = Vec::with_capacity(candles.len());
    for candle in candles {
        state.ema_fast = ema_step(state.ema_fast, candle.close, DEFAULT_FAST);
        state.ema_slow = ema_step(state.ema_slow, candle.close, DEFAULT_SLOW);
        raw_dif.push(state.ema_fast - state.ema_slow);
    }

    state.signal = raw_dif[0];
    let mut dif = Vec::with_capacity(candles.len());
    let mut macd = Vec::with_capacity(candles.len());
    let mut osc = Vec::with_capacity(candles.len());
    for &value in &raw_dif {
        state.signal = ema_step(state.signal, value, DEFAULT_SIGNAL);
        dif.push(round2(value));
        macd.push(round2(state.signal));
        osc.push(round2(value - state.signal));
    }

    MacdSeries { dif, macd, osc }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_candles;

    #[test]
    fn first_bar_triplet_is_zero() {
        let series = calculate_macd(&test_candles(&[100.0, 105.0, 110.0]));
        assert_eq!(series.dif[0], 0.0);
        assert_eq!(series.macd[0], 0.0);
        assert_eq!(series.osc[0], 0.0);
    }

    #[test]
    fn constant_prices_stay_zero() {
        let series = calculate_macd(&test_candles(&[100.0; 40]));
        assert!(series.dif.iter().all(|&v| v == 0.0));
        assert!(series.macd.iter().all(|&v| v == 0.0));
        assert!(series.osc.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn known_two_bar_values() {
        let series = calculate_macd(&test_candles(&[100.0, 113.0]));

        // EMA12 = 102, EMA26 = 100.9630, DIF = 1.0370
        // signal = DIF * 2/10 = 0.2074, OSC = 0.8296
        assert_eq!(series.dif[1], 1.04);
        assert_eq!(series.macd[1], 0.21);
        assert_eq!(series.osc[1], 0.83);
    }

    #[test]
    fn rising_series_positive_dif() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + 3.0 * i as f64).collect();
        let series = calculate_macd(&test_candles(&closes));

        assert!(series.dif[10] > 0.0);
        assert!(series.osc[5] > 0.0);
    }

    #[test]
    fn osc_tracks_dif_minus_signal() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 11) as f64)
            .collect();
        let series = calculate_macd(&test_candles(&closes));

        // columns are rounded independently from the unrounded state
        for i in 0..series.dif.len() {
            let delta = (series.osc[i] - (series.dif[i] - series.macd[i])).abs();
            assert!(delta <= 0.02, "index {}: delta {}", i, delta);
        }
    }

    #[test]
    fn empty_input() {
        let series = calculate_macd(&[]);
        assert!(series.dif.is_empty());
        assert!(series.macd.is_empty());
        assert!(series.osc.is_empty());
    }
}
