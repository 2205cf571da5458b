//! Stochastic %K/%D oscillator.
//!
//! RSV = 100 * (close - lowestLow) / (highestHigh - lowestLow) over the
//! trailing period, defined as 50 when the window has zero range. The
//! smoothed lines follow the TWSE convention:
//!
//!   K = (2/3) * K_prev + (1/3) * RSV
//!   D = (2/3) * D_prev + (1/3) * K
//!
//! Both start at 50 and the state is carried across the whole sequence, so
//! the fold must walk bars in chronological order. Warm-up bars emit the
//! constant 50 without advancing the state.

use crate::domain::candle::Candle;
use crate::domain::indicator::round2;

pub const DEFAULT_PERIOD: usize = 9;
const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Smoothing state threaded through the fold. Never rounded; rounding is
/// applied only to the emitted column values.
struct KdState {
    k: f64,
    d: f64,
}

impl KdState {
    fn advance(&mut self, rsv: f64) {
        self.k = (2.0 / 3.0) * self.k + (1.0 / 3.0) * rsv;
        self.d = (2.0 / 3.0) * self.d + (1.0 / 3.0) * self.k;
    }
}

pub fn calculate_kd(candles: &[Candle], period: usize) -> StochasticSeries {
    let mut k = Vec::with_capacity(candles.len());
    let mut d = Vec::with_capacity(candles.len());
    let mut state = KdState {
        k: NEUTRAL,
        d: NEUTRAL,
    };

    for i in 0..candles.len() {
        if period == 0 || i + 1 < period {
            k.push(NEUTRAL);
            d.push(NEUTRAL);
            continue;
        }

        let window = &candles[i + 1 - period..=i];
        let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let highest = window
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);

        let rsv = if highest == lowest {
            NEUTRAL
        } else {
            (candles[i].close - lowest) / (highest - lowest) * 100.0
        };

        state.advance(rsv);
        k.push(round2(state.k));
        d.push(round2(state.d));
    }

    StochasticSeries { k, d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_candles;

    #[test]
    fn warmup_emits_neutral_50() {
        let candles = test_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let kd = calculate_kd(&candles, 9);

        assert_eq!(kd.k, vec![50.0; 5]);
        assert_eq!(kd.d, vec![50.0; 5]);
    }

    #[test]
    fn first_computed_bar_starts_from_neutral_state() {
        // nine rising closes: RSV = 100 on the first computed bar
        let closes: Vec<f64> = (0..9).map(|i| 100.0 + 2.0 * i as f64).collect();
        let kd = calculate_kd(&test_candles(&closes), 9);

        // K = 2/3 * 50 + 1/3 * 100, D = 2/3 * 50 + 1/3 * K
        assert_eq!(kd.k[8], 66.67);
        assert_eq!(kd.d[8], 55.56);
    }

    #[test]
    fn zero_range_window_rsv_is_50() {
        let candles = test_candles(&[100.0; 15]);
        let kd = calculate_kd(&candles, 9);

        assert!(kd.k.iter().all(|&v| v == 50.0));
        assert!(kd.d.iter().all(|&v| v == 50.0));
    }

    #[test]
    fn k_and_d_stay_within_bounds() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + ((i * 13) % 17) as f64 - 8.0)
            .collect();
        let kd = calculate_kd(&test_candles(&closes), 9);

        for (&k, &d) in kd.k.iter().zip(&kd.d) {
            assert!((0.0..=100.0).contains(&k), "K {} out of range", k);
            assert!((0.0..=100.0).contains(&d), "D {} out of range", d);
        }
    }

    #[test]
    fn falling_series_drives_k_below_d() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let kd = calculate_kd(&test_candles(&closes), 9);

        // close sits on the window low, RSV = 0, K decays ahead of D
        assert!(kd.k[19] < kd.d[19]);
        assert!(kd.k[19] < 50.0);
    }

    #[test]
    fn empty_input() {
        let kd = calculate_kd(&[], 9);
        assert!(kd.k.is_empty());
        assert!(kd.d.is_empty());
    }
}
