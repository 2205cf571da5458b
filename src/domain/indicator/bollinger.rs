//! Bollinger Bands.
//!
//! Middle: SMA over the period. Upper/Lower: middle +/- multiplier x
//! population standard deviation (divides by N, not N-1) of the same window.
//!
//! Default parameters: period=20, multiplier=2.0.
//! Warmup: first (period-1) bars are absent.

use crate::domain::candle::Candle;
use crate::domain::indicator::round2;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn calculate_bollinger(candles: &[Candle], period: usize, multiplier: f64) -> BollingerBands {
    let mut upper = Vec::with_capacity(candles.len());
    let mut middle = Vec::with_capacity(candles.len());
    let mut lower = Vec::with_capacity(candles.len());

    for i in 0..candles.len() {
        if period == 0 || i + 1 < period {
            upper.push(None);
            middle.push(None);
            lower.push(None);
            continue;
        }

        let window = &candles[i + 1 - period..=i];
        let mean: f64 = window.iter().map(|c| c.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|c| {
                let diff = c.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        middle.push(Some(round2(mean)));
        upper.push(Some(round2(mean + multiplier * stddev)));
        lower.push(Some(round2(mean - multiplier * stddev)));
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_candles;

    #[test]
    fn bollinger_warmup() {
        let candles = test_candles(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let bands = calculate_bollinger(&candles, 3, 2.0);

        assert!(bands.middle[0].is_none());
        assert!(bands.middle[1].is_none());
        assert!(bands.middle[2].is_some());
        assert!(bands.middle[4].is_some());
    }

    #[test]
    fn bollinger_constant_prices_bands_collapse() {
        let candles = test_candles(&[100.0; 5]);
        let bands = calculate_bollinger(&candles, 3, 2.0);

        assert_eq!(bands.middle[4], Some(100.0));
        assert_eq!(bands.upper[4], Some(100.0));
        assert_eq!(bands.lower[4], Some(100.0));
    }

    #[test]
    fn bollinger_known_calculation() {
        let candles = test_candles(&[10.0, 20.0, 30.0]);
        let bands = calculate_bollinger(&candles, 3, 2.0);

        // mean 20, population variance 200/3, stddev 8.1650 -> rounded bands
        assert_eq!(bands.middle[2], Some(20.0));
        assert_eq!(bands.upper[2], Some(36.33));
        assert_eq!(bands.lower[2], Some(3.67));
    }

    #[test]
    fn bollinger_multiplier_one() {
        let candles = test_candles(&[10.0, 20.0, 30.0]);
        let bands = calculate_bollinger(&candles, 3, 1.0);

        assert_eq!(bands.upper[2], Some(28.16));
        assert_eq!(bands.lower[2], Some(11.84));
    }

    #[test]
    fn bollinger_empty_input() {
        let bands = calculate_bollinger(&[], DEFAULT_PERIOD, DEFAULT_MULTIPLIER);
        assert!(bands.upper.is_empty());
        assert!(bands.middle.is_empty());
        assert!(bands.lower.is_empty());
    }
}
