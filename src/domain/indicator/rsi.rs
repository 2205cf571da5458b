//! RSI (Relative Strength Index), rolling-window variant.
//!
//! The first defined value (at index = period) uses the simple means of
//! gains and losses over the first `period` deltas. Every later index
//! recomputes the trailing `period` gains/losses directly from raw closes —
//! a rolling unweighted average, NOT Wilder's smoothed RSI. The distinction
//! is load-bearing: downstream consumers were calibrated against this
//! variant and the two diverge after the first window.
//!
//! Formula: RSI = 100 - 100 / (1 + avg_gain / avg_loss), or 100 when
//! avg_loss is zero. Indices before `period` emit the neutral 50.

use crate::domain::candle::Candle;

pub const DEFAULT_PERIOD: usize = 14;
const NEUTRAL: f64 = 50.0;

pub fn calculate_rsi(candles: &[Candle], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![NEUTRAL; candles.len()];
    }

    let mut out = Vec::with_capacity(candles.len());
    let mut gains = 0.0;
    let mut losses = 0.0;

    for i in 0..candles.len() {
        if i == 0 {
            out.push(NEUTRAL);
            continue;
        }

        let change = candles[i].close - candles[i - 1].close;

        if i <= period {
            gains += change.max(0.0);
            losses += (-change).max(0.0);
            if i == period {
                out.push(rsi_value(gains / period as f64, losses / period as f64));
            } else {
                out.push(NEUTRAL);
            }
        } else {
            let mut sum_gain = 0.0;
            let mut sum_loss = 0.0;
            for j in 0..period {
                let change = candles[i - j].close - candles[i - j - 1].close;
                if change > 0.0 {
                    sum_gain += change;
                } else {
                    sum_loss += -change;
                }
            }
            out.push(rsi_value(
                sum_gain / period as f64,
                sum_loss / period as f64,
            ));
        }
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
