//! Strategy backtest simulator.
//!
//! Replays one of three fixed rule-sets bar-by-bar over an indicator
//! series. The position state machine is flat/in-position with a single
//! concurrent position; crossing tests read the emitted (two-decimal)
//! indicator columns. The scan starts at index 20 so MA20 is always
//! defined inside the loop, and series shorter than 60 bars short-circuit
//! to a zero result rather than simulating on thin history.

use std::fmt;
use std::str::FromStr;

use crate::domain::indicator::IndicatorSeries;

/// Cash for share-sized strategies; notional base for the short strategy.
pub const STARTING_CAPITAL: f64 = 100_000.0;
/// Minimum bars before a simulation is attempted.
pub const MIN_BARS: usize = 60;

const SCAN_START: usize = 20;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
// marker plot offsets: entries sit below the low, exits above the high
const BELOW_LOW: f64 = 0.96;
const ABOVE_HIGH: f64 = 1.04;

/// The closed set of strategy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// MA5/MA20 trend filter with %K/%D cross timing, long side.
    Long,
    /// Mirrored conditions, notional short position.
    Short,
    /// RSI 30/70 mean-reversion, long side.
    Value,
}

impl Strategy {
    fn entry_signal(self, today: &BarView, prev: &BarView) -> bool {
        match self {
            Strategy::Long => {
                ma_above(today.ma5, today.ma20) && prev.k < prev.d && today.k > today.d
            }
            Strategy::Short => {
                ma_above(today.ma20, today.ma5) && prev.k > prev.d && today.k < today.d
            }
            Strategy::Value => today.rsi < RSI_OVERSOLD && prev.rsi >= RSI_OVERSOLD,
        }
    }

    fn exit_signal(self, today: &BarView, prev: &BarView) -> bool {
        match self {
            Strategy::Long => prev.k > prev.d && today.k < today.d,
            Strategy::Short => prev.k < prev.d && today.k > today.d,
            Strategy::Value => today.rsi > RSI_OVERBOUGHT && prev.rsi <= RSI_OVERBOUGHT,
        }
    }

    /// The short strategy sizes by notional and accrues profit directly;
    /// the others hold a share count against cash.
    fn is_notional(self) -> bool {
        matches!(self, Strategy::Short)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Strategy::Long),
            "short" => Ok(Strategy::Short),
            "value" => Ok(Strategy::Value),
            other => Err(format!(
                "unknown strategy '{}' (expected long, short or value)",
                other
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Long => write!(f, "long"),
            Strategy::Short => write!(f, "short"),
            Strategy::Value => write!(f, "value"),
        }
    }
}

/// Simulation output. Signal columns align with the input series; a `Some`
/// marks a trade marker at its plot price.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    /// Net ROI percent, one decimal.
    pub roi: f64,
    /// Win percent over closed trades, integer; 0 with no closed trades.
    pub win_rate: u32,
    /// Closed trades only; a final mark-to-market close is not counted.
    pub trades: usize,
    pub buy_signals: Vec<Option<f64>>,
    pub sell_signals: Vec<Option<f64>>,
}

impl BacktestResult {
    fn zeroed(len: usize) -> Self {
        BacktestResult {
            roi: 0.0,
            win_rate: 0,
            trades: 0,
            buy_signals: vec![None; len],
            sell_signals: vec![None; len],
        }
    }
}

/// Indicator values of one bar as seen by the strategy rules.
struct BarView {
    ma5: Option<f64>,
    ma20: Option<f64>,
    k: f64,
    d: f64,
    rsi: f64,
}

impl BarView {
    fn at(series: &IndicatorSeries, i: usize) -> Self {
        BarView {
            ma5: series.ma5[i],
            ma20: series.ma20[i],
            k: series.k[i],
            d: series.d[i],
            rsi: series.rsi[i],
        }
    }
}

fn ma_above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Replay `strategy` over the series and return the trade ledger and
/// aggregate statistics. Deterministic: identical input and strategy give
/// an identical result.
pub fn backtest(series: &IndicatorSeries, strategy: Strategy) -> BacktestResult {
    let n = series.len();
    if n < MIN_BARS {
        return BacktestResult::zeroed(n);
    }

    let mut buy_signals = vec![None; n];
    let mut sell_signals = vec![None; n];

    let mut capital = STARTING_CAPITAL;
    let mut shares: i64 = 0;
    let mut short_open = false;
    let mut entry_price = 0.0;
    let mut trades = 0usize;
    let mut wins = 0usize;
    let mut total_profit = 0.0;

    for i in SCAN_START..n {
        let today = BarView::at(series, i);
        let prev = BarView::at(series, i - 1);
        let candle = &series.candles[i];
        let enter = strategy.entry_signal(&today, &prev);
        let exit = strategy.exit_signal(&today, &prev);

        if strategy.is_notional() {
            if !short_open && enter && candle.close > 0.0 {
                entry_price = candle.close;
                short_open = true;
                sell_signals[i] = Some(candle.high * ABOVE_HIGH);
            } else if short_open && exit {
                let profit = STARTING_CAPITAL * (entry_price - candle.close) / entry_price;
                total_profit += profit;
                if profit > 0.0 {
                    wins += 1;
                }
                trades += 1;
                short_open = false;
                buy_signals[i] = Some(candle.low * BELOW_LOW);
            }
        } else if shares == 0 && enter && candle.close > 0.0 {
            shares = (capital / candle.close).floor() as i64;
            entry_price = candle.close;
            capital -= shares as f64 * candle.close;
            buy_signals[i] = Some(candle.low * BELOW_LOW);
        } else if shares > 0 && exit {
            let profit = (candle.close - entry_price) * shares as f64;
            capital += shares as f64 * candle.close;
            total_profit += profit;
            if profit > 0.0 {
                wins += 1;
            }
            trades += 1;
            shares = 0;
            sell_signals[i] = Some(candle.high * ABOVE_HIGH);
        }
    }

    // A still-open position is marked to market at the final close. The
    // implicit close feeds total profit only: no marker, no trade count,
    // no win count.
    if let Some(last) = series.candles.last() {
        if short_open {
            total_profit += STARTING_CAPITAL * (entry_price - last.close) / entry_price;
        } else if shares > 0 {
            total_profit += (last.close - entry_price) * shares as f64;
        }
    }

    let roi = round1(total_profit / STARTING_CAPITAL * 100.0);
    let win_rate = if trades > 0 {
        (wins as f64 / trades as f64 * 100.0).round() as u32
    } else {
        0
    };

    BacktestResult {
        roi,
        win_rate,
        trades,
        buy_signals,
        sell_signals,
    }
}
