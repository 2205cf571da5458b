//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{backtest, Strategy};
use crate::domain::candle::normalize;
use crate::domain::chips::merge_chips;
use crate::domain::error::TwquantError;
use crate::domain::indicator::compute_indicators;
use crate::domain::score::{score, Fundamentals, ScoreInputs};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "twquant", about = "TWSE equity indicator & backtest engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators, institutional chips and the composite score
    Analyze {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        code: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay a strategy over the historical bars
    Backtest {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        code: String,
        /// One of: long, short, value
        #[arg(short, long)]
        strategy: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the available data range for a code
    Info {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        code: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            data_dir,
            code,
            config,
        } => run_analyze(data_dir, &code, config.as_ref()),
        Command::Backtest {
            data_dir,
            code,
            strategy,
            config,
        } => run_backtest(data_dir, &code, &strategy, config.as_ref()),
        Command::Info {
            data_dir,
            code,
            config,
        } => run_info(data_dir, &code, config.as_ref()),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TwquantError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// `--data-dir` wins; otherwise the config's `[data] dir` entry.
fn resolve_data_dir(
    flag: Option<PathBuf>,
    config: Option<&FileConfigAdapter>,
) -> Result<PathBuf, TwquantError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    config
        .and_then(|c| c.get_string("data", "dir"))
        .map(PathBuf::from)
        .ok_or_else(|| TwquantError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })
}

fn load_fundamentals(config: Option<&FileConfigAdapter>) -> Fundamentals {
    match config {
        Some(c) => Fundamentals {
            pe: c.get_double("fundamentals", "pe", 0.0),
            dividend_yield: c.get_double("fundamentals", "yield", 0.0),
            pb: c.get_double("fundamentals", "pb", 0.0),
        },
        None => Fundamentals::default(),
    }
}

fn open_adapter(
    data_dir: Option<PathBuf>,
    config_path: Option<&PathBuf>,
) -> Result<(CsvAdapter, Option<FileConfigAdapter>), ExitCode> {
    let config = match config_path {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let dir = match resolve_data_dir(data_dir, config.as_ref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(ExitCode::from(&e));
        }
    };
    Ok((CsvAdapter::new(dir), config))
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn run_analyze(data_dir: Option<PathBuf>, code: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let (adapter, config) = match open_adapter(data_dir, config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    eprintln!("Loading price data for {code}");
    let raw = match adapter.fetch_price_bars(code) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    let chips = match adapter.fetch_chip_records(code) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!("Computing indicators over {} bars", raw.len());
    let series = compute_indicators(normalize(&raw));
    let (series, chip_summary) = merge_chips(series, &chips);

    let fundamentals = load_fundamentals(config.as_ref());
    let inputs = ScoreInputs::from_series(&series, &chip_summary);
    let total = score(&inputs, &fundamentals);

    match series.candles.last() {
        Some(last) => {
            println!("{} ({} bars, {} to {})", code, series.len(), series.candles[0].date, last.date);
            println!("close: {:.2}  volume: {} lots", last.close, last.volume);
        }
        None => println!("{} (no bars)", code),
    }
    let last = series.len().saturating_sub(1);
    if !series.is_empty() {
        println!(
            "MA5: {}  MA20: {}  MA60: {}",
            fmt_opt(series.ma5[last]),
            fmt_opt(series.ma20[last]),
            fmt_opt(series.ma60[last]),
        );
        println!(
            "BB: {} / {} / {}",
            fmt_opt(series.bb_lower[last]),
            fmt_opt(series.bb_middle[last]),
            fmt_opt(series.bb_upper[last]),
        );
        println!(
            "K: {:.2}  D: {:.2}  RSI: {:.2}",
            series.k[last], series.d[last], series.rsi[last],
        );
        println!(
            "DIF: {:.2}  MACD: {:.2}  OSC: {:.2}",
            series.dif[last], series.macd[last], series.osc[last],
        );
    }
    println!(
        "5-day foreign net: {} lots, trust net: {} lots",
        inputs.foreign_5d, inputs.trust_5d,
    );
    println!("score: {}", total);
    ExitCode::SUCCESS
}

fn run_backtest(
    data_dir: Option<PathBuf>,
    code: &str,
    strategy_name: &str,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let strategy: Strategy = match strategy_name.parse() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(4);
        }
    };

    let (adapter, _config) = match open_adapter(data_dir, config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    eprintln!("Loading price data for {code}");
    let raw = match adapter.fetch_price_bars(code) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!("Running {strategy} backtest over {} bars", raw.len());
    let series = compute_indicators(normalize(&raw));
    let result = backtest(&series, strategy);

    println!("ROI: {:.1}%", result.roi);
    println!("Win rate: {}%", result.win_rate);
    println!("Trades: {}", result.trades);
    for i in 0..series.len() {
        if let Some(price) = result.buy_signals[i] {
            println!("  buy  {} @ {:.2}", series.candles[i].date, price);
        }
        if let Some(price) = result.sell_signals[i] {
            println!("  sell {} @ {:.2}", series.candles[i].date, price);
        }
    }
    ExitCode::SUCCESS
}

fn run_info(data_dir: Option<PathBuf>, code: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let (adapter, _config) = match open_adapter(data_dir, config_path) {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    match adapter.data_range(code) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", code, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", code);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
