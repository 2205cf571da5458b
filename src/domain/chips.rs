//! Institutional chip aggregation.
//!
//! Folds per-transaction buy/sell records from the three institutional
//! investor classes into per-day net lot positions, writes them onto the
//! matching candles, and keeps a chip-only summary for days without a
//! matching candle.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::domain::candle::SHARES_PER_LOT;
use crate::domain::indicator::IndicatorSeries;

/// Days kept in the chip-only summary.
pub const SUMMARY_DAYS: usize = 30;
/// Trailing days summed for the institutional flow signal.
pub const FLOW_WINDOW: usize = 5;

/// One raw buy/sell record for a single investor class on a single day.
/// Share counts, not lots.
#[derive(Debug, Clone)]
pub struct ChipRecord {
    pub date: NaiveDate,
    /// Investor-class tag as delivered upstream.
    pub investor: String,
    pub buy: f64,
    pub sell: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestorClass {
    Foreign,
    Trust,
    Dealer,
}

impl InvestorClass {
    /// Map an upstream tag to a known class. Unknown tags return `None`
    /// and their records are dropped rather than erroring.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Foreign_Investor" => Some(InvestorClass::Foreign),
            "Investment_Trust" => Some(InvestorClass::Trust),
            "Dealer" => Some(InvestorClass::Dealer),
            _ => None,
        }
    }
}

/// Aggregated net lots for one day, all three classes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChipDay {
    /// `MM-DD` display label.
    pub day: String,
    pub foreign: i64,
    pub trust: i64,
    pub dealer: i64,
}

#[derive(Default)]
struct DayNet {
    foreign: i64,
    trust: i64,
    dealer: i64,
}

/// Merge chip records onto the series and return it together with the
/// chip-only summary (ascending by date, truncated to the most recent
/// [`SUMMARY_DAYS`]). Net lots are rounded per record before summing.
/// Records on days with no matching candle appear only in the summary.
pub fn merge_chips(
    mut series: IndicatorSeries,
    records: &[ChipRecord],
) -> (IndicatorSeries, Vec<ChipDay>) {
    let mut by_date: BTreeMap<NaiveDate, DayNet> = BTreeMap::new();
    for record in records {
        let Some(class) = InvestorClass::from_tag(&record.investor) else {
            continue;
        };
        let net_lots = ((record.buy - record.sell) / SHARES_PER_LOT).round() as i64;
        let day = by_date.entry(record.date).or_default();
        match class {
            InvestorClass::Foreign => day.foreign += net_lots,
            InvestorClass::Trust => day.trust += net_lots,
            InvestorClass::Dealer => day.dealer += net_lots,
        }
    }

    let index: HashMap<NaiveDate, usize> = series
        .candles
        .iter()
        .enumerate()
        .map(|(i, c)| (c.date, i))
        .collect();

    let mut summary = Vec::with_capacity(by_date.len());
    for (date, net) in &by_date {
        if let Some(&i) = index.get(date) {
            series.foreign[i] = Some(net.foreign);
            series.trust[i] = Some(net.trust);
            series.dealer[i] = Some(net.dealer);
        }
        summary.push(ChipDay {
            day: date.format("%m-%d").to_string(),
            foreign: net.foreign,
            trust: net.trust,
            dealer: net.dealer,
        });
    }

    let excess = summary.len().saturating_sub(SUMMARY_DAYS);
    summary.drain(..excess);
    (series, summary)
}

/// Trailing [`FLOW_WINDOW`]-day (foreign, trust) net lot sums over the
/// chip summary; sums whatever is available when shorter.
pub fn five_day_net(summary: &[ChipDay]) -> (i64, i64) {
    let start = summary.len().saturating_sub(FLOW_WINDOW);
    summary[start..]
        .iter()
        .fold((0, 0), |(f, t), day| (f + day.foreign, t + day.trust))
}
