//! Market data access port trait.

use chrono::NaiveDate;

use crate::domain::candle::RawBar;
use crate::domain::chips::ChipRecord;
use crate::domain::error::TwquantError;

pub trait MarketDataPort {
    /// Raw price bars for one instrument, oldest first.
    fn fetch_price_bars(&self, code: &str) -> Result<Vec<RawBar>, TwquantError>;

    /// Institutional buy/sell records for one instrument. An instrument
    /// without chip data yields an empty vector, not an error.
    fn fetch_chip_records(&self, code: &str) -> Result<Vec<ChipRecord>, TwquantError>;

    /// (first date, last date, bar count) of the available history.
    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TwquantError>;
}
