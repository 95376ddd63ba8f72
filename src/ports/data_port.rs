//! Port for historical market data.

use chrono::NaiveDate;

use crate::domain::error::FlowtraderError;
use crate::domain::ohlcv::OhlcvBar;

/// Supplies daily bars for a ticker over an inclusive date range, sorted
/// ascending by date.
pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowtraderError>;
}
