//! Daily OHLCV bars and per-day market snapshots.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// One trading day of price data for one ticker. Immutable once produced by
/// a data source; a series is ordered by date and contains weekdays only.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// The market data visible to condition evaluation for one ticker on one
/// day: the bar itself plus any precomputed indicator values, keyed by name
/// (e.g. "sma_20", "rsi_14").
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub ticker: String,
    /// The evaluation price, equal to the bar's close.
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub timestamp: NaiveDateTime,
    pub indicators: HashMap<String, f64>,
}

impl MarketSnapshot {
    /// Daily bars carry no intraday time, so the timestamp is the bar's date
    /// at midnight.
    pub fn from_bar(bar: &OhlcvBar) -> Self {
        MarketSnapshot {
            ticker: bar.ticker.clone(),
            price: bar.close,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            timestamp: bar.date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            indicators: HashMap::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}
