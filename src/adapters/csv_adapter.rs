//! CSV-backed data source.
//!
//! Expects one file per ticker under the data directory, named
//! `<TICKER>.csv`, with a header row of `date,open,high,low,close,volume`
//! and dates in YYYY-MM-DD. Rows outside the requested range are dropped
//! and the result is sorted by date.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::error::FlowtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

#[derive(Debug, Clone)]
pub struct CsvAdapter {
    data_dir: PathBuf,
}

impl CsvAdapter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvAdapter {
            data_dir: data_dir.into(),
        }
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowtraderError> {
        let path = self.data_dir.join(format!("{ticker}.csv"));
        if !path.is_file() {
            return Err(FlowtraderError::NoData {
                ticker: ticker.to_owned(),
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| FlowtraderError::Data {
            reason: format!("failed to open {}: {e}", path.display()),
        })?;

        let mut bars = Vec::new();
        for record in reader.deserialize::<CsvBar>() {
            let row = record.map_err(|e| FlowtraderError::Data {
                reason: format!("bad row in {}: {e}", path.display()),
            })?;
            if row.date < start || row.date > end {
                continue;
            }
            bars.push(OhlcvBar {
                ticker: ticker.to_owned(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
