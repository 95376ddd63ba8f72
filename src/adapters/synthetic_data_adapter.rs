//! Random-walk data source for runs without a data directory.
//!
//! Prices start uniformly in [100, 300) and drift with a slight upward
//! bias. Bars cover weekdays only. With a seed set, the same ticker and
//! range always produce the same series, which is what the tests and any
//! reproducible run want.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::error::FlowtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone, Default)]
pub struct SyntheticDataAdapter {
    seed: Option<u64>,
}

impl SyntheticDataAdapter {
    pub fn new() -> Self {
        SyntheticDataAdapter { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        SyntheticDataAdapter { seed: Some(seed) }
    }

    /// Derive a per-ticker rng so different tickers walk independently
    /// under one run seed.
    fn rng_for(&self, ticker: &str) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mut h = FNV_OFFSET ^ seed;
                for byte in ticker.bytes() {
                    h ^= u64::from(byte);
                    h = h.wrapping_mul(FNV_PRIME);
                }
                StdRng::seed_from_u64(h)
            }
            None => StdRng::from_entropy(),
        }
    }
}

impl DataPort for SyntheticDataAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowtraderError> {
        if end < start {
            return Err(FlowtraderError::Data {
                reason: format!("end date {end} precedes start date {start}"),
            });
        }

        let mut rng = self.rng_for(ticker);
        let mut close = rng.gen_range(100.0..300.0);
        let mut bars = Vec::new();

        let mut date = start;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let delta = (rng.r#gen::<f64>() - 0.48) * 5.0;
                close = (close + delta).max(1.0);
                let open = close - rng.r#gen::<f64>() * 2.0;
                let low = close - rng.r#gen::<f64>() * 2.0;
                let high = close + rng.r#gen::<f64>() * 2.0;
                let volume = rng.gen_range(100_000..1_100_000);
                bars.push(OhlcvBar {
                    ticker: ticker.to_owned(),
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                });
            }
            date = date.succ_opt().ok_or_else(|| FlowtraderError::Data {
                reason: "date range overflow".to_string(),
            })?;
        }

        Ok(bars)
    }
}
