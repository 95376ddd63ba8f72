//! Indicator series computed over a ticker's bar history.
//!
//! Each function returns one value per input bar, `None` until enough
//! history has accrued. The results feed the per-day indicator map that
//! technical conditions read from.

use crate::domain::ohlcv::OhlcvBar;

/// Simple moving average of closes over `period` bars.
pub fn sma(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }
    let mut sum: f64 = bars[..period].iter().map(|b| b.close).sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..bars.len() {
        sum += bars[i].close - bars[i - period].close;
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Relative strength index over `period` bars, Wilder smoothing. The first
/// value lands at index `period` since it needs `period` close-to-close
/// changes.
pub fn rsi(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = bars[i].close - bars[i - 1].close;
        if change >= 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        let (gain, loss) = if change >= 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                ticker: "AAPL".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100_000,
            })
            .collect()
    }

    #[test]
    fn sma_warms_up_then_slides() {
        let series = bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let values = sma(&series, 3);
        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert_eq!(values[2], Some(2.0));
        assert_eq!(values[3], Some(3.0));
        assert_eq!(values[4], Some(4.0));
    }

    #[test]
    fn sma_short_history_is_all_none() {
        let series = bars(&[1.0, 2.0]);
        assert!(sma(&series, 3).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_is_100_on_straight_gains() {
        let series = bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let values = rsi(&series, 3);
        assert_eq!(values[2], None);
        assert_eq!(values[3], Some(100.0));
        assert_eq!(values[5], Some(100.0));
    }

    #[test]
    fn rsi_balanced_moves_sit_near_50() {
        let series = bars(&[100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 100.0]);
        let values = rsi(&series, 4);
        let v = values[4].unwrap();
        assert!(v > 30.0 && v < 70.0, "rsi {v} outside mid band");
    }

    #[test]
    fn rsi_stays_in_bounds() {
        let series = bars(&[
            100.0, 95.0, 103.0, 99.0, 110.0, 90.0, 104.0, 101.0, 97.0, 108.0,
        ]);
        for v in rsi(&series, 4).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
