//! Performance metrics computed from the trade log and equity curve.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::ledger::EquityPoint;
use crate::domain::order::Side;
use crate::domain::position::Trade;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub total_return_pct: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub number_of_trades: usize,
    pub profit_factor: f64,
}

impl PerformanceMetrics {
    pub fn compute(initial_capital: f64, trades: &[Trade], equity_curve: &[EquityPoint]) -> Self {
        let final_equity = equity_curve
            .last()
            .map_or(initial_capital, |p| p.equity);
        let total_return = final_equity - initial_capital;
        let total_return_pct = if initial_capital > 0.0 {
            total_return / initial_capital * 100.0
        } else {
            0.0
        };

        PerformanceMetrics {
            total_return,
            total_return_pct,
            annualized_return: annualized(total_return_pct / 100.0, equity_curve.len()),
            sharpe_ratio: sharpe(equity_curve),
            max_drawdown: max_drawdown(initial_capital, equity_curve),
            win_rate: win_rate(trades),
            number_of_trades: trades.len(),
            profit_factor: profit_factor(trades),
        }
    }
}

/// Compound the whole-period return over a 252-day year. Returns percent.
fn annualized(period_return: f64, days: usize) -> f64 {
    if days == 0 {
        return 0.0;
    }
    ((1.0 + period_return).powf(TRADING_DAYS_PER_YEAR / days as f64) - 1.0) * 100.0
}

/// Annualized Sharpe ratio over daily equity returns, risk-free rate zero.
fn sharpe(equity_curve: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = equity_curve
        .windows(2)
        .filter(|w| w[0].equity > 0.0)
        .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
        .collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let stdev = variance.sqrt();
    if stdev == 0.0 {
        return 0.0;
    }
    mean / stdev * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough equity decline, in percent of the peak. The peak
/// starts at initial capital, so a curve that only ever falls still reads a
/// drawdown against the starting balance.
fn max_drawdown(initial_capital: f64, equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = initial_capital;
    let mut worst = 0.0f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            worst = worst.max((peak - point.equity) / peak);
        }
    }
    worst * 100.0
}

/// Share of trades counted as wins, over all trades. A sell is a win when
/// some strictly earlier buy in the same ticker filled at a strictly lower
/// price; buys never count as wins.
fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            t.side == Side::Sell
                && trades[..*i]
                    .iter()
                    .any(|b| b.side == Side::Buy && b.ticker == t.ticker && b.price < t.price)
        })
        .count();
    wins as f64 / trades.len() as f64 * 100.0
}

/// Gross profit over gross loss, realized by replaying the trade log
/// against a weighted-average cost book. Commissions are not part of the
/// realized amounts.
fn profit_factor(trades: &[Trade]) -> f64 {
    let mut book: HashMap<&str, (u64, f64)> = HashMap::new();
    let mut gross_profit = 0.0f64;
    let mut gross_loss = 0.0f64;

    for trade in trades {
        match trade.side {
            Side::Buy => {
                let entry = book.entry(trade.ticker.as_str()).or_insert((0, 0.0));
                let total_cost = entry.0 as f64 * entry.1 + trade.value;
                entry.0 += trade.quantity;
                entry.1 = total_cost / entry.0 as f64;
            }
            Side::Sell => {
                let Some(entry) = book.get_mut(trade.ticker.as_str()) else {
                    continue;
                };
                let matched = trade.quantity.min(entry.0);
                if matched == 0 {
                    continue;
                }
                let pnl = matched as f64 * (trade.price - entry.1);
                if pnl >= 0.0 {
                    gross_profit += pnl;
                } else {
                    gross_loss -= pnl;
                }
                entry.0 -= matched;
                if entry.0 == 0 {
                    book.remove(trade.ticker.as_str());
                }
            }
        }
    }

    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        gross_profit / gross_loss
    }
}
