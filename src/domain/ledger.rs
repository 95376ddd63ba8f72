//! Cash and position ledger.
//!
//! The ledger is the single mutable state of a backtest run. Orders that
//! cannot be honored (not enough cash, nothing held to sell, a zero
//! resolved quantity) are skipped silently, the way a broker simulator
//! rejects rather than errors. Buys update the position's weighted-average
//! cost; sells realize against it and drop the position at zero.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::order::{Quantity, Side};
use crate::domain::position::{Position, Trade};

/// One point on the daily equity curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// What became of an order handed to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Filled {
        quantity: u64,
        price: f64,
        value: f64,
        commission: f64,
    },
    Skipped,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: HashMap<String, Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Ledger {
    pub fn new(initial_capital: f64) -> Self {
        Ledger {
            cash: initial_capital,
            initial_capital,
            positions: HashMap::new(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn position(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    pub fn held_quantity(&self, ticker: &str) -> u64 {
        self.positions.get(ticker).map_or(0, |p| p.quantity)
    }

    /// Apply one order at the given fill price. The `All` quantity resolves
    /// to the held quantity for sells and to the largest share count the
    /// cash balance covers for buys.
    pub fn apply_order(
        &mut self,
        date: NaiveDate,
        ticker: &str,
        side: Side,
        quantity: Quantity,
        price: f64,
        commission: f64,
    ) -> OrderOutcome {
        if price <= 0.0 {
            return OrderOutcome::Skipped;
        }

        let resolved = match (quantity, side) {
            (Quantity::Shares(n), _) => n,
            (Quantity::All, Side::Sell) => self.held_quantity(ticker),
            (Quantity::All, Side::Buy) => (self.cash / price).floor() as u64,
        };
        if resolved == 0 {
            return OrderOutcome::Skipped;
        }

        let value = resolved as f64 * price;

        match side {
            Side::Buy => {
                if self.cash < value + commission {
                    return OrderOutcome::Skipped;
                }
                self.cash -= value + commission;
                let position = self
                    .positions
                    .entry(ticker.to_owned())
                    .or_insert_with(|| Position {
                        ticker: ticker.to_owned(),
                        quantity: 0,
                        avg_price: 0.0,
                    });
                let total_cost = position.cost_basis() + value;
                position.quantity += resolved;
                position.avg_price = total_cost / position.quantity as f64;
            }
            Side::Sell => {
                let Some(position) = self.positions.get_mut(ticker) else {
                    return OrderOutcome::Skipped;
                };
                if position.quantity < resolved {
                    return OrderOutcome::Skipped;
                }
                position.quantity -= resolved;
                self.cash += value - commission;
                if position.quantity == 0 {
                    self.positions.remove(ticker);
                }
            }
        }

        self.trades.push(Trade {
            date,
            side,
            ticker: ticker.to_owned(),
            quantity: resolved,
            price,
            value,
            commission,
        });
        OrderOutcome::Filled {
            quantity: resolved,
            price,
            value,
            commission,
        }
    }

    /// Cash plus open positions marked at the supplied closing prices. A
    /// ticker absent from the price map contributes nothing for the day.
    pub fn mark_to_market(&self, prices: &HashMap<String, f64>) -> f64 {
        let holdings: f64 = self
            .positions
            .values()
            .map(|p| prices.get(&p.ticker).map_or(0.0, |price| p.market_value(*price)))
            .sum();
        self.cash + holdings
    }

    pub fn record_equity(&mut self, date: NaiveDate, equity: f64) {
        self.equity_curve.push(EquityPoint { date, equity });
    }
}
