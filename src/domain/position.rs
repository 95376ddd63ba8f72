//! Open positions and the trade log entries they produce.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::order::Side;

/// An open holding in one ticker, carried at weighted-average cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub quantity: u64,
    pub avg_price: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.avg_price
    }
}

/// One filled order as it lands in the trade log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: Side,
    pub ticker: String,
    pub quantity: u64,
    pub price: f64,
    /// Gross value of the fill, quantity times price, before commission.
    pub value: f64,
    pub commission: f64,
}
