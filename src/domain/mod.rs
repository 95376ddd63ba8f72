//! Core domain types and simulation logic.

pub mod ohlcv;
pub mod order;
pub mod condition;
pub mod graph;
pub mod validation;
pub mod position;
pub mod ledger;
pub mod traversal;
pub mod indicators;
pub mod backtest;
pub mod metrics;
pub mod error;
