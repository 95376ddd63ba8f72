//! Backtester for node-graph trading strategies.
//!
//! Strategies are directed graphs of typed nodes (start, stock selection,
//! condition, order execution) authored in an external visual editor and
//! handed to this crate as immutable node/edge documents. The simulation
//! walks the graph day by day against historical bars, keeping cash and
//! position accounting in a run-scoped ledger.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
