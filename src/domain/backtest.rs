//! The backtest engine.
//!
//! A run replays the strategy graph against daily bars: for every trading
//! day in the fetched history, each stock selection node triggers one
//! traversal pass over its ticker's snapshot, then the portfolio is marked
//! to market and the equity curve extended. Tickers whose data cannot be
//! fetched degrade to per-ticker errors; the run only fails outright when
//! nothing at all could be loaded.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::graph::{Graph, GraphIndex};
use crate::domain::indicators;
use crate::domain::ledger::{EquityPoint, Ledger};
use crate::domain::metrics::PerformanceMetrics;
use crate::domain::ohlcv::{MarketSnapshot, OhlcvBar};
use crate::domain::position::Trade;
use crate::domain::traversal;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub commission_per_trade: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub success: bool,
    pub errors: Vec<String>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: PerformanceMetrics,
}

impl BacktestResult {
    fn failed(errors: Vec<String>) -> Self {
        BacktestResult {
            success: false,
            errors,
            ..Default::default()
        }
    }
}

/// Indicator names available to technical conditions, with the series each
/// one maps to.
const INDICATOR_SMA_20: &str = "sma_20";
const INDICATOR_SMA_50: &str = "sma_50";
const INDICATOR_RSI_14: &str = "rsi_14";

struct IndicatorTable {
    sma_20: Vec<Option<f64>>,
    sma_50: Vec<Option<f64>>,
    rsi_14: Vec<Option<f64>>,
}

impl IndicatorTable {
    fn compute(bars: &[OhlcvBar]) -> Self {
        IndicatorTable {
            sma_20: indicators::sma(bars, 20),
            sma_50: indicators::sma(bars, 50),
            rsi_14: indicators::rsi(bars, 14),
        }
    }

    fn at(&self, idx: usize) -> HashMap<String, f64> {
        let mut map = HashMap::new();
        if let Some(v) = self.sma_20[idx] {
            map.insert(INDICATOR_SMA_20.to_string(), v);
        }
        if let Some(v) = self.sma_50[idx] {
            map.insert(INDICATOR_SMA_50.to_string(), v);
        }
        if let Some(v) = self.rsi_14[idx] {
            map.insert(INDICATOR_RSI_14.to_string(), v);
        }
        map
    }
}

pub fn run_backtest(
    graph: &Graph,
    params: &BacktestParams,
    data: &dyn DataPort,
) -> BacktestResult {
    if !graph.has_start_node() {
        return BacktestResult::failed(vec!["no start node found".to_string()]);
    }

    let tickers = graph.tickers();
    if tickers.is_empty() {
        return BacktestResult::failed(vec![
            "no tickers specified in stock selection nodes".to_string(),
        ]);
    }

    let mut errors = Vec::new();
    let mut series: HashMap<String, Vec<OhlcvBar>> = HashMap::new();
    for ticker in &tickers {
        match data.fetch_ohlcv(ticker, params.start_date, params.end_date) {
            Ok(bars) if !bars.is_empty() => {
                series.insert(ticker.clone(), bars);
            }
            Ok(_) => errors.push(format!("no historical data for {ticker}")),
            Err(err) => errors.push(err.to_string()),
        }
    }
    if series.is_empty() {
        errors.push("no historical data for any requested ticker".to_string());
        return BacktestResult::failed(errors);
    }

    let indicator_tables: HashMap<&str, IndicatorTable> = series
        .iter()
        .map(|(ticker, bars)| (ticker.as_str(), IndicatorTable::compute(bars)))
        .collect();

    // union of trading days, plus per-ticker date lookup
    let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut date_index: HashMap<&str, HashMap<NaiveDate, usize>> = HashMap::new();
    for (ticker, bars) in &series {
        let by_date = date_index.entry(ticker.as_str()).or_default();
        for (idx, bar) in bars.iter().enumerate() {
            all_dates.insert(bar.date);
            by_date.insert(bar.date, idx);
        }
    }

    let index = GraphIndex::new(graph);
    let mut ledger = Ledger::new(params.initial_capital);
    let mut latest_close: HashMap<String, f64> = HashMap::new();

    for &date in &all_dates {
        for ticker in &tickers {
            let Some(bars) = series.get(ticker) else {
                continue;
            };
            let Some(&idx) = date_index.get(ticker.as_str()).and_then(|m| m.get(&date)) else {
                continue;
            };
            let bar = &bars[idx];
            latest_close.insert(ticker.clone(), bar.close);

            let mut snapshot = MarketSnapshot::from_bar(bar);
            if let Some(table) = indicator_tables.get(ticker.as_str()) {
                snapshot.indicators = table.at(idx);
            }

            for (node, selection) in graph.stock_nodes() {
                if selection.ticker.as_deref() == Some(ticker.as_str()) {
                    traversal::execute_pass(
                        &index,
                        &node.id,
                        &snapshot,
                        date,
                        &mut ledger,
                        params.commission_per_trade,
                    );
                }
            }
        }

        let equity = ledger.mark_to_market(&latest_close);
        ledger.record_equity(date, equity);
    }

    let Ledger {
        trades,
        equity_curve,
        ..
    } = ledger;
    let metrics = PerformanceMetrics::compute(params.initial_capital, &trades, &equity_curve);

    BacktestResult {
        success: true,
        errors,
        trades,
        equity_curve,
        metrics,
    }
}
