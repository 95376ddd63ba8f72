#![allow(dead_code)]

use chrono::NaiveDate;
use flowtrader::domain::condition::{CompareOp, Condition, ConditionKind};
use flowtrader::domain::error::FlowtraderError;
use flowtrader::domain::graph::{Edge, Graph, Node, NodeKind, StartMarker, StockSelection};
pub use flowtrader::domain::ohlcv::OhlcvBar;
use flowtrader::domain::order::{OrderSpec, OrderType, Quantity, Side};
use flowtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowtraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(FlowtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, day: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 500_000,
    }
}

pub fn start_node(id: &str) -> Node {
    Node {
        id: id.to_string(),
        kind: NodeKind::Start(StartMarker::default()),
    }
}

pub fn stock_node(id: &str, ticker: &str) -> Node {
    Node {
        id: id.to_string(),
        kind: NodeKind::StockSelection(StockSelection {
            ticker: Some(ticker.to_string()),
            ..Default::default()
        }),
    }
}

pub fn condition_node(id: &str, op: CompareOp, value: f64) -> Node {
    Node {
        id: id.to_string(),
        kind: NodeKind::Condition(Condition {
            condition_type: Some(ConditionKind::Price),
            operator: Some(op),
            value: Some(value),
            ..Default::default()
        }),
    }
}

pub fn order_node(id: &str, side: Side, quantity: Quantity) -> Node {
    Node {
        id: id.to_string(),
        kind: NodeKind::OrderExecution(OrderSpec {
            side: Some(side),
            order_type: Some(OrderType::Market),
            quantity: Some(quantity),
            ..Default::default()
        }),
    }
}

pub fn edge(source: &str, target: &str) -> Edge {
    Edge {
        source: source.to_string(),
        target: target.to_string(),
        ..Default::default()
    }
}

pub fn edge_handle(source: &str, target: &str, handle: &str) -> Edge {
    Edge {
        source: source.to_string(),
        target: target.to_string(),
        source_handle: Some(handle.to_string()),
        ..Default::default()
    }
}

/// start -> stock -> (price > threshold) -> buy `quantity`.
pub fn buy_graph(ticker: &str, threshold: f64, quantity: Quantity) -> Graph {
    Graph {
        nodes: vec![
            start_node("start"),
            stock_node("stock", ticker),
            condition_node("cond", CompareOp::Gt, threshold),
            order_node("buy", Side::Buy, quantity),
        ],
        edges: vec![
            edge("start", "stock"),
            edge("stock", "cond"),
            edge_handle("cond", "buy", "outTrue"),
        ],
    }
}
