//! Order-execution node payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Day,
    Gtc,
    Ioc,
    Fok,
}

/// Order size: a fixed share count, or the "all" sentinel meaning the full
/// held quantity on a sell and as many shares as cash allows on a buy.
///
/// Wire format is `number | "all"`, matching the authoring tool's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuantityRepr", into = "QuantityRepr")]
pub enum Quantity {
    Shares(u64),
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Shares(u64),
    Sentinel(String),
}

impl TryFrom<QuantityRepr> for Quantity {
    type Error = String;

    fn try_from(repr: QuantityRepr) -> Result<Self, Self::Error> {
        match repr {
            QuantityRepr::Shares(n) => Ok(Quantity::Shares(n)),
            QuantityRepr::Sentinel(s) if s == "all" => Ok(Quantity::All),
            QuantityRepr::Sentinel(s) => Err(format!("unknown quantity sentinel {s:?}")),
        }
    }
}

impl From<Quantity> for QuantityRepr {
    fn from(quantity: Quantity) -> Self {
        match quantity {
            Quantity::Shares(n) => QuantityRepr::Shares(n),
            Quantity::All => QuantityRepr::Sentinel("all".to_string()),
        }
    }
}

/// Order-execution node payload. Fields are optional because the authoring
/// tool saves nodes while they are still being configured; incomplete orders
/// are skipped at execution time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSpec {
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub quantity: Option<Quantity>,
    pub price: Option<f64>,
    pub time_in_force: Option<TimeInForce>,
}

impl OrderSpec {
    /// Side, order type, and quantity must all be set before the node can
    /// place a trade.
    pub fn is_complete(&self) -> bool {
        self.side.is_some() && self.order_type.is_some() && self.quantity.is_some()
    }
}
