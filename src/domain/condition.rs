//! Condition node payloads and their evaluation.
//!
//! A condition compares a value drawn from the day's market snapshot against
//! a fixed threshold. Evaluation is pure and fails closed: a condition with
//! missing type, operator, or threshold returns `false` rather than erroring,
//! so a half-configured node simply takes its false branch.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::domain::ohlcv::MarketSnapshot;

/// The only timeframe tag the time condition understands.
pub const TIMEFRAME_MARKET_OPEN: &str = "market_open";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Price,
    Technical,
    Fundamental,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl CompareOp {
    /// Exact numeric comparison, no tolerance on equality.
    pub fn compare(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Gt => left > right,
            CompareOp::Lt => left < right,
            CompareOp::Eq => left == right,
            CompareOp::Ge => left >= right,
            CompareOp::Le => left <= right,
        }
    }
}

/// Condition node payload. Every field is optional: the authoring tool saves
/// nodes as the user builds them, so partially configured conditions are a
/// normal input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    pub condition_type: Option<ConditionKind>,
    pub operator: Option<CompareOp>,
    pub value: Option<f64>,
    pub indicator: Option<String>,
    pub timeframe: Option<String>,
}

impl Condition {
    pub fn is_complete(&self) -> bool {
        self.condition_type.is_some() && self.operator.is_some() && self.value.is_some()
    }
}

/// Evaluate a condition against one day's market snapshot.
///
/// Value resolution by kind:
/// - `price`: the snapshot price
/// - `technical`: indicator map lookup by name; no name set fails closed,
///   an unknown name resolves to 0
/// - `fundamental`: no fundamentals source is wired in; resolves to 0
/// - `time`: `market_open` is true from 09:30 to 09:59 of the snapshot
///   timestamp, every other timeframe is false
pub fn evaluate(condition: &Condition, snapshot: &MarketSnapshot) -> bool {
    let (Some(kind), Some(op), Some(threshold)) = (
        condition.condition_type,
        condition.operator,
        condition.value,
    ) else {
        return false;
    };

    let left = match kind {
        ConditionKind::Price => snapshot.price,
        ConditionKind::Technical => {
            let Some(name) = condition.indicator.as_deref() else {
                return false;
            };
            snapshot.indicators.get(name).copied().unwrap_or(0.0)
        }
        ConditionKind::Fundamental => 0.0,
        ConditionKind::Time => {
            return match condition.timeframe.as_deref() {
                Some(TIMEFRAME_MARKET_OPEN) => {
                    snapshot.timestamp.hour() == 9 && snapshot.timestamp.minute() >= 30
                }
                _ => false,
            };
        }
    };

    op.compare(left, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn snapshot(price: f64) -> MarketSnapshot {
        MarketSnapshot {
            ticker: "AAPL".into(),
            price,
            open: price - 1.0,
            high: price + 1.0,
            low: price - 2.0,
            close: price,
            volume: 500_000,
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            indicators: HashMap::new(),
        }
    }

    fn price_condition(op: CompareOp, value: f64) -> Condition {
        Condition {
            condition_type: Some(ConditionKind::Price),
            operator: Some(op),
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn price_comparisons() {
        let snap = snapshot(150.0);
        assert!(evaluate(&price_condition(CompareOp::Gt, 149.0), &snap));
        assert!(!evaluate(&price_condition(CompareOp::Gt, 150.0), &snap));
        assert!(evaluate(&price_condition(CompareOp::Ge, 150.0), &snap));
        assert!(evaluate(&price_condition(CompareOp::Lt, 151.0), &snap));
        assert!(evaluate(&price_condition(CompareOp::Le, 150.0), &snap));
        assert!(evaluate(&price_condition(CompareOp::Eq, 150.0), &snap));
        assert!(!evaluate(&price_condition(CompareOp::Eq, 150.0001), &snap));
    }

    #[test]
    fn incomplete_condition_fails_closed() {
        let snap = snapshot(150.0);
        assert!(!evaluate(&Condition::default(), &snap));
        assert!(!evaluate(
            &Condition {
                condition_type: Some(ConditionKind::Price),
                operator: Some(CompareOp::Gt),
                value: None,
                ..Default::default()
            },
            &snap,
        ));
        assert!(!evaluate(
            &Condition {
                condition_type: Some(ConditionKind::Price),
                operator: None,
                value: Some(100.0),
                ..Default::default()
            },
            &snap,
        ));
    }

    #[test]
    fn technical_condition_reads_indicator_map() {
        let mut snap = snapshot(150.0);
        snap.indicators.insert("rsi_14".into(), 72.0);

        let condition = Condition {
            condition_type: Some(ConditionKind::Technical),
            operator: Some(CompareOp::Gt),
            value: Some(70.0),
            indicator: Some("rsi_14".into()),
            ..Default::default()
        };
        assert!(evaluate(&condition, &snap));
    }

    #[test]
    fn technical_condition_without_indicator_name_fails_closed() {
        let mut snap = snapshot(150.0);
        snap.indicators.insert("rsi_14".into(), 72.0);

        let condition = Condition {
            condition_type: Some(ConditionKind::Technical),
            operator: Some(CompareOp::Gt),
            value: Some(70.0),
            indicator: None,
            ..Default::default()
        };
        assert!(!evaluate(&condition, &snap));
    }

    #[test]
    fn unknown_indicator_resolves_to_zero() {
        let snap = snapshot(150.0);
        let condition = Condition {
            condition_type: Some(ConditionKind::Technical),
            operator: Some(CompareOp::Lt),
            value: Some(10.0),
            indicator: Some("obv".into()),
            ..Default::default()
        };
        // 0 < 10 holds even though no value exists for the name
        assert!(evaluate(&condition, &snap));
    }

    #[test]
    fn fundamental_resolves_to_zero() {
        let snap = snapshot(150.0);
        let condition = Condition {
            condition_type: Some(ConditionKind::Fundamental),
            operator: Some(CompareOp::Ge),
            value: Some(0.0),
            ..Default::default()
        };
        assert!(evaluate(&condition, &snap));
    }

    #[test]
    fn market_open_true_only_within_opening_half_hour() {
        let mut snap = snapshot(150.0);
        let condition = Condition {
            condition_type: Some(ConditionKind::Time),
            operator: Some(CompareOp::Eq),
            value: Some(0.0),
            timeframe: Some(TIMEFRAME_MARKET_OPEN.into()),
            ..Default::default()
        };

        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        snap.timestamp = date.and_hms_opt(9, 30, 0).unwrap();
        assert!(evaluate(&condition, &snap));
        snap.timestamp = date.and_hms_opt(9, 45, 0).unwrap();
        assert!(evaluate(&condition, &snap));
        snap.timestamp = date.and_hms_opt(9, 29, 0).unwrap();
        assert!(!evaluate(&condition, &snap));
        snap.timestamp = date.and_hms_opt(10, 0, 0).unwrap();
        assert!(!evaluate(&condition, &snap));
        // daily bars are stamped at midnight, so backtests see false
        snap.timestamp = date.and_hms_opt(0, 0, 0).unwrap();
        assert!(!evaluate(&condition, &snap));
    }

    #[test]
    fn unknown_timeframe_is_false() {
        let snap = snapshot(150.0);
        let condition = Condition {
            condition_type: Some(ConditionKind::Time),
            operator: Some(CompareOp::Eq),
            value: Some(0.0),
            timeframe: Some("market_close".into()),
            ..Default::default()
        };
        assert!(!evaluate(&condition, &snap));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let snap = snapshot(150.0);
        let condition = price_condition(CompareOp::Gt, 100.0);
        assert_eq!(evaluate(&condition, &snap), evaluate(&condition, &snap));
    }

    #[test]
    fn condition_parses_authoring_document() {
        let json = r#"{
            "conditionType": "technical",
            "operator": ">=",
            "value": 65.5,
            "indicator": "rsi_14",
            "label": "Overbought?"
        }"#;
        let condition: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(condition.condition_type, Some(ConditionKind::Technical));
        assert_eq!(condition.operator, Some(CompareOp::Ge));
        assert_eq!(condition.value, Some(65.5));
        assert_eq!(condition.indicator.as_deref(), Some("rsi_14"));
        assert!(condition.is_complete());
    }
}
