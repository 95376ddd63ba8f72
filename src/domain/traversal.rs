//! One execution pass over the strategy graph.
//!
//! A pass starts downstream of a stock selection node and walks the graph
//! breadth-first. Condition nodes fork the frontier along their branch
//! handles, order nodes fill against the ledger and terminate their path,
//! and every other node passes through. A per-pass visited set stops
//! revisits, so a cyclic graph that slips past validation cannot loop.

use std::collections::{HashSet, VecDeque};

use chrono::NaiveDate;

use crate::domain::condition;
use crate::domain::graph::{GraphIndex, Node, NodeKind};
use crate::domain::ledger::Ledger;
use crate::domain::ohlcv::MarketSnapshot;

pub fn execute_pass<'g>(
    index: &GraphIndex<'g>,
    origin_id: &'g str,
    snapshot: &MarketSnapshot,
    date: NaiveDate,
    ledger: &mut Ledger,
    commission: f64,
) {
    let mut visited: HashSet<&'g str> = HashSet::new();
    visited.insert(origin_id);

    let mut frontier: VecDeque<&'g Node> = index.next_nodes(origin_id).into();
    while let Some(node) = frontier.pop_front() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        match &node.kind {
            NodeKind::Condition(cond) => {
                let outcome = condition::evaluate(cond, snapshot);
                frontier.extend(index.next_nodes_for_branch(&node.id, outcome));
            }
            NodeKind::OrderExecution(spec) => {
                // terminal; an incomplete spec is skipped, not an error
                let (Some(side), Some(_), Some(quantity)) =
                    (spec.side, spec.order_type, spec.quantity)
                else {
                    continue;
                };
                ledger.apply_order(date, &snapshot.ticker, side, quantity, snapshot.price, commission);
            }
            NodeKind::Start(_) | NodeKind::StockSelection(_) => {
                frontier.extend(index.next_nodes(&node.id));
            }
        }
    }
}
