//! The strategy graph as saved by the visual editor, plus an adjacency
//! index used during execution.
//!
//! Documents follow the editor's node/edge shape: each node carries a
//! `type` discriminator and a `data` payload, and condition nodes hang
//! their branches off the `outTrue`/`outFalse` source handles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::condition::Condition;
use crate::domain::order::OrderSpec;

/// Source handle that carries the true branch out of a condition node.
pub const HANDLE_TRUE: &str = "outTrue";
/// Source handle that carries the false branch out of a condition node.
pub const HANDLE_FALSE: &str = "outFalse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Stock,
    Crypto,
    Forex,
}

/// Stock selection node payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockSelection {
    pub ticker: Option<String>,
    pub market_type: Option<MarketType>,
    pub exchange: Option<String>,
}

impl StockSelection {
    pub fn is_complete(&self) -> bool {
        matches!(self.ticker.as_deref(), Some(t) if !t.is_empty())
    }
}

/// Start node payload. The editor stores a label here; nothing in it
/// affects execution, but a unit variant would reject the `data` object,
/// so an empty struct stands in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StartMarker {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NodeKind {
    #[serde(rename = "start")]
    Start(StartMarker),
    #[serde(rename = "stockSelection")]
    StockSelection(StockSelection),
    #[serde(rename = "condition")]
    Condition(Condition),
    #[serde(rename = "orderExecution")]
    OrderExecution(OrderSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Default for Edge {
    fn default() -> Self {
        Edge {
            source: String::new(),
            target: String::new(),
            source_handle: None,
            target_handle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn has_start_node(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| matches!(n.kind, NodeKind::Start(_)))
    }

    pub fn start_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Start(_)))
    }

    pub fn stock_nodes(&self) -> impl Iterator<Item = (&Node, &StockSelection)> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::StockSelection(sel) => Some((n, sel)),
            _ => None,
        })
    }

    /// Distinct non-empty tickers across stock selection nodes, in the
    /// order they first appear.
    pub fn tickers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for (_, sel) in self.stock_nodes() {
            if let Some(ticker) = sel.ticker.as_deref() {
                if !ticker.is_empty() && !seen.iter().any(|t| t == ticker) {
                    seen.push(ticker.to_owned());
                }
            }
        }
        seen
    }
}

/// Adjacency index over a graph, built once per run so traversal does not
/// rescan the edge list at every hop.
pub struct GraphIndex<'g> {
    nodes: HashMap<&'g str, &'g Node>,
    outgoing: HashMap<&'g str, Vec<&'g Edge>>,
}

impl<'g> GraphIndex<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut nodes = HashMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            nodes.insert(node.id.as_str(), node);
        }
        let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
        for edge in &graph.edges {
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
        }
        GraphIndex { nodes, outgoing }
    }

    pub fn node(&self, id: &str) -> Option<&'g Node> {
        self.nodes.get(id).copied()
    }

    /// All downstream nodes, ignoring branch handles. Edges pointing at
    /// ids with no node are dropped.
    pub fn next_nodes(&self, id: &str) -> Vec<&'g Node> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|edge| self.node(&edge.target))
            .collect()
    }

    /// Downstream nodes along one branch of a condition node. Only edges
    /// tagged with the matching handle are followed; an untagged edge out
    /// of a condition belongs to neither branch.
    pub fn next_nodes_for_branch(&self, id: &str, branch: bool) -> Vec<&'g Node> {
        let wanted = if branch { HANDLE_TRUE } else { HANDLE_FALSE };
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .filter(|edge| edge.source_handle.as_deref() == Some(wanted))
            .filter_map(|edge| self.node(&edge.target))
            .collect()
    }

    pub fn incoming_count(&self, graph: &Graph, id: &str) -> usize {
        graph.edges.iter().filter(|e| e.target == id).count()
    }

    pub fn outgoing_count(&self, id: &str) -> usize {
        self.outgoing.get(id).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::{CompareOp, ConditionKind};
    use crate::domain::order::{Quantity, Side};

    const DOC: &str = r#"{
        "nodes": [
            {"id": "n1", "type": "start", "data": {"label": "Start"}},
            {"id": "n2", "type": "stockSelection",
             "data": {"ticker": "AAPL", "marketType": "stock", "exchange": "NASDAQ"}},
            {"id": "n3", "type": "condition",
             "data": {"conditionType": "price", "operator": ">", "value": 150}},
            {"id": "n4", "type": "orderExecution",
             "data": {"side": "buy", "orderType": "market", "quantity": 10}},
            {"id": "n5", "type": "orderExecution",
             "data": {"side": "sell", "orderType": "market", "quantity": "all"}}
        ],
        "edges": [
            {"source": "n1", "target": "n2"},
            {"source": "n2", "target": "n3"},
            {"source": "n3", "target": "n4", "sourceHandle": "outTrue"},
            {"source": "n3", "target": "n5", "sourceHandle": "outFalse"}
        ]
    }"#;

    #[test]
    fn parses_editor_document() {
        let graph: Graph = serde_json::from_str(DOC).unwrap();
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 4);
        assert!(graph.has_start_node());
        assert_eq!(graph.tickers(), vec!["AAPL".to_string()]);

        match &graph.nodes[2].kind {
            NodeKind::Condition(c) => {
                assert_eq!(c.condition_type, Some(ConditionKind::Price));
                assert_eq!(c.operator, Some(CompareOp::Gt));
                assert_eq!(c.value, Some(150.0));
            }
            other => panic!("expected condition node, got {other:?}"),
        }
        match &graph.nodes[3].kind {
            NodeKind::OrderExecution(spec) => {
                assert_eq!(spec.side, Some(Side::Buy));
                assert_eq!(spec.quantity, Some(Quantity::Shares(10)));
            }
            other => panic!("expected order node, got {other:?}"),
        }
        match &graph.nodes[4].kind {
            NodeKind::OrderExecution(spec) => {
                assert_eq!(spec.quantity, Some(Quantity::All));
            }
            other => panic!("expected order node, got {other:?}"),
        }
    }

    #[test]
    fn index_follows_branch_handles() {
        let graph: Graph = serde_json::from_str(DOC).unwrap();
        let index = GraphIndex::new(&graph);

        let next = index.next_nodes("n1");
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, "n2");

        let on_true = index.next_nodes_for_branch("n3", true);
        assert_eq!(on_true.len(), 1);
        assert_eq!(on_true[0].id, "n4");

        let on_false = index.next_nodes_for_branch("n3", false);
        assert_eq!(on_false.len(), 1);
        assert_eq!(on_false[0].id, "n5");
    }

    #[test]
    fn untagged_edge_belongs_to_neither_branch() {
        let mut graph: Graph = serde_json::from_str(DOC).unwrap();
        graph.edges[2].source_handle = None;
        let index = GraphIndex::new(&graph);
        assert!(index.next_nodes_for_branch("n3", true).is_empty());
        let on_false = index.next_nodes_for_branch("n3", false);
        assert_eq!(on_false.len(), 1);
        assert_eq!(on_false[0].id, "n5");
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let mut graph: Graph = serde_json::from_str(DOC).unwrap();
        graph.edges.push(Edge {
            source: "n2".into(),
            target: "ghost".into(),
            ..Default::default()
        });
        let index = GraphIndex::new(&graph);
        let next = index.next_nodes("n2");
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, "n3");
    }

    #[test]
    fn tickers_deduplicate_preserving_order() {
        let graph = Graph {
            nodes: vec![
                Node {
                    id: "s1".into(),
                    kind: NodeKind::StockSelection(StockSelection {
                        ticker: Some("MSFT".into()),
                        ..Default::default()
                    }),
                },
                Node {
                    id: "s2".into(),
                    kind: NodeKind::StockSelection(StockSelection {
                        ticker: Some("AAPL".into()),
                        ..Default::default()
                    }),
                },
                Node {
                    id: "s3".into(),
                    kind: NodeKind::StockSelection(StockSelection {
                        ticker: Some("MSFT".into()),
                        ..Default::default()
                    }),
                },
                Node {
                    id: "s4".into(),
                    kind: NodeKind::StockSelection(StockSelection {
                        ticker: Some(String::new()),
                        ..Default::default()
                    }),
                },
            ],
            edges: vec![],
        };
        assert_eq!(
            graph.tickers(),
            vec!["MSFT".to_string(), "AAPL".to_string()]
        );
    }
}
