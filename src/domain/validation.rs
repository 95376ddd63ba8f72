//! Structural checks run over a strategy graph before execution.
//!
//! Errors block a run; warnings are advisory and the backtest proceeds
//! regardless. The checks mirror what the editor surfaces while a strategy
//! is being drawn, so a graph that loads clean here looks clean there too.

use std::collections::HashSet;

use crate::domain::graph::{Graph, GraphIndex, NodeKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(graph: &Graph) -> ValidationReport {
    let mut report = ValidationReport::default();
    let index = GraphIndex::new(graph);

    if !graph.has_start_node() {
        report
            .errors
            .push("graph must have a start node".to_string());
    }

    for node in &graph.nodes {
        let incoming = index.incoming_count(graph, &node.id);
        let outgoing = index.outgoing_count(&node.id);

        match &node.kind {
            NodeKind::Start(_) => {
                if outgoing == 0 {
                    report
                        .warnings
                        .push(format!("start node {} has no outgoing edges", node.id));
                }
            }
            NodeKind::StockSelection(sel) => {
                if incoming == 0 {
                    report
                        .warnings
                        .push(format!("node {} is not connected to the graph", node.id));
                }
                if outgoing == 0 {
                    report
                        .warnings
                        .push(format!("node {} has no outgoing edges", node.id));
                }
                if !sel.is_complete() {
                    report.warnings.push(format!(
                        "stock selection node {} has no ticker configured",
                        node.id
                    ));
                }
            }
            NodeKind::Condition(cond) => {
                if incoming == 0 {
                    report
                        .warnings
                        .push(format!("node {} is not connected to the graph", node.id));
                }
                if outgoing == 0 {
                    report
                        .warnings
                        .push(format!("node {} has no outgoing edges", node.id));
                }
                if !cond.is_complete() {
                    report.warnings.push(format!(
                        "condition node {} is missing type, operator, or value",
                        node.id
                    ));
                }
            }
            NodeKind::OrderExecution(spec) => {
                // order nodes are terminal, no outgoing check
                if incoming == 0 {
                    report
                        .warnings
                        .push(format!("node {} is not connected to the graph", node.id));
                }
                if !spec.is_complete() {
                    report.warnings.push(format!(
                        "order node {} is missing side, order type, or quantity",
                        node.id
                    ));
                }
            }
        }
    }

    if has_cycle(graph, &index) {
        report.errors.push("graph contains a cycle".to_string());
    }

    report
}

/// Depth-first search from each start node, tracking the current path to
/// catch back edges.
fn has_cycle<'g>(graph: &'g Graph, index: &GraphIndex<'g>) -> bool {
    let mut visited = HashSet::new();
    let mut path = HashSet::new();
    graph
        .start_nodes()
        .any(|start| dfs(index, &start.id, &mut visited, &mut path))
}

fn dfs<'g>(
    index: &GraphIndex<'g>,
    id: &'g str,
    visited: &mut HashSet<&'g str>,
    path: &mut HashSet<&'g str>,
) -> bool {
    if path.contains(id) {
        return true;
    }
    if !visited.insert(id) {
        return false;
    }
    path.insert(id);
    for next in index.next_nodes(id) {
        if dfs(index, &next.id, visited, path) {
            return true;
        }
    }
    path.remove(id);
    false
}
