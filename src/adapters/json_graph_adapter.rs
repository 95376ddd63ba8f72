//! Loads strategy graphs from the JSON documents the editor exports.

use std::fs;
use std::path::Path;

use crate::domain::error::FlowtraderError;
use crate::domain::graph::Graph;

pub fn load_graph(path: &Path) -> Result<Graph, FlowtraderError> {
    let raw = fs::read_to_string(path).map_err(|e| FlowtraderError::GraphParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| FlowtraderError::GraphParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}
