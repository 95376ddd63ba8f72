//! Crate error type and its mapping to process exit codes.

use std::process::ExitCode;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowtraderError {
    #[error("failed to parse config file '{file}': {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config value [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to parse graph file '{file}': {reason}")]
    GraphParse { file: String, reason: String },

    #[error("invalid graph: {reason}")]
    GraphInvalid { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data available for ticker '{ticker}'")]
    NoData { ticker: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&FlowtraderError> for ExitCode {
    fn from(err: &FlowtraderError) -> Self {
        match err {
            FlowtraderError::Io(_) => ExitCode::from(1),
            FlowtraderError::ConfigParse { .. }
            | FlowtraderError::ConfigMissing { .. }
            | FlowtraderError::ConfigInvalid { .. } => ExitCode::from(2),
            FlowtraderError::Data { .. } => ExitCode::from(3),
            FlowtraderError::GraphParse { .. } | FlowtraderError::GraphInvalid { .. } => {
                ExitCode::from(4)
            }
            FlowtraderError::NoData { .. } => ExitCode::from(5),
        }
    }
}
