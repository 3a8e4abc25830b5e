//! Error types for the lab.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("unknown heuristic: {0}")]
    UnknownHeuristic(String),

    #[error("unknown simulation: {0}")]
    UnknownSimulation(String),

    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("canvas error: {0}")]
    Canvas(String),
}

pub type Result<T> = std::result::Result<T, LabError>;
