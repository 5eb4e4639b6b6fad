//! Error types for the softnet library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// A vector's width does not match the network topology.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// Hyperparameters that would make the training loop ill-defined.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed model text file. `line` is 1-based.
    #[error("model file line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("backward worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

impl NetError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, actual: usize) -> NetError {
        NetError::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}
