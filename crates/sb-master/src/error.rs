//! Error types for the mastering engine

use thiserror::Error;

/// Mastering error type
#[derive(Error, Debug)]
pub enum MasterError {
    /// Label outside the ten known genres
    #[error("Unknown genre label: {0}")]
    UnknownGenre(String),

    /// Filter chain failed order/completeness validation
    #[error("Invalid filter chain: {0}")]
    InvalidChain(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encode/decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for mastering operations
pub type MasterResult<T> = Result<T, MasterError>;
