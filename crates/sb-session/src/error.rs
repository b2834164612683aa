//! Error types for sessions and collaborators

use sb_master::{MasterError, RevisionRejected};
use thiserror::Error;

/// Failure of an external collaborator call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// No answer within the deadline
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Service unreachable or refused the request
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Answer could not be used
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Session setup error
#[derive(Error, Debug)]
pub enum SessionError {
    /// Engine-level failure
    #[error(transparent)]
    Master(#[from] MasterError),

    /// Invalid session configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encode/decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a refused or failed revision
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevisionError {
    /// No open session for this file
    #[error("No revision session for file '{0}'")]
    UnknownFile(String),

    /// Guard refused the revision
    #[error(transparent)]
    Rejected(#[from] RevisionRejected),

    /// Render failed; the session is unchanged
    #[error("Render failed: {diagnostic}")]
    ExecutorFailed {
        /// Executor diagnostic
        diagnostic: String,
    },
}

/// Result type for session setup
pub type SessionResult<T> = Result<T, SessionError>;
