//! External collaborator boundaries
//!
//! Every call goes through [`with_deadline`]; callers map failures to the
//! deterministic fallbacks instead of propagating them.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use sb_master::{AudioDescriptor, MixReview, RenderRequest, RevisionCommand};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Text classifier restricted to the ten genre labels
#[async_trait]
pub trait GenreClassifier: Send + Sync {
    /// Raw label for `text`; validated by the caller
    async fn classify(&self, text: &str) -> Result<String, CollaboratorError>;
}

/// Natural-language revision parser
#[async_trait]
pub trait CommandParser: Send + Sync {
    /// Structured command for `text`
    async fn parse(&self, text: &str) -> Result<RevisionCommand, CollaboratorError>;
}

/// Audio executor (FFmpeg or equivalent)
#[async_trait]
pub trait DspExecutor: Send + Sync {
    /// Render the request
    async fn execute(&self, request: &RenderRequest) -> Result<RenderOutput, CollaboratorError>;
}

/// Optional reviewer that can replace the heuristic scorer
#[async_trait]
pub trait MixReviewer: Send + Sync {
    /// Review a mix
    async fn review(&self, descriptor: &AudioDescriptor) -> Result<MixReview, CollaboratorError>;
}

/// Successful render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Where the rendered file was written
    pub location: String,
    /// Wall-clock render time, if reported
    #[serde(default)]
    pub elapsed_secs: Option<f32>,
}

/// Run a collaborator call with a deadline
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(deadline.as_millis() as u64)),
    }
}
