//! Fake collaborators shared by the session tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use sb_master::{AudioDescriptor, MixReview, RenderRequest, RevisionCommand};
use sb_session::{
    CollaboratorError, CommandParser, DspExecutor, GenreClassifier, MixReviewer, RenderOutput,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Parser answering with a fixed command after an optional delay
pub struct FakeParser {
    pub reply: Result<RevisionCommand, CollaboratorError>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeParser {
    pub fn returning(command: RevisionCommand) -> Self {
        Self {
            reply: Ok(command),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            reply: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(command: RevisionCommand, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::returning(command)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandParser for FakeParser {
    async fn parse(&self, _text: &str) -> Result<RevisionCommand, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

/// Executor recording every request
pub struct FakeExecutor {
    pub fail_with: Option<CollaboratorError>,
    pub delay: Duration,
    pub requests: Mutex<Vec<RenderRequest>>,
}

impl FakeExecutor {
    pub fn ok() -> Self {
        Self {
            fail_with: None,
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::ok()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl DspExecutor for FakeExecutor {
    async fn execute(&self, request: &RenderRequest) -> Result<RenderOutput, CollaboratorError> {
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(RenderOutput {
                location: format!("/rendered/{}.{}", request.source.id, request.format.extension()),
                elapsed_secs: Some(0.1),
            }),
        }
    }
}

/// Classifier with a canned answer
pub struct FakeClassifier {
    pub reply: Result<String, CollaboratorError>,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn returning(label: &str) -> Self {
        Self {
            reply: Ok(label.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            reply: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenreClassifier for FakeClassifier {
    async fn classify(&self, _text: &str) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}

/// Reviewer with a canned answer
pub struct FakeReviewer {
    pub reply: Result<MixReview, CollaboratorError>,
    pub delay: Duration,
}

#[async_trait]
impl MixReviewer for FakeReviewer {
    async fn review(&self, _descriptor: &AudioDescriptor) -> Result<MixReview, CollaboratorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone()
    }
}
