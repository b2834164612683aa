//! Per-file revision registry
//!
//! One [`RevisionSession`] per mastered file, each behind its own async mutex.
//! A revision holds that mutex from the budget check through the render to the
//! commit, so concurrent requests for one file serialize: the loser sees the
//! updated count, and at most one render per file is in flight.

use crate::collab::{CommandParser, DspExecutor, RenderOutput, with_deadline};
use crate::config::SessionConfig;
use crate::error::RevisionError;
use parking_lot::Mutex;
use sb_master::{FilterChainSpec, MasteringParameters, RevisionCommand, RevisionSession};
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

type SessionHandle = Arc<AsyncMutex<RevisionSession>>;

/// Applied revision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionOutcome {
    /// Command that was applied
    pub command: RevisionCommand,
    /// Parameters after the revision
    pub params: MasteringParameters,
    /// Chain that was rendered
    pub chain: FilterChainSpec,
    /// Executor result
    pub output: RenderOutput,
    /// Revisions spent so far
    pub revisions_used: u32,
    /// Revisions left
    pub remaining: u32,
}

/// Registry of open revision sessions
pub struct RevisionRegistry {
    sessions: Mutex<HashMap<String, SessionHandle>>,
    parser: Arc<dyn CommandParser>,
    executor: Arc<dyn DspExecutor>,
    config: SessionConfig,
}

impl RevisionRegistry {
    /// Create registry
    pub fn new(
        config: SessionConfig,
        parser: Arc<dyn CommandParser>,
        executor: Arc<dyn DspExecutor>,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            parser,
            executor,
            config,
        }
    }

    /// Register a session under its source id.
    ///
    /// Returns false and keeps the existing session if the id is already
    /// open; `close` it first to start over.
    pub fn open(&self, session: RevisionSession) -> bool {
        let id = session.source().id.clone();
        match self.sessions.lock().entry(id) {
            Entry::Occupied(entry) => {
                log::warn!("Revision session for '{}' is already open", entry.key());
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(AsyncMutex::new(session)));
                true
            }
        }
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// No open sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Copy of a session's current state
    pub async fn snapshot(&self, file_id: &str) -> Option<RevisionSession> {
        let handle = self.handle(file_id).ok()?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Drop a session; true if one was open
    pub fn close(&self, file_id: &str) -> bool {
        self.sessions.lock().remove(file_id).is_some()
    }

    fn handle(&self, file_id: &str) -> Result<SessionHandle, RevisionError> {
        self.sessions
            .lock()
            .get(file_id)
            .cloned()
            .ok_or_else(|| RevisionError::UnknownFile(file_id.to_string()))
    }

    /// Parse free text and apply it.
    ///
    /// The budget is checked before the parser is called; a parser failure
    /// or timeout reads as an `unknown` command.
    pub async fn request_revision(
        &self,
        file_id: &str,
        text: &str,
    ) -> Result<RevisionOutcome, RevisionError> {
        let handle = self.handle(file_id)?;
        let mut session = handle.lock().await;
        session.check_budget()?;

        let command = match with_deadline(self.config.parser_timeout(), self.parser.parse(text)).await
        {
            Ok(command) => command,
            Err(e) => {
                log::warn!("Command parser failed for '{}': {}", file_id, e);
                RevisionCommand::Unknown {
                    reason: format!("Command parser unavailable ({})", e),
                }
            }
        };

        self.execute(&mut session, command).await
    }

    /// Apply an already-structured command
    pub async fn apply_command(
        &self,
        file_id: &str,
        command: RevisionCommand,
    ) -> Result<RevisionOutcome, RevisionError> {
        let handle = self.handle(file_id)?;
        let mut session = handle.lock().await;
        self.execute(&mut session, command).await
    }

    async fn execute(
        &self,
        session: &mut RevisionSession,
        command: RevisionCommand,
    ) -> Result<RevisionOutcome, RevisionError> {
        let plan = session.plan(&command, self.config.output_format)?;

        log::debug!(
            "Rendering '{}' from original source for {}",
            session.source().id,
            command.describe()
        );

        let output = with_deadline(
            self.config.executor_timeout(),
            self.executor.execute(&plan.request),
        )
        .await
        .map_err(|e| {
            log::warn!("Render failed for '{}': {}", session.source().id, e);
            RevisionError::ExecutorFailed {
                diagnostic: e.to_string(),
            }
        })?;

        let params = plan.params;
        let chain = plan.chain.clone();
        session.commit(plan);

        Ok(RevisionOutcome {
            command,
            params,
            chain,
            output,
            revisions_used: session.revisions_used(),
            remaining: session.remaining(),
        })
    }
}
