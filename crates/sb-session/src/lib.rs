//! SonicBoost mastering sessions
//!
//! Async shell around the `sb-master` decision engine:
//!
//! ## Features
//! - **Collaborators**: Genre classifier, command parser, DSP executor and mix reviewer traits
//! - **Deadlines**: Every collaborator call is time-boxed and falls back to a heuristic
//! - **Pipeline**: Analyze, master, reference-match, adjust and review one upload
//! - **Revisions**: Per-file registry with atomic budget checks and replay from source
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sb_session::{MasteringPipeline, RevisionRegistry, SessionConfig};
//!
//! let pipeline = MasteringPipeline::new(SessionConfig::default())?;
//! let descriptor = pipeline.analyze(&source).await;
//! let outcome = pipeline.master(&descriptor);
//!
//! let registry = RevisionRegistry::new(config, parser, executor);
//! registry.open(RevisionSession::new(source, descriptor.genre, outcome.params, Tier::Pro.revision_limit()));
//! let revised = registry.request_revision(&file_id, "boost 2khz by 3db").await?;
//! ```

#![warn(missing_docs)]

pub mod collab;
pub mod command;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod registry;

mod error;

pub use collab::{
    CommandParser, DspExecutor, GenreClassifier, MixReviewer, RenderOutput, with_deadline,
};
pub use command::decode_parser_reply;
pub use config::SessionConfig;
pub use error::{CollaboratorError, RevisionError, SessionError, SessionResult};
pub use model::{ModelCommandParser, ModelGenreClassifier, TextModel};
pub use pipeline::{MasteringOutcome, MasteringPipeline};
pub use registry::{RevisionOutcome, RevisionRegistry};
