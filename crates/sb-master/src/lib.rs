//! SonicBoost mastering decision engine
//!
//! Decides what the DSP executor should do with an uploaded track; it never
//! touches audio samples itself.
//!
//! ## Features
//! - **Genre Profiles**: Baseline parameter vectors, traits and tempo ranges per genre
//! - **Descriptor Estimation**: Keyword genre detection and multi-tier tempo estimation
//! - **Adaptive Parameters**: Ordered rules over the genre baseline
//! - **Reference Matching**: Blend toward a reference master's character
//! - **Manual Adjustments**: Bounded EQ deltas and absolute pitch
//! - **Revisions**: Tier-gated commands replayed from the original source
//! - **Filter Chains**: Deterministic, ordered stage lists with FFmpeg rendering
//! - **Mix Review**: Heuristic score and feedback
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sb_master::{AudioSource, FilterChainSpec, HeuristicAnalyzer, SignalAnalyzer};
//!
//! let analyzer = HeuristicAnalyzer::default();
//! let source = AudioSource::new("t1", "/uploads/t1.wav", 212.0).with_hint("trap_beat_92bpm.wav");
//!
//! let descriptor = analyzer.estimate(&source);
//! let params = sb_master::calculate_parameters(&descriptor);
//! let chain = FilterChainSpec::compile(&params, descriptor.genre);
//! println!("{}", chain.to_ffmpeg_filter());
//! ```

#![warn(missing_docs)]

pub mod adjust;
pub mod analysis;
pub mod calculator;
pub mod chain;
pub mod config;
pub mod genre;
pub mod params;
pub mod reference;
pub mod render;
pub mod review;
pub mod revision;
pub mod source;
pub mod tempo;

mod error;

pub use adjust::{UserAdjustment, apply_adjustment};
pub use analysis::{AudioDescriptor, HeuristicAnalyzer, SignalAnalyzer};
pub use calculator::calculate_parameters;
pub use chain::{FilterChainSpec, FilterStage};
pub use config::{EngineConfig, TempoConfig};
pub use error::{MasterError, MasterResult};
pub use genre::{Genre, GenreProfile, GenreTraits};
pub use params::{MasteringParameters, ParamField};
pub use reference::{ReferenceComparison, ReferenceProfile, compare_to_reference, match_reference};
pub use render::{OutputFormat, RenderRequest};
pub use review::{MixReview, analysis_summary, mixing_tips, pre_mastering_tips, review_mix};
pub use revision::{RevisionCommand, RevisionPlan, RevisionRejected, RevisionSession, Tier};
pub use source::AudioSource;
pub use tempo::{TempoEstimate, TempoEstimator, TempoMethod, TempoRange};
