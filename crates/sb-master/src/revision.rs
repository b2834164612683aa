//! Revision command interpreter
//!
//! A [`RevisionSession`] holds one mastered file's parameters and its revision
//! budget. Applying a command is split in two:
//!
//! - [`RevisionSession::plan`] is pure. It checks the guards and computes the
//!   next parameters, chain and render request without touching the session.
//! - [`RevisionSession::commit`] records a plan once the render succeeded.
//!
//! Every render request is built from the ORIGINAL source, never from a
//! previously mastered output.

use crate::chain::FilterChainSpec;
use crate::genre::Genre;
use crate::params::{MasteringParameters, ParamField};
use crate::render::{OutputFormat, RenderRequest};
use crate::source::AudioSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Step applied by frequency boost/cut commands
pub const REVISION_STEP: f32 = 0.15;
/// Frequencies above this move brightness
pub const TREBLE_SPLIT_HZ: f32 = 5000.0;
/// Frequencies below this move bass
pub const BASS_SPLIT_HZ: f32 = 250.0;

/// Structured revision request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevisionCommand {
    /// Raise a frequency region
    FrequencyBoost {
        /// Target frequency (Hz)
        frequency_hz: f32,
        /// Requested amount (dB, informational)
        db: f32,
    },
    /// Lower a frequency region
    FrequencyCut {
        /// Target frequency (Hz)
        frequency_hz: f32,
        /// Requested amount (dB, informational)
        db: f32,
    },
    /// Set loudness push
    Volume {
        /// New value (0-1)
        value: f32,
    },
    /// Set brightness
    Brightness {
        /// New value (0-1)
        value: f32,
    },
    /// Set bass boost
    Bass {
        /// New value (0-1)
        value: f32,
    },
    /// Set compression
    Compression {
        /// New value (0-1)
        value: f32,
    },
    /// Not understood
    Unknown {
        /// Why the request could not be interpreted
        reason: String,
    },
}

impl RevisionCommand {
    /// Parameter a boost/cut at `frequency_hz` moves
    pub fn band_for(frequency_hz: f32) -> ParamField {
        if frequency_hz > TREBLE_SPLIT_HZ {
            ParamField::Brightness
        } else if frequency_hz < BASS_SPLIT_HZ {
            ParamField::BassBoost
        } else {
            ParamField::MidRange
        }
    }

    /// Apply to a parameter vector. `None` for `unknown`.
    pub fn apply_to(&self, params: &MasteringParameters) -> Option<MasteringParameters> {
        let next = match self {
            RevisionCommand::FrequencyBoost { frequency_hz, .. } => {
                params.nudged(Self::band_for(*frequency_hz), REVISION_STEP)
            }
            RevisionCommand::FrequencyCut { frequency_hz, .. } => {
                params.nudged(Self::band_for(*frequency_hz), -REVISION_STEP)
            }
            RevisionCommand::Volume { value } => params.with(ParamField::VolumeBoost, *value),
            RevisionCommand::Brightness { value } => params.with(ParamField::Brightness, *value),
            RevisionCommand::Bass { value } => params.with(ParamField::BassBoost, *value),
            RevisionCommand::Compression { value } => {
                params.with(ParamField::Compression, *value)
            }
            RevisionCommand::Unknown { .. } => return None,
        };
        Some(next)
    }

    /// Short human-readable label
    pub fn describe(&self) -> String {
        match self {
            RevisionCommand::FrequencyBoost { frequency_hz, db } => {
                format!("boost {db:.1} dB at {frequency_hz} Hz")
            }
            RevisionCommand::FrequencyCut { frequency_hz, db } => {
                format!("cut {db:.1} dB at {frequency_hz} Hz")
            }
            RevisionCommand::Volume { value } => format!("volume {value:.2}"),
            RevisionCommand::Brightness { value } => format!("brightness {value:.2}"),
            RevisionCommand::Bass { value } => format!("bass {value:.2}"),
            RevisionCommand::Compression { value } => format!("compression {value:.2}"),
            RevisionCommand::Unknown { reason } => format!("unknown ({reason})"),
        }
    }
}

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// No revisions
    #[default]
    Free,
    /// One revision per file
    Pro,
    /// Two revisions per file
    Unlimited,
}

impl Tier {
    /// Revisions allowed per mastered file
    pub fn revision_limit(&self) -> u32 {
        match self {
            Tier::Free => 0,
            Tier::Pro => 1,
            Tier::Unlimited => 2,
        }
    }
}

/// Why a revision was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RevisionRejected {
    /// Budget exhausted
    #[error("Revision limit reached ({used}/{limit})")]
    LimitReached {
        /// Revisions already applied
        used: u32,
        /// Tier limit
        limit: u32,
    },
    /// Command not understood
    #[error("Could not understand revision: {reason}")]
    UnknownCommand {
        /// Parser explanation
        reason: String,
    },
}

/// Result of planning a revision; nothing is recorded until committed
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionPlan {
    /// Parameters after the command
    pub params: MasteringParameters,
    /// Recompiled chain
    pub chain: FilterChainSpec,
    /// Render against the original source
    pub request: RenderRequest,
    /// `revisions_used` the plan was computed from
    pub base_revision: u32,
}

/// Per-file revision state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionSession {
    source: AudioSource,
    genre: Genre,
    params: MasteringParameters,
    revisions_used: u32,
    tier_limit: u32,
}

impl RevisionSession {
    /// Open a fresh session
    pub fn new(
        source: AudioSource,
        genre: Genre,
        params: MasteringParameters,
        tier_limit: u32,
    ) -> Self {
        Self::resume(source, genre, params, 0, tier_limit)
    }

    /// Restore a session with revisions already spent
    pub fn resume(
        source: AudioSource,
        genre: Genre,
        params: MasteringParameters,
        revisions_used: u32,
        tier_limit: u32,
    ) -> Self {
        assert!(
            revisions_used <= tier_limit,
            "revisions_used ({revisions_used}) exceeds tier_limit ({tier_limit})"
        );
        Self {
            source,
            genre,
            params: params.clamped(),
            revisions_used,
            tier_limit,
        }
    }

    /// Original upload
    pub fn source(&self) -> &AudioSource {
        &self.source
    }

    /// Genre the chain is compiled for
    pub fn genre(&self) -> Genre {
        self.genre
    }

    /// Current parameters
    pub fn params(&self) -> &MasteringParameters {
        &self.params
    }

    /// Revisions applied so far
    pub fn revisions_used(&self) -> u32 {
        self.revisions_used
    }

    /// Tier limit
    pub fn tier_limit(&self) -> u32 {
        self.tier_limit
    }

    /// Revisions left
    pub fn remaining(&self) -> u32 {
        self.tier_limit - self.revisions_used
    }

    /// Budget check alone (used before any parsing or rendering)
    pub fn check_budget(&self) -> Result<(), RevisionRejected> {
        if self.revisions_used >= self.tier_limit {
            return Err(RevisionRejected::LimitReached {
                used: self.revisions_used,
                limit: self.tier_limit,
            });
        }
        Ok(())
    }

    /// Chain for the current parameters
    pub fn current_chain(&self) -> FilterChainSpec {
        FilterChainSpec::compile(&self.params, self.genre)
    }

    /// Compute a revision without recording it
    pub fn plan(
        &self,
        command: &RevisionCommand,
        format: OutputFormat,
    ) -> Result<RevisionPlan, RevisionRejected> {
        self.check_budget()?;

        let params = command
            .apply_to(&self.params)
            .ok_or_else(|| RevisionRejected::UnknownCommand {
                reason: match command {
                    RevisionCommand::Unknown { reason } => reason.clone(),
                    _ => String::new(),
                },
            })?;

        let chain = FilterChainSpec::compile(&params, self.genre);
        let request = RenderRequest::new(self.source.clone(), chain.clone(), format);

        Ok(RevisionPlan {
            params,
            chain,
            request,
            base_revision: self.revisions_used,
        })
    }

    /// Record a planned revision
    pub fn commit(&mut self, plan: RevisionPlan) {
        assert_eq!(
            plan.base_revision, self.revisions_used,
            "stale revision plan"
        );
        self.params = plan.params;
        self.revisions_used += 1;
        assert!(self.revisions_used <= self.tier_limit);

        log::info!(
            "Revision {}/{} applied to '{}'",
            self.revisions_used,
            self.tier_limit,
            self.source.id
        );
    }

    /// Plan and commit in one step (no executor involved)
    pub fn apply(
        &mut self,
        command: &RevisionCommand,
        format: OutputFormat,
    ) -> Result<RevisionPlan, RevisionRejected> {
        let plan = self.plan(command, format)?;
        self.commit(plan.clone());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn session(limit: u32) -> RevisionSession {
        RevisionSession::new(
            AudioSource::new("f1", "/uploads/f1.mp3", 200.0),
            Genre::Pop,
            MasteringParameters::NEUTRAL,
            limit,
        )
    }

    #[test]
    fn test_band_routing() {
        assert_eq!(RevisionCommand::band_for(8000.0), ParamField::Brightness);
        assert_eq!(RevisionCommand::band_for(5000.0), ParamField::MidRange);
        assert_eq!(RevisionCommand::band_for(250.0), ParamField::MidRange);
        assert_eq!(RevisionCommand::band_for(100.0), ParamField::BassBoost);
    }

    #[test]
    fn test_boost_and_cut_step() {
        let p = MasteringParameters::NEUTRAL;
        let boost = RevisionCommand::FrequencyBoost {
            frequency_hz: 2000.0,
            db: 3.0,
        };
        assert_abs_diff_eq!(boost.apply_to(&p).unwrap().mid_range, 0.85, epsilon = 1e-6);

        let cut = RevisionCommand::FrequencyCut {
            frequency_hz: 60.0,
            db: 3.0,
        };
        assert_abs_diff_eq!(cut.apply_to(&p).unwrap().bass_boost, 0.45, epsilon = 1e-6);
    }

    #[test]
    fn test_set_commands_clamp() {
        let p = MasteringParameters::NEUTRAL;
        let next = RevisionCommand::Volume { value: 1.4 }.apply_to(&p).unwrap();
        assert_eq!(next.volume_boost, 1.0);
        let next = RevisionCommand::Compression { value: 0.2 }.apply_to(&p).unwrap();
        assert_eq!(next.compression, 0.2);
    }

    #[test]
    fn test_quota_with_one_revision() {
        let mut s = session(Tier::Pro.revision_limit());
        let cmd = RevisionCommand::Bass { value: 0.9 };

        s.apply(&cmd, OutputFormat::default()).unwrap();
        assert_eq!(s.revisions_used(), 1);
        let after_first = *s.params();

        let err = s
            .apply(&RevisionCommand::Bass { value: 0.1 }, OutputFormat::default())
            .unwrap_err();
        assert_eq!(err, RevisionRejected::LimitReached { used: 1, limit: 1 });
        assert_eq!(s.revisions_used(), 1);
        assert_eq!(*s.params(), after_first);
    }

    #[test]
    fn test_free_tier_rejects() {
        let s = session(Tier::Free.revision_limit());
        assert!(matches!(
            s.plan(&RevisionCommand::Volume { value: 0.5 }, OutputFormat::Wav),
            Err(RevisionRejected::LimitReached { used: 0, limit: 0 })
        ));
    }

    #[test]
    fn test_unknown_rejected_without_mutation() {
        let mut s = session(2);
        let cmd = RevisionCommand::Unknown {
            reason: "no idea".into(),
        };
        let err = s.apply(&cmd, OutputFormat::default()).unwrap_err();
        assert_eq!(
            err,
            RevisionRejected::UnknownCommand {
                reason: "no idea".into()
            }
        );
        assert_eq!(s.revisions_used(), 0);
        assert_eq!(*s.params(), MasteringParameters::NEUTRAL);
    }

    #[test]
    fn test_plan_renders_from_original_source() {
        let mut s = session(2);
        let first = s
            .apply(&RevisionCommand::Brightness { value: 0.9 }, OutputFormat::Wav)
            .unwrap();
        let second = s
            .plan(&RevisionCommand::Bass { value: 0.9 }, OutputFormat::Wav)
            .unwrap();

        assert_eq!(first.request.source.uri, "/uploads/f1.mp3");
        assert_eq!(second.request.source.uri, "/uploads/f1.mp3");
        assert_eq!(second.base_revision, 1);
        // Plan alone records nothing
        assert_eq!(s.revisions_used(), 1);
        assert_eq!(second.chain, FilterChainSpec::compile(&second.params, Genre::Pop));
    }

    #[test]
    #[should_panic(expected = "stale revision plan")]
    fn test_stale_plan_panics() {
        let mut s = session(2);
        let plan = s
            .plan(&RevisionCommand::Volume { value: 0.5 }, OutputFormat::Wav)
            .unwrap();
        s.commit(plan.clone());
        s.commit(plan);
    }

    #[test]
    #[should_panic]
    fn test_resume_over_limit_panics() {
        RevisionSession::resume(
            AudioSource::new("f", "/f", 1.0),
            Genre::Pop,
            MasteringParameters::NEUTRAL,
            3,
            2,
        );
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: RevisionCommand =
            serde_json::from_str(r#"{"type":"frequency_boost","frequency_hz":2000,"db":3}"#)
                .unwrap();
        assert_eq!(
            cmd,
            RevisionCommand::FrequencyBoost {
                frequency_hz: 2000.0,
                db: 3.0
            }
        );
    }
}
