//! Configuration types for the mastering engine

use crate::error::{MasterError, MasterResult};
use serde::{Deserialize, Serialize};

/// Upper bound on bar-alignment candidates
pub const MAX_TEMPO_CANDIDATES: usize = 5;

/// Tempo estimator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Beats per musical bar used for alignment
    pub beats_per_bar: u32,

    /// Bar-alignment candidates kept per sample (1-5)
    pub max_candidates: usize,

    /// Duration samples taken; the median pick wins
    pub samples: usize,

    /// Seconds trimmed from the duration per extra sample
    pub sample_trim_secs: f32,

    /// Shortest duration that bar alignment is attempted on
    pub min_alignment_secs: f32,

    /// Fractional widening of a genre range when validating hint tokens
    pub hint_tolerance: f32,

    /// Bitrates below this weight the genre prior over alignment
    pub low_bitrate_kbps: u32,

    /// Validation range for hint tokens when genre is unknown
    pub wide_min_bpm: u32,

    /// Validation range for hint tokens when genre is unknown
    pub wide_max_bpm: u32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            beats_per_bar: 4,
            max_candidates: MAX_TEMPO_CANDIDATES,
            samples: 3,
            sample_trim_secs: 2.0,
            min_alignment_secs: 20.0,
            hint_tolerance: 0.25,
            low_bitrate_kbps: 128,
            wide_min_bpm: 40,
            wide_max_bpm: 200,
        }
    }
}

impl TempoConfig {
    /// Check value ranges
    pub fn validate(&self) -> MasterResult<()> {
        if self.beats_per_bar == 0 {
            return Err(MasterError::InvalidConfig("beats_per_bar must be > 0".into()));
        }
        if !(1..=MAX_TEMPO_CANDIDATES).contains(&self.max_candidates) {
            return Err(MasterError::InvalidConfig(format!(
                "max_candidates must be within 1..={}",
                MAX_TEMPO_CANDIDATES
            )));
        }
        if self.samples == 0 {
            return Err(MasterError::InvalidConfig("samples must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.hint_tolerance) {
            return Err(MasterError::InvalidConfig(
                "hint_tolerance must be within 0..=1".into(),
            ));
        }
        if self.sample_trim_secs < 0.0 || self.min_alignment_secs < 0.0 {
            return Err(MasterError::InvalidConfig(
                "durations must be non-negative".into(),
            ));
        }
        if self.wide_min_bpm == 0 || self.wide_min_bpm >= self.wide_max_bpm {
            return Err(MasterError::InvalidConfig(
                "wide BPM range must be non-empty and above zero".into(),
            ));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tempo estimator tuning
    pub tempo: TempoConfig,

    /// Seed for reference-mode placeholder metrics (None = entropy)
    pub reference_seed: Option<u64>,
}

impl EngineConfig {
    /// Set tempo tuning
    pub fn with_tempo(mut self, tempo: TempoConfig) -> Self {
        self.tempo = tempo;
        self
    }

    /// Fix the reference-mode seed (reproducible placeholder metrics)
    pub fn with_reference_seed(mut self, seed: u64) -> Self {
        self.reference_seed = Some(seed);
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> MasterResult<()> {
        self.tempo.validate()
    }

    /// Load and validate from JSON
    pub fn from_json(json: &str) -> MasterResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to pretty JSON
    pub fn to_json(&self) -> MasterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
