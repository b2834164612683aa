//! Filter chain compilation
//!
//! Turns a parameter vector and genre into the ordered stage list handed to
//! the external DSP executor. Stage order is fixed:
//!
//! 1. High-pass (always)
//! 2. Low-shelf, bell and high-shelf EQ (gated)
//! 3. De-mud cut (gated)
//! 4. Harmonic exciter (gated)
//! 5. Compressor, loudness normalization and limiter (always)

use crate::error::{MasterError, MasterResult};
use crate::genre::Genre;
use crate::params::MasteringParameters;
use serde::{Deserialize, Serialize};

/// Single DSP stage with concrete coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FilterStage {
    /// Sub-sonic rumble removal
    HighPass {
        /// Cutoff (Hz)
        cutoff_hz: f32,
    },
    /// Low-shelf EQ
    LowShelf {
        /// Corner frequency (Hz)
        freq_hz: f32,
        /// Gain (dB)
        gain_db: f32,
    },
    /// Mid-range bell EQ
    Bell {
        /// Center frequency (Hz)
        freq_hz: f32,
        /// Gain (dB)
        gain_db: f32,
        /// Quality factor
        q: f32,
    },
    /// High-shelf EQ
    HighShelf {
        /// Corner frequency (Hz)
        freq_hz: f32,
        /// Gain (dB)
        gain_db: f32,
    },
    /// Low-mid cut
    DeMud {
        /// Center frequency (Hz)
        freq_hz: f32,
        /// Gain (dB)
        gain_db: f32,
        /// Quality factor
        q: f32,
    },
    /// Harmonic exciter/saturation
    Exciter {
        /// Input level (linear)
        level_in: f32,
        /// Output level (linear)
        level_out: f32,
        /// Harmonic amount
        amount: f32,
        /// Drive
        drive: f32,
    },
    /// Bus compressor
    Compressor {
        /// Threshold (dBFS)
        threshold_db: f32,
        /// Ratio (N:1)
        ratio: f32,
        /// Attack (ms)
        attack_ms: f32,
        /// Release (ms)
        release_ms: f32,
        /// Makeup gain (dB)
        makeup_db: f32,
    },
    /// Loudness normalization
    LoudnessNormalize {
        /// Integrated target (LUFS)
        target_lufs: f32,
        /// Loudness range target (LU)
        loudness_range: f32,
        /// True-peak ceiling (dBTP)
        true_peak_dbtp: f32,
    },
    /// Final safety limiter
    Limiter {
        /// Ceiling (linear, just under full scale)
        ceiling: f32,
        /// Attack (ms)
        attack_ms: f32,
        /// Release (ms)
        release_ms: f32,
    },
}

impl FilterStage {
    /// Position in the fixed chain order
    pub fn rank(&self) -> u8 {
        match self {
            FilterStage::HighPass { .. } => 0,
            FilterStage::LowShelf { .. } => 1,
            FilterStage::Bell { .. } => 2,
            FilterStage::HighShelf { .. } => 3,
            FilterStage::DeMud { .. } => 4,
            FilterStage::Exciter { .. } => 5,
            FilterStage::Compressor { .. } => 6,
            FilterStage::LoudnessNormalize { .. } => 7,
            FilterStage::Limiter { .. } => 8,
        }
    }

    /// Stages every chain must carry
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            FilterStage::HighPass { .. }
                | FilterStage::Compressor { .. }
                | FilterStage::LoudnessNormalize { .. }
                | FilterStage::Limiter { .. }
        )
    }

    /// FFmpeg filter expression for this stage
    pub fn to_ffmpeg(&self) -> String {
        match self {
            FilterStage::HighPass { cutoff_hz } => format!("highpass=f={cutoff_hz}"),
            FilterStage::LowShelf { freq_hz, gain_db } => {
                format!("lowshelf=f={freq_hz}:g={gain_db:.2}")
            }
            FilterStage::Bell { freq_hz, gain_db, q }
            | FilterStage::DeMud { freq_hz, gain_db, q } => {
                format!("equalizer=f={freq_hz}:t=q:w={q}:g={gain_db:.2}")
            }
            FilterStage::HighShelf { freq_hz, gain_db } => {
                format!("highshelf=f={freq_hz}:g={gain_db:.2}")
            }
            FilterStage::Exciter {
                level_in,
                level_out,
                amount,
                drive,
            } => format!(
                "aexciter=level_in={level_in}:level_out={level_out}:amount={amount}:drive={drive}"
            ),
            FilterStage::Compressor {
                threshold_db,
                ratio,
                attack_ms,
                release_ms,
                makeup_db,
            } => format!(
                "acompressor=threshold={threshold_db:.1}dB:ratio={ratio:.1}:attack={attack_ms}:release={release_ms}:makeup={makeup_db:.1}dB"
            ),
            FilterStage::LoudnessNormalize {
                target_lufs,
                loudness_range,
                true_peak_dbtp,
            } => format!("loudnorm=I={target_lufs:.1}:LRA={loudness_range}:TP={true_peak_dbtp:.1}"),
            FilterStage::Limiter {
                ceiling,
                attack_ms,
                release_ms,
            } => format!("alimiter=limit={ceiling}:attack={attack_ms}:release={release_ms}"),
        }
    }
}

/// Ordered, validated stage list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FilterStage>", into = "Vec<FilterStage>")]
pub struct FilterChainSpec {
    stages: Vec<FilterStage>,
}

impl FilterChainSpec {
    /// Compile a chain. Total over normalized parameters.
    pub fn compile(params: &MasteringParameters, genre: Genre) -> Self {
        let p = params.clamped();
        let mut stages = vec![FilterStage::HighPass { cutoff_hz: 30.0 }];

        if p.bass_boost > 0.5 {
            stages.push(FilterStage::LowShelf {
                freq_hz: 120.0,
                gain_db: (p.bass_boost - 0.5) * 12.0,
            });
        }
        if p.mid_range > 0.6 {
            stages.push(FilterStage::Bell {
                freq_hz: 1200.0,
                gain_db: (p.mid_range - 0.5) * 8.0,
                q: 1.5,
            });
        }
        if p.brightness > 0.6 {
            stages.push(FilterStage::HighShelf {
                freq_hz: 8000.0,
                gain_db: (p.brightness - 0.5) * 10.0,
            });
        }
        if genre.is_high_energy() || p.bass_boost > 0.7 {
            stages.push(FilterStage::DeMud {
                freq_hz: 300.0,
                gain_db: -2.0,
                q: 1.2,
            });
        }
        if p.bass_boost > 0.6 || p.brightness > 0.7 {
            stages.push(FilterStage::Exciter {
                level_in: 1.0,
                level_out: 1.0,
                amount: 0.5,
                drive: 3.0,
            });
        }

        stages.push(FilterStage::Compressor {
            threshold_db: if genre.is_high_energy() { -20.0 } else { -18.0 },
            ratio: if p.compression > 0.7 { 4.0 } else { 3.0 },
            attack_ms: if genre.preserves_transients() { 30.0 } else { 20.0 },
            release_ms: 180.0,
            makeup_db: (p.volume_boost * 3.0).round(),
        });
        stages.push(FilterStage::LoudnessNormalize {
            target_lufs: -14.0 + (p.volume_boost * 4.0).round(),
            loudness_range: 7.0,
            true_peak_dbtp: -1.0,
        });
        stages.push(FilterStage::Limiter {
            ceiling: 0.99,
            attack_ms: 5.0,
            release_ms: 50.0,
        });

        debug_assert!(validate_order(&stages).is_ok());
        log::debug!("Compiled {} stages for {}", stages.len(), genre);

        Self { stages }
    }

    /// Stages in execution order
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Never true for a compiled chain
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Comma-joined FFmpeg filtergraph (`-af` argument)
    pub fn to_ffmpeg_filter(&self) -> String {
        self.stages
            .iter()
            .map(FilterStage::to_ffmpeg)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> MasterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate from JSON
    pub fn from_json(json: &str) -> MasterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn validate_order(stages: &[FilterStage]) -> MasterResult<()> {
    if let Some(pair) = stages.windows(2).find(|w| w[0].rank() >= w[1].rank()) {
        return Err(MasterError::InvalidChain(format!(
            "stage {:?} may not follow {:?}",
            pair[1], pair[0]
        )));
    }

    let mandatory = stages.iter().filter(|s| s.is_mandatory()).count();
    if mandatory != 4 {
        return Err(MasterError::InvalidChain(
            "high-pass, compressor, loudness and limiter stages are required".into(),
        ));
    }
    Ok(())
}

impl TryFrom<Vec<FilterStage>> for FilterChainSpec {
    type Error = MasterError;

    fn try_from(stages: Vec<FilterStage>) -> MasterResult<Self> {
        validate_order(&stages)?;
        Ok(Self { stages })
    }
}

impl From<FilterChainSpec> for Vec<FilterStage> {
    fn from(chain: FilterChainSpec) -> Self {
        chain.stages
    }
}
