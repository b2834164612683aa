//! Manual EQ and pitch adjustments

use crate::params::{MasteringParameters, clamp01};
use serde::{Deserialize, Serialize};

/// Bound on each EQ band (dB)
pub const MAX_BAND_DB: f32 = 6.0;
/// Bound on the pitch control (semitones)
pub const MAX_SEMITONES: f32 = 12.0;

/// Manual controls supplied by the user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAdjustment {
    /// High band (dB, ±6)
    pub high: f32,
    /// Mid band (dB, ±6)
    pub mid: f32,
    /// Low band (dB, ±6)
    pub low: f32,
    /// Pitch (semitones, ±12)
    pub tempo: f32,
}

fn bounded(value: f32, limit: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-limit, limit)
    }
}

impl UserAdjustment {
    /// Copy with every control forced into bounds (NaN reads as 0)
    pub fn clamped(&self) -> Self {
        Self {
            high: bounded(self.high, MAX_BAND_DB),
            mid: bounded(self.mid, MAX_BAND_DB),
            low: bounded(self.low, MAX_BAND_DB),
            tempo: bounded(self.tempo, MAX_SEMITONES),
        }
    }

    /// No control moved
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Layer manual controls over a parameter vector.
///
/// EQ bands are additive (`dB / 12`); pitch is an absolute remap. Volume and
/// compression stay with the calculator.
pub fn apply_adjustment(
    params: &MasteringParameters,
    adjustment: &UserAdjustment,
) -> MasteringParameters {
    let adj = adjustment.clamped();

    MasteringParameters {
        brightness: clamp01(params.brightness + adj.high / 12.0),
        mid_range: clamp01(params.mid_range + adj.mid / 12.0),
        bass_boost: clamp01(params.bass_boost + adj.low / 12.0),
        pitch_shift: clamp01((adj.tempo + MAX_SEMITONES) / 24.0),
        ..*params
    }
}
