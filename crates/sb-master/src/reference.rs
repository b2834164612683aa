//! Reference track matching
//!
//! Blend a track's parameters toward the sonic character of a reference
//! master, and report how far apart the two are.

use crate::analysis::AudioDescriptor;
use crate::calculator::calculate_parameters;
use crate::params::{MasteringParameters, clamp01};
use serde::{Deserialize, Serialize};

/// Upper bound accepted for a reference dynamic range (dB)
pub const MAX_DYNAMIC_RANGE_DB: f32 = 30.0;

/// Sonic profile of a reference master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceProfile {
    /// Integrated loudness (0-1)
    pub loudness: f32,
    /// Low-band energy (0-1)
    pub bass_energy: f32,
    /// Mid-band energy (0-1)
    pub mid_energy: f32,
    /// High-band energy (0-1)
    pub treble_energy: f32,
    /// Stereo width (0-1)
    pub stereo_width: f32,
    /// Dynamic range (dB, typically 3-15)
    pub dynamic_range: f32,
    /// Perceived brightness (0-1)
    pub brightness: f32,
    /// Tempo (BPM)
    #[serde(rename = "tempoBPM")]
    pub tempo_bpm: u32,
}

impl ReferenceProfile {
    /// Neutral profile used when reference analysis is unavailable
    pub fn neutral() -> Self {
        Self {
            loudness: 0.8,
            bass_energy: 0.65,
            mid_energy: 0.7,
            treble_energy: 0.75,
            stereo_width: 0.8,
            dynamic_range: 8.0,
            brightness: 0.75,
            tempo_bpm: 120,
        }
    }

    /// Copy with every metric forced into its documented range
    pub fn clamped(&self) -> Self {
        let dynamic_range = if self.dynamic_range.is_nan() {
            0.0
        } else {
            self.dynamic_range.clamp(0.0, MAX_DYNAMIC_RANGE_DB)
        };

        Self {
            loudness: clamp01(self.loudness),
            bass_energy: clamp01(self.bass_energy),
            mid_energy: clamp01(self.mid_energy),
            treble_energy: clamp01(self.treble_energy),
            stereo_width: clamp01(self.stereo_width),
            dynamic_range,
            brightness: clamp01(self.brightness),
            tempo_bpm: self.tempo_bpm,
        }
    }
}

impl Default for ReferenceProfile {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Parameters matched to a reference, floored by the track's own result
pub fn match_reference(
    descriptor: &AudioDescriptor,
    reference: &ReferenceProfile,
) -> MasteringParameters {
    let baseline = calculate_parameters(descriptor);
    let r = reference.clamped();

    // Bias slightly louder and brighter than the reference
    let matched = MasteringParameters {
        volume_boost: (r.loudness * 1.05).min(1.0),
        brightness: (r.brightness * 1.1).min(1.0),
        mid_range: baseline.mid_range.max(r.mid_energy * 0.95),
        bass_boost: (r.bass_energy * 1.05).min(1.0),
        compression: (1.0 - r.dynamic_range / 15.0).max(0.3),
        pitch_shift: if r.treble_energy > 0.7 { 0.65 } else { 0.5 },
    }
    .clamped();

    log::debug!("Reference-matched parameters: {:?}", matched);
    matched
}

/// Distance between a track and a reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceComparison {
    /// Track minus reference, low band
    pub bass_diff: f32,
    /// Track minus reference, mid band
    pub mid_diff: f32,
    /// Track minus reference, high band
    pub treble_diff: f32,
    /// Track energy minus reference loudness
    pub loudness_diff: f32,
    /// Overall match score (0-100)
    pub match_score: f32,
}

/// Compare a descriptor with a reference profile
pub fn compare_to_reference(
    descriptor: &AudioDescriptor,
    reference: &ReferenceProfile,
) -> ReferenceComparison {
    let r = reference.clamped();

    let bass_diff = descriptor.bass_level - r.bass_energy;
    let mid_diff = descriptor.mid_level - r.mid_energy;
    let treble_diff = descriptor.treble_level - r.treble_energy;
    let loudness_diff = descriptor.energy_level - r.loudness;

    let spectral = (bass_diff.abs() + mid_diff.abs() + treble_diff.abs()) / 3.0;
    let match_score = match_score(spectral, loudness_diff);

    ReferenceComparison {
        bass_diff,
        mid_diff,
        treble_diff,
        loudness_diff,
        match_score,
    }
}

fn match_score(spectral: f32, loudness: f32) -> f32 {
    // Weight factors
    let spectral_weight = 0.7;
    let loudness_weight = 0.3;

    // A half-scale difference counts as a complete miss
    let spectral_score = 100.0 * (1.0 - (spectral * 2.0).min(1.0));
    let loudness_score = 100.0 * (1.0 - (loudness.abs() * 2.0).min(1.0));

    spectral_weight * spectral_score + loudness_weight * loudness_score
}
