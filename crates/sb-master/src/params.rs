//! Mastering parameter vector

use crate::genre::Genre;
use serde::{Deserialize, Serialize};

/// Clamp to [0,1]; NaN maps to 0
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Normalized mastering parameters, every field in [0,1].
///
/// Transformations never mutate a vector in place; each step returns a new
/// value so the pipeline can be replayed deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteringParameters {
    /// Loudness push (drives makeup gain and loudness target)
    pub volume_boost: f32,
    /// High-frequency emphasis
    pub brightness: f32,
    /// Mid-range presence (vocal clarity)
    pub mid_range: f32,
    /// Low-end emphasis
    pub bass_boost: f32,
    /// Dynamic range reduction
    pub compression: f32,
    /// Absolute pitch position (0.5 = unshifted)
    pub pitch_shift: f32,
}

/// Addressable field of [`MasteringParameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    /// `volume_boost`
    VolumeBoost,
    /// `brightness`
    Brightness,
    /// `mid_range`
    MidRange,
    /// `bass_boost`
    BassBoost,
    /// `compression`
    Compression,
    /// `pitch_shift`
    PitchShift,
}

impl MasteringParameters {
    /// Neutral baseline used for fields a genre profile leaves unset
    pub const NEUTRAL: MasteringParameters = MasteringParameters {
        volume_boost: 0.8,
        brightness: 0.7,
        mid_range: 0.7,
        bass_boost: 0.6,
        compression: 0.6,
        pitch_shift: 0.5,
    };

    /// Copy with every field clamped to [0,1]
    pub fn clamped(&self) -> Self {
        Self {
            volume_boost: clamp01(self.volume_boost),
            brightness: clamp01(self.brightness),
            mid_range: clamp01(self.mid_range),
            bass_boost: clamp01(self.bass_boost),
            compression: clamp01(self.compression),
            pitch_shift: clamp01(self.pitch_shift),
        }
    }

    /// True when every field is finite and within [0,1]
    pub fn is_normalized(&self) -> bool {
        [
            self.volume_boost,
            self.brightness,
            self.mid_range,
            self.bass_boost,
            self.compression,
            self.pitch_shift,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }

    /// Read one field
    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::VolumeBoost => self.volume_boost,
            ParamField::Brightness => self.brightness,
            ParamField::MidRange => self.mid_range,
            ParamField::BassBoost => self.bass_boost,
            ParamField::Compression => self.compression,
            ParamField::PitchShift => self.pitch_shift,
        }
    }

    /// Copy with one field replaced (clamped)
    pub fn with(&self, field: ParamField, value: f32) -> Self {
        let mut next = *self;
        let value = clamp01(value);
        match field {
            ParamField::VolumeBoost => next.volume_boost = value,
            ParamField::Brightness => next.brightness = value,
            ParamField::MidRange => next.mid_range = value,
            ParamField::BassBoost => next.bass_boost = value,
            ParamField::Compression => next.compression = value,
            ParamField::PitchShift => next.pitch_shift = value,
        }
        next
    }

    /// Copy with one field moved by `delta` (clamped)
    pub fn nudged(&self, field: ParamField, delta: f32) -> Self {
        self.with(field, self.get(field) + delta)
    }

    /// Human-readable list of the processing this vector implies
    pub fn description(&self, genre: Genre) -> String {
        let mut effects = vec![format!("{} optimization", capitalize(genre.label()))];

        if self.volume_boost > 0.7 {
            effects.push("Loudness maximization".to_string());
        }
        if self.brightness > 0.6 {
            effects.push("High-frequency clarity".to_string());
        }
        if self.mid_range > 0.7 {
            effects.push("Vocal presence enhancement".to_string());
        }
        if self.bass_boost > 0.7 {
            effects.push("Bass enhancement".to_string());
        }
        if self.compression > 0.6 {
            effects.push("Dynamic control".to_string());
        }

        effects.join(", ")
    }

    /// Playback rate for an un-rendered preview. Higher mid-range damps the
    /// shift so vocals keep their character.
    pub fn preview_playback_rate(&self) -> f32 {
        1.0 + self.pitch_shift * (1.0 - self.mid_range * 0.3) * 0.08
    }
}

impl Default for MasteringParameters {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
