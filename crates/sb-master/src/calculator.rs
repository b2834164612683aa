//! Adaptive mastering parameter calculation
//!
//! Genre baseline first, then adaptive rules in fixed order so results are
//! reproducible.

use crate::analysis::AudioDescriptor;
use crate::params::{MasteringParameters, clamp01};

/// Vocal tracks never drop below this mid-range presence
pub const VOCAL_MID_FLOOR: f32 = 0.8;

/// Derive mastering parameters from a descriptor
pub fn calculate_parameters(descriptor: &AudioDescriptor) -> MasteringParameters {
    let mut p = descriptor.genre.profile().resolve();

    // 1. Vocals need presence
    if descriptor.has_vocals {
        p.mid_range = p.mid_range.max(VOCAL_MID_FLOOR);
    }

    // 2. Already-energetic material gets squashed less
    if descriptor.energy_level > 0.8 {
        p.compression *= 0.9;
    }

    // 3. Thin mids get lifted
    if descriptor.mid_level < 0.6 {
        p.mid_range = clamp01(p.mid_range + 0.2);
    }

    // 4-5. Tempo: fast = brighter and leaner, slow = warmer
    if descriptor.tempo_bpm > 140 {
        p.brightness = clamp01(p.brightness + 0.1);
        p.bass_boost *= 0.9;
    } else if descriptor.tempo_bpm < 80 && descriptor.genre.is_rhythmic() {
        p.mid_range = clamp01(p.mid_range + 0.1);
        p.brightness *= 0.9;
    }

    let p = p.clamped();
    log::debug!("Mastering parameters for {}: {:?}", descriptor.genre, p);
    p
}
