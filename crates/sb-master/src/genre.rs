//! Genre tables
//!
//! Static per-genre data versioned with the code:
//! - Baseline mastering profile (partial parameter vector)
//! - Heuristic signal traits (vocals, energy, band levels)
//! - Typical tempo range
//! - Filename/hint keyword rules

use crate::error::{MasterError, MasterResult};
use crate::params::MasteringParameters;
use crate::tempo::TempoRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Detected musical genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    /// Pop/Contemporary
    Pop,
    /// Rock/Alternative
    Rock,
    /// Hip-hop/Rap
    HipHop,
    /// Electronic/EDM
    Electronic,
    /// Jazz/Blues
    Jazz,
    /// Classical/Orchestral
    Classical,
    /// Acoustic/Folk
    Acoustic,
    /// Vocal/A cappella
    Vocal,
    /// Podcast/Spoken word
    Podcast,
    /// Not detected
    Unknown,
}

impl Genre {
    /// All genres, in table order
    pub const ALL: [Genre; 10] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Electronic,
        Genre::Jazz,
        Genre::Classical,
        Genre::Acoustic,
        Genre::Vocal,
        Genre::Podcast,
        Genre::Unknown,
    ];

    /// Wire label (lowercase, matches serde)
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Pop => "pop",
            Genre::Rock => "rock",
            Genre::HipHop => "hiphop",
            Genre::Electronic => "electronic",
            Genre::Jazz => "jazz",
            Genre::Classical => "classical",
            Genre::Acoustic => "acoustic",
            Genre::Vocal => "vocal",
            Genre::Podcast => "podcast",
            Genre::Unknown => "unknown",
        }
    }

    /// Parse one of the ten known labels (case-insensitive, surrounding
    /// whitespace and quotes ignored). Anything else is `None`.
    pub fn from_label(label: &str) -> Option<Genre> {
        let cleaned = label
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '.')
            .to_ascii_lowercase();
        Genre::ALL.into_iter().find(|g| g.label() == cleaned)
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::Pop => "Pop/Contemporary",
            Genre::Rock => "Rock/Alternative",
            Genre::HipHop => "Hip-Hop/Rap",
            Genre::Electronic => "Electronic/EDM",
            Genre::Jazz => "Jazz/Blues",
            Genre::Classical => "Classical/Orchestral",
            Genre::Acoustic => "Acoustic/Folk",
            Genre::Vocal => "Vocal/A Cappella",
            Genre::Podcast => "Podcast/Spoken Word",
            Genre::Unknown => "Balanced/Universal",
        }
    }

    /// Genres mastered with a lower compressor threshold and a de-mud cut
    pub fn is_high_energy(&self) -> bool {
        matches!(self, Genre::HipHop | Genre::Electronic)
    }

    /// Genres whose transients get a slower compressor attack
    pub fn preserves_transients(&self) -> bool {
        matches!(self, Genre::Classical | Genre::Jazz)
    }

    /// Whether tempo carries meaning for this genre
    pub fn is_rhythmic(&self) -> bool {
        !matches!(self, Genre::Podcast)
    }

    /// Baseline mastering profile
    pub fn profile(&self) -> GenreProfile {
        let p = |volume, brightness, mid, bass, compression, pitch| GenreProfile {
            volume_boost: Some(volume),
            brightness: Some(brightness),
            mid_range: Some(mid),
            bass_boost: Some(bass),
            compression: Some(compression),
            pitch_shift: Some(pitch),
        };

        match self {
            Genre::Pop => p(0.9, 0.8, 0.8, 0.6, 0.7, 0.6),
            Genre::Rock => p(0.85, 0.7, 0.7, 0.7, 0.6, 0.5),
            Genre::HipHop => p(0.95, 0.5, 0.6, 0.9, 0.8, 0.3),
            Genre::Electronic => p(1.0, 0.9, 0.5, 0.85, 0.75, 0.7),
            Genre::Jazz => p(0.7, 0.6, 0.9, 0.5, 0.4, 0.4),
            Genre::Classical => p(0.6, 0.7, 0.85, 0.4, 0.3, 0.3),
            Genre::Acoustic => p(0.75, 0.75, 0.95, 0.5, 0.5, 0.5),
            Genre::Vocal => p(0.85, 0.7, 1.0, 0.4, 0.6, 0.6),
            Genre::Podcast => p(0.9, 0.8, 1.0, 0.3, 0.8, 0.5),
            Genre::Unknown => p(0.8, 0.7, 0.7, 0.6, 0.6, 0.5),
        }
    }

    /// Heuristic signal traits (stand-in for spectral analysis)
    pub fn traits(&self) -> GenreTraits {
        let t = |has_vocals, energy, bass, mid, treble| GenreTraits {
            has_vocals,
            energy_level: energy,
            bass_level: bass,
            mid_level: mid,
            treble_level: treble,
        };

        match self {
            Genre::Pop => t(true, 0.8, 0.7, 0.8, 0.7),
            Genre::Rock => t(true, 0.9, 0.8, 0.8, 0.8),
            Genre::HipHop => t(true, 0.7, 0.9, 0.7, 0.6),
            Genre::Electronic => t(false, 0.95, 0.9, 0.6, 0.9),
            Genre::Jazz => t(false, 0.6, 0.6, 0.9, 0.7),
            Genre::Classical => t(false, 0.5, 0.6, 0.9, 0.8),
            Genre::Acoustic => t(true, 0.6, 0.5, 0.95, 0.7),
            Genre::Vocal => t(true, 0.5, 0.4, 1.0, 0.6),
            Genre::Podcast => t(true, 0.5, 0.4, 1.0, 0.7),
            Genre::Unknown => t(true, 0.7, 0.6, 0.7, 0.6),
        }
    }

    /// Typical tempo range; `None` for non-rhythmic content
    pub fn tempo_range(&self) -> Option<TempoRange> {
        let r = |min, max| Some(TempoRange::new(min, max));

        match self {
            Genre::Pop => r(100, 130),
            Genre::Rock => r(110, 140),
            Genre::HipHop => r(70, 100),
            Genre::Electronic => r(120, 140),
            Genre::Jazz => r(90, 160),
            Genre::Classical => r(60, 120),
            Genre::Acoustic => r(80, 120),
            Genre::Vocal => r(70, 110),
            Genre::Podcast => None,
            Genre::Unknown => r(90, 130),
        }
    }

    /// Deterministic keyword detection over a filename or free-text hint.
    /// Rules are checked in order; the first match wins.
    pub fn keyword_match(hint: &str) -> Option<Genre> {
        let lower = hint.to_lowercase();
        KEYWORD_RULES
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(genre, _)| *genre)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = MasterError;

    fn from_str(s: &str) -> MasterResult<Self> {
        Genre::from_label(s).ok_or_else(|| MasterError::UnknownGenre(s.to_string()))
    }
}

/// Ordered keyword rules. `unknown` has no keywords.
const KEYWORD_RULES: [(Genre, &[&str]); 9] = [
    (Genre::Pop, &["pop", "billboard"]),
    (Genre::Rock, &["rock", "metal", "guitar"]),
    (Genre::HipHop, &["hip", "rap", "trap", "beat"]),
    (Genre::Electronic, &["edm", "house", "techno", "electronic"]),
    (Genre::Jazz, &["jazz", "blues", "swing"]),
    (Genre::Classical, &["classical", "orchestra", "symphony"]),
    (Genre::Acoustic, &["acoustic", "unplugged", "folk"]),
    (Genre::Vocal, &["vocal", "acapella", "choir", "singing"]),
    (Genre::Podcast, &["podcast", "interview", "talk", "speech"]),
];

/// Partial baseline parameter vector for a genre
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GenreProfile {
    /// Loudness push
    pub volume_boost: Option<f32>,
    /// High-frequency emphasis
    pub brightness: Option<f32>,
    /// Mid-range presence
    pub mid_range: Option<f32>,
    /// Low-end emphasis
    pub bass_boost: Option<f32>,
    /// Dynamic range reduction
    pub compression: Option<f32>,
    /// Absolute pitch position
    pub pitch_shift: Option<f32>,
}

impl GenreProfile {
    /// Fill missing fields from the neutral baseline and clamp to [0,1]
    pub fn resolve(&self) -> MasteringParameters {
        let n = MasteringParameters::NEUTRAL;
        MasteringParameters {
            volume_boost: self.volume_boost.unwrap_or(n.volume_boost),
            brightness: self.brightness.unwrap_or(n.brightness),
            mid_range: self.mid_range.unwrap_or(n.mid_range),
            bass_boost: self.bass_boost.unwrap_or(n.bass_boost),
            compression: self.compression.unwrap_or(n.compression),
            pitch_shift: self.pitch_shift.unwrap_or(n.pitch_shift),
        }
        .clamped()
    }
}

/// Heuristic per-genre descriptor fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenreTraits {
    /// Vocals expected
    pub has_vocals: bool,
    /// Overall energy (0-1)
    pub energy_level: f32,
    /// Low-band content (0-1)
    pub bass_level: f32,
    /// Mid-band content (0-1)
    pub mid_level: f32,
    /// High-band content (0-1)
    pub treble_level: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roundtrip_through_from_label() {
        for genre in Genre::ALL {
            assert_eq!(Genre::from_label(genre.label()), Some(genre));
        }
        assert_eq!(Genre::from_label("  HipHop\n"), Some(Genre::HipHop));
        assert_eq!(Genre::from_label("\"jazz\""), Some(Genre::Jazz));
        assert_eq!(Genre::from_label("hip-hop"), None);
        assert_eq!(Genre::from_label("polka"), None);
        assert!("polka".parse::<Genre>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Genre::HipHop).unwrap();
        assert_eq!(json, "\"hiphop\"");
    }

    #[test]
    fn test_keyword_rules_first_match_wins() {
        assert_eq!(Genre::keyword_match("Summer_POP_hit.mp3"), Some(Genre::Pop));
        assert_eq!(Genre::keyword_match("metal_track.wav"), Some(Genre::Rock));
        assert_eq!(Genre::keyword_match("trap_beat_v2.mp3"), Some(Genre::HipHop));
        assert_eq!(Genre::keyword_match("deep house mix"), Some(Genre::Electronic));
        assert_eq!(Genre::keyword_match("episode-12-interview"), Some(Genre::Podcast));
        // "pop" precedes "rock" in the rule list
        assert_eq!(Genre::keyword_match("pop rock anthem"), Some(Genre::Pop));
        assert_eq!(Genre::keyword_match("untitled_03.wav"), None);
    }

    #[test]
    fn test_profiles_are_normalized() {
        for genre in Genre::ALL {
            assert!(genre.profile().resolve().is_normalized());
        }
        let hiphop = Genre::HipHop.profile();
        assert_eq!(hiphop.bass_boost, Some(0.9));
        assert_eq!(hiphop.brightness, Some(0.5));
        assert_eq!(hiphop.compression, Some(0.8));
        let classical = Genre::Classical.profile();
        assert_eq!(classical.bass_boost, Some(0.4));
        assert_eq!(classical.compression, Some(0.3));
    }

    #[test]
    fn test_partial_profile_falls_back_to_neutral() {
        let partial = GenreProfile {
            bass_boost: Some(0.95),
            ..Default::default()
        };
        let resolved = partial.resolve();
        assert_eq!(resolved.bass_boost, 0.95);
        assert_eq!(resolved.volume_boost, MasteringParameters::NEUTRAL.volume_boost);
        assert_eq!(resolved.pitch_shift, MasteringParameters::NEUTRAL.pitch_shift);
    }

    #[test]
    fn test_podcast_has_no_tempo_range() {
        assert!(Genre::Podcast.tempo_range().is_none());
        assert!(!Genre::Podcast.is_rhythmic());
        assert!(Genre::Unknown.tempo_range().is_some());
    }
}
