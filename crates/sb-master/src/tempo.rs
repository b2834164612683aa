//! Tempo estimation
//!
//! Three tiers, first hit wins:
//! 1. Explicit BPM tokens in the filename/hint (`128bpm`, `[128]`, `@128`, `_128_`)
//! 2. Bar alignment: BPMs in the genre range that split the duration into
//!    near-whole bars, reduced by a genre/duration/bitrate-weighted score and
//!    the median over several duration samples
//! 3. Pure genre + duration estimate
//!
//! Non-rhythmic genres (podcast) always yield 0.

use crate::config::TempoConfig;
use crate::genre::Genre;
use serde::{Deserialize, Serialize};

/// Inclusive BPM range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoRange {
    /// Slowest BPM
    pub min: u32,
    /// Fastest BPM
    pub max: u32,
}

impl TempoRange {
    /// Create a range; swapped bounds are reordered
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Range width in BPM
    pub fn span(&self) -> u32 {
        self.max.saturating_sub(self.min)
    }

    /// Midpoint
    pub fn center(&self) -> f64 {
        (self.min + self.max) as f64 / 2.0
    }

    /// Inclusive containment
    pub fn contains(&self, bpm: u32) -> bool {
        (self.min..=self.max).contains(&bpm)
    }

    /// Widen both ends by a fraction of their value
    pub fn widened(&self, tolerance: f32) -> Self {
        let min = (self.min as f32 * (1.0 - tolerance)).floor().max(1.0) as u32;
        let max = (self.max as f32 * (1.0 + tolerance)).ceil() as u32;
        Self { min, max }
    }

    /// Genre + duration estimate: longer tracks lean toward the slow end
    /// (up to 30% of the span at five minutes and beyond).
    pub fn duration_estimate(&self, duration_secs: f32) -> u32 {
        let factor = (duration_secs / 300.0).clamp(0.0, 1.0);
        let tempo = self.min as f32 + self.span() as f32 * (1.0 - factor * 0.3);
        tempo.round() as u32
    }
}

/// Which tier produced the tempo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoMethod {
    /// BPM token found in the hint
    Hint,
    /// Bar-alignment candidates
    BarAlignment,
    /// Genre + duration fallback
    GenreEstimate,
    /// Spoken/non-rhythmic content
    NonRhythmic,
}

/// Bar-alignment candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarCandidate {
    /// Candidate tempo
    pub bpm: u32,
    /// Distance of the bar count from a whole number (0-0.5)
    pub misalignment: f64,
}

/// Tempo estimate with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Estimated tempo (0 for non-rhythmic content)
    pub bpm: u32,
    /// Tier that produced it
    pub method: TempoMethod,
    /// Bar-alignment candidates on the full duration (empty for other tiers)
    pub candidates: Vec<u32>,
}

/// Multi-tier tempo estimator
#[derive(Debug, Clone, Default)]
pub struct TempoEstimator {
    config: TempoConfig,
}

impl TempoEstimator {
    /// Create estimator
    pub fn new(config: TempoConfig) -> Self {
        Self { config }
    }

    /// Current tuning
    pub fn config(&self) -> &TempoConfig {
        &self.config
    }

    /// Estimate tempo for a track
    pub fn estimate(
        &self,
        genre: Genre,
        duration_secs: f32,
        hint: Option<&str>,
        bitrate_kbps: Option<u32>,
    ) -> TempoEstimate {
        let Some(range) = genre.tempo_range() else {
            return TempoEstimate {
                bpm: 0,
                method: TempoMethod::NonRhythmic,
                candidates: Vec::new(),
            };
        };

        if let Some(bpm) = hint.and_then(|h| self.tempo_from_hint(genre, h)) {
            log::debug!("Tempo {} BPM taken from hint", bpm);
            return TempoEstimate {
                bpm,
                method: TempoMethod::Hint,
                candidates: Vec::new(),
            };
        }

        if let Some((bpm, candidates)) = self.bar_aligned(range, duration_secs, bitrate_kbps) {
            log::debug!("Tempo {} BPM from bar alignment {:?}", bpm, candidates);
            return TempoEstimate {
                bpm,
                method: TempoMethod::BarAlignment,
                candidates,
            };
        }

        TempoEstimate {
            bpm: range.duration_estimate(duration_secs),
            method: TempoMethod::GenreEstimate,
            candidates: Vec::new(),
        }
    }

    /// First hint token inside the genre's validation range
    pub fn tempo_from_hint(&self, genre: Genre, hint: &str) -> Option<u32> {
        let valid = self.validation_range(genre)?;
        hint_tokens(hint).into_iter().find(|bpm| valid.contains(*bpm))
    }

    /// Range a hint token must fall in: the genre range widened by the
    /// configured tolerance, or the wide range for `unknown`
    pub fn validation_range(&self, genre: Genre) -> Option<TempoRange> {
        match genre {
            Genre::Unknown => Some(TempoRange::new(
                self.config.wide_min_bpm,
                self.config.wide_max_bpm,
            )),
            _ => genre
                .tempo_range()
                .map(|r| r.widened(self.config.hint_tolerance)),
        }
    }

    /// Up to `max_candidates` BPMs in `range` whose bar count over
    /// `duration_secs` is closest to whole. Ties prefer the range center.
    pub fn bar_candidates(&self, range: TempoRange, duration_secs: f32) -> Vec<BarCandidate> {
        let beats_per_bar = self.config.beats_per_bar.max(1) as f64;
        let center = range.center();

        let mut candidates: Vec<BarCandidate> = (range.min..=range.max)
            .map(|bpm| {
                let bars = duration_secs as f64 * bpm as f64 / 60.0 / beats_per_bar;
                BarCandidate {
                    bpm,
                    misalignment: (bars - bars.round()).abs(),
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.misalignment
                .total_cmp(&b.misalignment)
                .then_with(|| (a.bpm as f64 - center).abs().total_cmp(&(b.bpm as f64 - center).abs()))
                .then_with(|| a.bpm.cmp(&b.bpm))
        });
        candidates.truncate(self.config.max_candidates);
        candidates
    }

    fn bar_aligned(
        &self,
        range: TempoRange,
        duration_secs: f32,
        bitrate_kbps: Option<u32>,
    ) -> Option<(u32, Vec<u32>)> {
        if !duration_secs.is_finite() || duration_secs < self.config.min_alignment_secs {
            return None;
        }

        let mut picks = Vec::with_capacity(self.config.samples);
        let mut full_candidates = Vec::new();

        for k in 0..self.config.samples {
            let duration = duration_secs - k as f32 * self.config.sample_trim_secs;
            if duration < self.config.min_alignment_secs {
                break;
            }

            let candidates = self.bar_candidates(range, duration);
            if k == 0 {
                full_candidates = candidates.iter().map(|c| c.bpm).collect();
            }

            let prior = range.duration_estimate(duration);
            if let Some(pick) = self.reduce(&candidates, prior, range, bitrate_kbps) {
                picks.push(pick);
            }
        }

        median(&mut picks).map(|bpm| (bpm, full_candidates))
    }

    /// Collapse candidates to one BPM. Alignment and closeness to the
    /// genre/duration prior are blended; low-bitrate files trust the prior more.
    fn reduce(
        &self,
        candidates: &[BarCandidate],
        prior: u32,
        range: TempoRange,
        bitrate_kbps: Option<u32>,
    ) -> Option<u32> {
        let (w_align, w_prior) = match bitrate_kbps {
            Some(kbps) if kbps >= self.config.low_bitrate_kbps => (0.6, 0.4),
            Some(_) => (0.4, 0.6),
            None => (0.5, 0.5),
        };
        let span = range.span().max(1) as f64;

        let score = |c: &BarCandidate| {
            let alignment = 1.0 - 2.0 * c.misalignment;
            let closeness = 1.0 - (c.bpm as f64 - prior as f64).abs() / span;
            w_align * alignment + w_prior * closeness
        };

        candidates
            .iter()
            .max_by(|a, b| {
                score(a)
                    .total_cmp(&score(b))
                    // On equal score prefer the candidate nearer the prior, then the slower one
                    .then_with(|| b.bpm.abs_diff(prior).cmp(&a.bpm.abs_diff(prior)))
                    .then_with(|| b.bpm.cmp(&a.bpm))
            })
            .map(|c| c.bpm)
    }
}

/// Median; even-length input averages the middle pair (rounded)
fn median(values: &mut [u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some(((values[mid - 1] + values[mid]) as f32 / 2.0).round() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TokenKind {
    BpmSuffix,
    Bracketed,
    At,
    Underscored,
}

/// BPM-like tokens in a hint, most explicit pattern first, then by position.
/// Only maximal runs of two or three digits count.
pub fn hint_tokens(hint: &str) -> Vec<u32> {
    let text = hint.to_ascii_lowercase();
    let bytes = text.as_bytes();
    let mut found: Vec<(TokenKind, usize, u32)> = Vec::new();

    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let end = i;
        if !(2..=3).contains(&(end - start)) {
            continue;
        }

        let Ok(value) = text[start..end].parse::<u32>() else {
            continue;
        };
        let before = start.checked_sub(1).map(|p| bytes[p]);
        let after = bytes.get(end).copied();

        let kind = if has_bpm_suffix(&bytes[end..]) {
            Some(TokenKind::BpmSuffix)
        } else if before == Some(b'[') && after == Some(b']') {
            Some(TokenKind::Bracketed)
        } else if before == Some(b'@') {
            Some(TokenKind::At)
        } else if before == Some(b'_') && after == Some(b'_') {
            Some(TokenKind::Underscored)
        } else {
            None
        };

        if let Some(kind) = kind {
            found.push((kind, start, value));
        }
    }

    found.sort();
    found.into_iter().map(|(_, _, value)| value).collect()
}

/// `bpm`, optionally preceded by one space, underscore or dash
fn has_bpm_suffix(rest: &[u8]) -> bool {
    let rest = match rest.first() {
        Some(b' ' | b'_' | b'-') => &rest[1..],
        _ => rest,
    };
    rest.starts_with(b"bpm")
}
