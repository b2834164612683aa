//! Mix quality scoring
//!
//! Heuristic, always-available review of a mix before mastering. An external
//! reviewer may replace it, but its output has to pass [`MixReview::validated`]
//! first.

use crate::analysis::AudioDescriptor;
use crate::genre::Genre;
use serde::{Deserialize, Serialize};

/// Lowest reported score
pub const MIN_SCORE: u8 = 40;
/// Highest reported score
pub const MAX_SCORE: u8 = 95;

/// Review of a mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixReview {
    /// Overall score (40-95)
    pub score: u8,
    /// What already works (never empty)
    pub strengths: Vec<String>,
    /// What mastering can improve (never empty)
    pub opportunities: Vec<String>,
    /// Concrete actions
    pub recommendations: Vec<String>,
    /// Closing message
    pub encouragement: String,
    /// Always true; every mix gets mastered
    #[serde(default = "ready")]
    pub ready_for_mastering: bool,
}

fn ready() -> bool {
    true
}

impl MixReview {
    /// Letter grade
    pub fn grade(&self) -> &'static str {
        match self.score {
            80.. => "A",
            70..=79 => "B+",
            _ => "B",
        }
    }

    /// Score description
    pub fn description(&self) -> &'static str {
        match self.score {
            80.. => "Excellent Mix Quality",
            70..=79 => "Very Good Mix Quality",
            _ => "Good Mix Quality",
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Your mix shows {} strong points and has {} areas ready for optimization. {}",
            self.strengths.len(),
            self.opportunities.len(),
            self.encouragement
        )
    }

    /// Accept a review from an outside source: strengths and opportunities
    /// must be non-empty, score is clamped.
    pub fn validated(mut self) -> Option<Self> {
        if self.strengths.is_empty() || self.opportunities.is_empty() {
            return None;
        }
        if self.encouragement.trim().is_empty() {
            self.encouragement = encouragement(self.score).to_string();
        }
        self.score = self.score.clamp(MIN_SCORE, MAX_SCORE);
        self.ready_for_mastering = true;
        Some(self)
    }
}

fn encouragement(score: u8) -> &'static str {
    if score >= 80 {
        "Excellent starting point! Let's add that final professional polish."
    } else if score >= 70 {
        "Great work! A few enhancements will take this to the next level."
    } else {
        "Good foundation! Some sonic optimization will really make this shine."
    }
}

/// Score a mix from its descriptor
pub fn review_mix(d: &AudioDescriptor) -> MixReview {
    let mut strengths = Vec::new();
    let mut opportunities = Vec::new();
    let mut recommendations = Vec::new();
    let mut score: i32 = 50;

    // Loudness
    if d.energy_level > 0.7 {
        strengths.push("Good energy and presence".to_string());
        score += 5;
    } else {
        opportunities.push("Loudness can be optimized for streaming platforms".to_string());
        recommendations.push("Boost overall loudness for more impact".to_string());
    }

    // Low end
    if d.bass_level > 0.6 && d.bass_level < 0.85 {
        strengths.push("Well-balanced low-end".to_string());
        score += 5;
    } else if d.bass_level <= 0.6 {
        opportunities.push("Low frequencies could use more warmth".to_string());
        recommendations.push("Enhance bass for fuller sound".to_string());
    } else {
        opportunities.push("Low-end could be better controlled".to_string());
        recommendations.push("Balance bass frequencies for clarity".to_string());
    }

    // Mids
    if d.mid_level > 0.7 {
        strengths.push("Clear mid-range definition".to_string());
        score += 5;
    } else {
        opportunities.push("Mid-range clarity can be enhanced".to_string());
        recommendations.push("Improve vocal/instrument presence".to_string());
    }

    // Highs
    if d.treble_level > 0.6 && d.treble_level < 0.85 {
        strengths.push("Nice high-frequency sparkle".to_string());
        score += 5;
    } else if d.treble_level <= 0.6 {
        opportunities.push("High frequencies could be more vibrant".to_string());
        recommendations.push("Add brightness for professional shine".to_string());
    } else {
        opportunities.push("Treble can be smoothed for comfort".to_string());
        recommendations.push("Refine high frequencies for polish".to_string());
    }

    if d.genre != Genre::Unknown {
        strengths.push(format!("Genre characteristics detected ({})", d.genre));
        score += 5;
    }

    if strengths.len() < 2 {
        strengths.push("Solid foundation to build upon".to_string());
        strengths.push("Ready for professional enhancement".to_string());
    }
    if opportunities.is_empty() {
        opportunities.push("Can be optimized for maximum impact".to_string());
        opportunities.push("Ready for final polish and refinement".to_string());
    }

    let score = score.clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8;

    MixReview {
        score,
        strengths,
        opportunities,
        recommendations,
        encouragement: encouragement(score).to_string(),
        ready_for_mastering: true,
    }
}

/// Fallback mixing (or mastering) tips
pub fn mixing_tips(d: &AudioDescriptor, for_mastering: bool) -> Vec<String> {
    let mut tips = Vec::new();

    if d.has_vocals {
        tips.push("Keep vocals clear by preserving the 1-4kHz mid-range frequencies.".to_string());
    }

    if d.bass_level > 0.7 {
        tips.push(
            "Monitor low-end carefully - use a high-pass filter to remove sub-20Hz rumble."
                .to_string(),
        );
    } else if d.bass_level < 0.4 {
        tips.push("Consider adding warmth with subtle bass enhancement around 80-150Hz.".to_string());
    }

    if d.energy_level > 0.7 {
        tips.push(
            "Use compression carefully to control dynamics without losing the track's energy."
                .to_string(),
        );
    }

    if for_mastering {
        tips.push(
            "Apply gentle multiband compression for balanced frequency response across the spectrum."
                .to_string(),
        );
    } else {
        tips.push(
            "Before mastering, ensure your mix has proper headroom (-6dB to -3dB peak levels)."
                .to_string(),
        );
    }

    tips
}

/// Fallback preparation checklist
pub fn pre_mastering_tips() -> Vec<String> {
    [
        "Leave at least -6dB of headroom in your mix before mastering.",
        "Check your mix in mono to ensure proper phase relationships.",
        "Remove any unnecessary low-frequency rumble below 30Hz.",
        "Ensure your mix has consistent volume levels throughout the track.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// One-sentence description of an analysis
pub fn analysis_summary(d: &AudioDescriptor) -> String {
    let content = if d.has_vocals {
        "vocals"
    } else {
        "instrumental elements"
    };

    if d.has_meaningful_tempo() {
        format!(
            "This {} track has a tempo of {} BPM with {}.",
            d.genre, d.tempo_bpm, content
        )
    } else {
        format!("This {} track has no steady tempo and features {}.", d.genre, content)
    }
}
