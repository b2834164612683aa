//! Audio source handle

use serde::{Deserialize, Serialize};

/// Fallback duration when the container reports nothing usable
pub const DEFAULT_DURATION_SECS: f32 = 180.0;

/// Opaque reference to an uploaded audio file.
///
/// The engine never reads the bytes behind `uri`; it only forwards the handle
/// to the DSP executor and uses the metadata for estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    /// Stable identifier of the uploaded file
    pub id: String,
    /// Location understood by the DSP executor
    pub uri: String,
    /// Duration reported by the container (seconds)
    pub duration_secs: f32,
    /// Original filename or other free-text hint
    #[serde(default)]
    pub hint: Option<String>,
    /// Encoded bitrate, when known
    #[serde(default)]
    pub bitrate_kbps: Option<u32>,
}

impl AudioSource {
    /// Create a source handle
    pub fn new(id: &str, uri: &str, duration_secs: f32) -> Self {
        Self {
            id: id.to_string(),
            uri: uri.to_string(),
            duration_secs,
            hint: None,
            bitrate_kbps: None,
        }
    }

    /// Attach a filename/text hint
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    /// Attach the encoded bitrate
    pub fn with_bitrate(mut self, kbps: u32) -> Self {
        self.bitrate_kbps = Some(kbps);
        self
    }

    /// Duration if positive and finite, else the 180 s fallback
    pub fn effective_duration(&self) -> f32 {
        if self.duration_secs.is_finite() && self.duration_secs > 0.0 {
            self.duration_secs
        } else {
            DEFAULT_DURATION_SECS
        }
    }

    /// Hint text, empty when absent
    pub fn hint_text(&self) -> &str {
        self.hint.as_deref().unwrap_or("")
    }
}
