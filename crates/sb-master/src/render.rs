//! Render requests for the external DSP executor

use crate::chain::FilterChainSpec;
use crate::source::AudioSource;
use serde::{Deserialize, Serialize};

/// Output sample rate for every render
pub const OUTPUT_SAMPLE_RATE: u32 = 44_100;

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "lowercase")]
pub enum OutputFormat {
    /// MP3 via LAME
    Mp3 {
        /// Constant bitrate (kbps)
        bitrate_kbps: u32,
    },
    /// 16-bit PCM WAV
    Wav,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Mp3 { bitrate_kbps: 256 }
    }
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 { .. } => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

/// Everything the executor needs for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Audio to process (always the original upload)
    pub source: AudioSource,
    /// Chain to apply
    pub chain: FilterChainSpec,
    /// Encoding
    pub format: OutputFormat,
}

impl RenderRequest {
    /// Create request
    pub fn new(source: AudioSource, chain: FilterChainSpec, format: OutputFormat) -> Self {
        Self {
            source,
            chain,
            format,
        }
    }

    /// FFmpeg argument vector writing to `output`
    pub fn ffmpeg_args(&self, output: &str) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-i".into(),
            self.source.uri.clone(),
            "-af".into(),
            self.chain.to_ffmpeg_filter(),
            "-ar".into(),
            OUTPUT_SAMPLE_RATE.to_string(),
            "-ac".into(),
            "2".into(),
        ];

        match self.format {
            OutputFormat::Mp3 { bitrate_kbps } => {
                args.extend(["-c:a".into(), "libmp3lame".into()]);
                args.extend(["-b:a".into(), format!("{bitrate_kbps}k")]);
            }
            OutputFormat::Wav => {
                args.extend(["-c:a".into(), "pcm_s16le".into()]);
            }
        }

        args.push(output.to_string());
        args
    }

    /// Expected wall-clock processing time (seconds)
    pub fn estimate_processing_secs(&self) -> u32 {
        estimate_processing_secs(self.source.effective_duration())
    }
}

/// Roughly 1.5x real time
pub fn estimate_processing_secs(duration_secs: f32) -> u32 {
    (duration_secs.max(0.0) * 1.5).ceil() as u32
}
