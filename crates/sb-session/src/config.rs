//! Session configuration

use crate::error::{SessionError, SessionResult};
use sb_master::{EngineConfig, OutputFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session configuration: engine tuning, collaborator deadlines, output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Engine tuning
    pub engine: EngineConfig,

    /// Genre classifier deadline (ms)
    pub classifier_timeout_ms: u64,

    /// Command parser deadline (ms)
    pub parser_timeout_ms: u64,

    /// DSP executor deadline (ms)
    pub executor_timeout_ms: u64,

    /// External mix reviewer deadline (ms)
    pub reviewer_timeout_ms: u64,

    /// Render format
    pub output_format: OutputFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            classifier_timeout_ms: 5_000,
            parser_timeout_ms: 10_000,
            executor_timeout_ms: 300_000,
            reviewer_timeout_ms: 15_000,
            output_format: OutputFormat::default(),
        }
    }
}

impl SessionConfig {
    /// Set engine tuning
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set render format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set every collaborator deadline at once
    pub fn with_timeouts_ms(mut self, classifier: u64, parser: u64, executor: u64, reviewer: u64) -> Self {
        self.classifier_timeout_ms = classifier;
        self.parser_timeout_ms = parser;
        self.executor_timeout_ms = executor;
        self.reviewer_timeout_ms = reviewer;
        self
    }

    /// Classifier deadline
    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    /// Parser deadline
    pub fn parser_timeout(&self) -> Duration {
        Duration::from_millis(self.parser_timeout_ms)
    }

    /// Executor deadline
    pub fn executor_timeout(&self) -> Duration {
        Duration::from_millis(self.executor_timeout_ms)
    }

    /// Reviewer deadline
    pub fn reviewer_timeout(&self) -> Duration {
        Duration::from_millis(self.reviewer_timeout_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> SessionResult<()> {
        self.engine.validate()?;

        let timeouts = [
            self.classifier_timeout_ms,
            self.parser_timeout_ms,
            self.executor_timeout_ms,
            self.reviewer_timeout_ms,
        ];
        if timeouts.contains(&0) {
            return Err(SessionError::InvalidConfig("timeouts must be > 0 ms".into()));
        }
        if let OutputFormat::Mp3 { bitrate_kbps } = self.output_format {
            if !(32..=320).contains(&bitrate_kbps) {
                return Err(SessionError::InvalidConfig(format!(
                    "MP3 bitrate {} kbps outside 32..=320",
                    bitrate_kbps
                )));
            }
        }
        Ok(())
    }

    /// Load and validate from JSON
    pub fn from_json(json: &str) -> SessionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to pretty JSON
    pub fn to_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = SessionConfig::from_json(
            r#"{"parser_timeout_ms": 250, "output_format": {"codec": "wav"}, "engine": {"reference_seed": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.parser_timeout(), Duration::from_millis(250));
        assert_eq!(config.output_format, OutputFormat::Wav);
        assert_eq!(config.engine.reference_seed, Some(3));
        assert_eq!(config.executor_timeout_ms, 300_000);
    }

    #[test]
    fn test_rejects_zero_timeout_and_bad_bitrate() {
        assert!(SessionConfig::from_json(r#"{"classifier_timeout_ms": 0}"#).is_err());
        assert!(
            SessionConfig::from_json(r#"{"output_format": {"codec": "mp3", "bitrate_kbps": 1000}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_engine_errors_surface() {
        let err = SessionConfig::from_json(r#"{"engine": {"tempo": {"samples": 0}}}"#).unwrap_err();
        assert!(matches!(err, SessionError::Master(_)));
    }

    #[test]
    fn test_roundtrip() {
        let config = SessionConfig::default().with_output_format(OutputFormat::Wav);
        assert_eq!(SessionConfig::from_json(&config.to_json().unwrap()).unwrap(), config);
    }
}
