//! Language-model backed collaborators
//!
//! Adapts any [`TextModel`] into a [`GenreClassifier`] and a
//! [`CommandParser`]. Prompts constrain the reply; the decoders enforce it.

use crate::collab::{CommandParser, GenreClassifier};
use crate::command::decode_parser_reply;
use crate::error::CollaboratorError;
use async_trait::async_trait;
use sb_master::{Genre, RevisionCommand};
use std::sync::Arc;

/// Single-turn text completion
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Complete `prompt` under `system` instructions
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CollaboratorError>;
}

const PARSER_SYSTEM: &str = "You are an audio engineering parser. Return only valid JSON.";

const CLASSIFIER_SYSTEM: &str = "You are a music genre classifier. Reply with one word.";

/// Revision parser prompt for one user request
pub fn parser_prompt(request: &str) -> String {
    format!(
        r#"Parse this audio command into structured data.

Command: "{request}"

Respond with ONLY a JSON object with this structure:
{{
  "type": "frequency_boost" | "frequency_cut" | "volume" | "brightness" | "bass" | "compression" | "unknown",
  "frequency": number (in Hz, if applicable),
  "db": number (dB change, if applicable),
  "value": number (0-1 for level adjustments),
  "description": "user-friendly description of what will be done"
}}

Examples:
- "increase 2khz by 3db" -> {{"type":"frequency_boost","frequency":2000,"db":3,"description":"Boost 2kHz by +3dB"}}
- "cut low end" -> {{"type":"frequency_cut","frequency":100,"db":-2,"description":"Cut low frequencies around 100Hz"}}
- "boost bass" -> {{"type":"bass","value":0.7,"description":"Increase bass levels"}}"#
    )
}

/// Classifier prompt listing the allowed labels
pub fn classifier_prompt(text: &str) -> String {
    let labels: Vec<&str> = Genre::ALL.iter().map(|g| g.label()).collect();
    format!(
        "Classify the music genre of this track from its name: \"{}\".\nAnswer with exactly one of: {}.",
        text,
        labels.join(", ")
    )
}

/// Command parser on top of a text model
pub struct ModelCommandParser {
    model: Arc<dyn TextModel>,
}

impl ModelCommandParser {
    /// Wrap a model
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl CommandParser for ModelCommandParser {
    async fn parse(&self, text: &str) -> Result<RevisionCommand, CollaboratorError> {
        let reply = self.model.complete(PARSER_SYSTEM, &parser_prompt(text)).await?;
        Ok(decode_parser_reply(&reply))
    }
}

/// Genre classifier on top of a text model
pub struct ModelGenreClassifier {
    model: Arc<dyn TextModel>,
}

impl ModelGenreClassifier {
    /// Wrap a model
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl GenreClassifier for ModelGenreClassifier {
    async fn classify(&self, text: &str) -> Result<String, CollaboratorError> {
        let reply = self
            .model
            .complete(CLASSIFIER_SYSTEM, &classifier_prompt(text))
            .await?;
        Ok(reply.trim().to_string())
    }
}
