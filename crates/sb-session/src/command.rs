//! Decoding of command-parser replies
//!
//! Language-model parsers answer with a JSON object such as
//! `{"type":"frequency_boost","frequency":2000,"db":3,"description":"..."}`,
//! sometimes wrapped in Markdown fences. Decoding never fails: anything
//! unusable becomes [`RevisionCommand::Unknown`].

use sb_master::RevisionCommand;
use serde::Deserialize;

/// Reason given when a reply cannot be used
pub const NOT_UNDERSTOOD: &str =
    "Could not understand the command. Try being more specific like \"boost 2kHz by 3dB\"";

/// Frequency assumed when a boost/cut names none (mid band)
pub const DEFAULT_BAND_HZ: f32 = 1000.0;

#[derive(Debug, Deserialize)]
struct ParserReply {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    frequency: Option<f32>,
    #[serde(default)]
    db: Option<f32>,
    #[serde(default)]
    value: Option<f32>,
    #[serde(default)]
    description: Option<String>,
}

/// Remove Markdown code fences around a reply
pub fn strip_code_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json") up to the first newline
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest.trim_start_matches("json"),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn unknown(reason: impl Into<String>) -> RevisionCommand {
    RevisionCommand::Unknown {
        reason: reason.into(),
    }
}

/// Decode a parser reply into a command
pub fn decode_parser_reply(reply: &str) -> RevisionCommand {
    let body = strip_code_fences(reply);
    if body.is_empty() {
        log::debug!("Empty parser reply");
        return unknown(NOT_UNDERSTOOD);
    }

    let parsed: ParserReply = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!("Unparseable parser reply: {}", e);
            return unknown(NOT_UNDERSTOOD);
        }
    };

    let frequency_hz = parsed.frequency.unwrap_or(DEFAULT_BAND_HZ);
    let db = parsed.db.unwrap_or(0.0);
    let set = |make: fn(f32) -> RevisionCommand| match parsed.value {
        Some(value) if value.is_finite() => make(value),
        _ => unknown(format!("No value given for '{}'", parsed.kind)),
    };

    match parsed.kind.as_str() {
        "frequency_boost" => RevisionCommand::FrequencyBoost { frequency_hz, db },
        "frequency_cut" => RevisionCommand::FrequencyCut { frequency_hz, db },
        "volume" => set(|value| RevisionCommand::Volume { value }),
        "brightness" => set(|value| RevisionCommand::Brightness { value }),
        "bass" => set(|value| RevisionCommand::Bass { value }),
        "compression" => set(|value| RevisionCommand::Compression { value }),
        "unknown" => unknown(
            parsed
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| NOT_UNDERSTOOD.to_string()),
        ),
        other => unknown(format!("Unsupported command type '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reply() {
        let cmd = decode_parser_reply(
            r#"{"type":"frequency_boost","frequency":2000,"db":3,"description":"Boost 2kHz by +3dB"}"#,
        );
        assert_eq!(
            cmd,
            RevisionCommand::FrequencyBoost {
                frequency_hz: 2000.0,
                db: 3.0
            }
        );
    }

    #[test]
    fn test_fenced_reply() {
        let reply = "```json\n{\"type\":\"bass\",\"value\":0.7,\"description\":\"Increase bass\"}\n```";
        assert_eq!(decode_parser_reply(reply), RevisionCommand::Bass { value: 0.7 });

        let bare = "```{\"type\":\"volume\",\"value\":0.9}```";
        assert_eq!(decode_parser_reply(bare), RevisionCommand::Volume { value: 0.9 });
    }

    #[test]
    fn test_missing_frequency_routes_to_mid() {
        let cmd = decode_parser_reply(r#"{"type":"frequency_cut","db":-2}"#);
        assert_eq!(
            cmd,
            RevisionCommand::FrequencyCut {
                frequency_hz: DEFAULT_BAND_HZ,
                db: -2.0
            }
        );
        assert_eq!(
            RevisionCommand::band_for(DEFAULT_BAND_HZ),
            sb_master::ParamField::MidRange
        );
    }

    #[test]
    fn test_unusable_replies_become_unknown() {
        for reply in ["", "   ", "```json\n```", "sure! here you go", "{\"type\": 5}"] {
            assert_eq!(
                decode_parser_reply(reply),
                RevisionCommand::Unknown {
                    reason: NOT_UNDERSTOOD.to_string()
                },
                "{reply:?}"
            );
        }
        assert!(matches!(
            decode_parser_reply(r#"{"type":"reverb","value":0.5}"#),
            RevisionCommand::Unknown { .. }
        ));
        assert!(matches!(
            decode_parser_reply(r#"{"type":"bass"}"#),
            RevisionCommand::Unknown { .. }
        ));
    }

    #[test]
    fn test_unknown_keeps_description() {
        let cmd = decode_parser_reply(r#"{"type":"unknown","description":"Not an audio request"}"#);
        assert_eq!(
            cmd,
            RevisionCommand::Unknown {
                reason: "Not an audio request".into()
            }
        );
    }
}
