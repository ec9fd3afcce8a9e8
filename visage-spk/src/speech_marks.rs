//! Speech mark parsing
//!
//! Providers return one JSON object per line, e.g.
//! `{"time":125,"type":"viseme","value":"p"}`. Only viseme marks are kept.

use crate::error::SpeechError;
use serde::Deserialize;
use tracing::debug;
use visage_core::{Marker, MarkerSequence};

#[derive(Debug, Deserialize)]
struct SpeechMark {
    time: u64,
    #[serde(rename = "type")]
    kind: Option<String>,
    value: String,
}

/// Parse newline-separated speech marks into a marker sequence
///
/// Blank lines and non-viseme marks (word, sentence, ssml) are skipped. Out
/// of order timestamps degrade to an empty sequence rather than an error.
pub fn parse_speech_marks(text: &str) -> Result<MarkerSequence, SpeechError> {
    let mut markers = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mark: SpeechMark = serde_json::from_str(line).map_err(|e| SpeechError::MalformedMarks {
            line: idx + 1,
            reason: e.to_string(),
        })?;

        match mark.kind.as_deref() {
            None | Some("viseme") => markers.push(Marker::new(mark.time, mark.value)),
            Some(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} non-viseme speech marks", skipped);
    }

    Ok(MarkerSequence::lenient(markers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viseme_lines() {
        let text = "{\"time\":0,\"type\":\"viseme\",\"value\":\"sil\"}\n\
                    {\"time\":125,\"type\":\"viseme\",\"value\":\"p\"}\n\
                    {\"time\":187,\"type\":\"viseme\",\"value\":\"a\"}\n";
        let markers = parse_speech_marks(text).unwrap();
        assert_eq!(markers.len(), 3);
        assert_eq!(markers.get(1).unwrap(), &Marker::new(125, "p"));
    }

    #[test]
    fn test_skips_blank_and_word_marks() {
        let text = "\n{\"time\":6,\"type\":\"word\",\"start\":0,\"end\":9,\"value\":\"Financial\"}\n\
                    \n{\"time\":6,\"type\":\"viseme\",\"value\":\"f\"}\n  \n";
        let markers = parse_speech_marks(text).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.first().unwrap().symbol, "f");
    }

    #[test]
    fn test_missing_type_is_viseme() {
        let markers = parse_speech_marks("{\"time\":10,\"value\":\"o\"}").unwrap();
        assert_eq!(markers.first().unwrap(), &Marker::new(10, "o"));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let text = "{\"time\":0,\"value\":\"a\"}\n{\"time\":\"soon\",\"value\":\"p\"}";
        match parse_speech_marks(text) {
            Err(SpeechError::MalformedMarks { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed marks, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_order_degrades_to_empty() {
        let text = "{\"time\":300,\"value\":\"a\"}\n{\"time\":100,\"value\":\"p\"}";
        let markers = parse_speech_marks(text).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_speech_marks("").unwrap().is_empty());
        assert!(parse_speech_marks("\n\n").unwrap().is_empty());
    }
}
