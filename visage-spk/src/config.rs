//! Configuration for the speech synthesis client

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Speech synthesis client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of the synthesis backend (serves `POST /synthesize`)
    pub endpoint: String,

    /// Request timeout in seconds (1-300, default 30)
    pub timeout_secs: u64,

    /// Voice used when a request names none, or an unknown one
    pub default_voice: String,

    /// Voices offered to the user
    pub voices: Vec<Voice>,

    /// Maximum text length in characters (default 3000)
    pub max_text_len: usize,
}

/// A selectable synthesis voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Provider voice identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub fn default_voices() -> Vec<Voice> {
    vec![
        Voice::new("Matthew", "Matthew (Male, US English)"),
        Voice::new("Joanna", "Joanna (Female, US English)"),
        Voice::new("Salli", "Salli (Female, US English)"),
        Voice::new("Brian", "Brian (Male, British English)"),
        Voice::new("Emma", "Emma (Female, British English)"),
        Voice::new("Raveena", "Raveena (Female, Indian English)"),
    ]
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001".to_string(),
            timeout_secs: 30,
            default_voice: "Matthew".to_string(),
            voices: default_voices(),
            max_text_len: 3000,
        }
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.endpoint).map_err(|e| format!("Invalid endpoint URL: {}", e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!("Endpoint must use http or https, got '{}'", url.scheme()));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err("Timeout must be between 1 and 300 seconds".to_string());
        }

        if self.max_text_len == 0 || self.max_text_len > 100_000 {
            return Err("Max text length must be between 1 and 100000".to_string());
        }

        if self.voices.is_empty() {
            return Err("At least one voice must be configured".to_string());
        }

        for voice in &self.voices {
            if voice.id.is_empty() || voice.id.len() > 64 {
                return Err("Voice id must be 1-64 chars".to_string());
            }
            if voice.id.chars().any(|c| c.is_control() || c.is_whitespace()) {
                return Err(format!("Voice id '{}' contains invalid characters", voice.id));
            }
        }

        if self.voice(&self.default_voice).is_none() {
            return Err(format!("Default voice '{}' is not in the voice list", self.default_voice));
        }

        Ok(())
    }

    pub fn voice(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id == id)
    }

    /// The requested voice if known, otherwise the default voice
    pub fn resolve_voice<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(id) if self.voice(id).is_some() => id,
            Some(id) => {
                warn!("Unknown voice '{}', using '{}'", id, self.default_voice);
                &self.default_voice
            }
            None => &self.default_voice,
        }
    }
}
