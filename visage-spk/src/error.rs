//! Error types for visage-spk

use visage_core::Error as CoreError;
use thiserror::Error;

/// Speech synthesis client errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed speech marks at line {line}: {reason}")]
    MalformedMarks { line: usize, reason: String },

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Network(err.to_string())
    }
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Core(inner) => inner,
            SpeechError::Config(msg) => CoreError::Configuration(msg),
            other => CoreError::Synthesis(other.to_string()),
        }
    }
}
