//! Error types for visage-me

use visage_core::Error as CoreError;
use thiserror::Error;

/// Lip sync errors
#[derive(Error, Debug)]
pub enum LipSyncError {
    #[error("Audio playback error: {0}")]
    AudioPlayback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<LipSyncError> for CoreError {
    fn from(err: LipSyncError) -> Self {
        match err {
            LipSyncError::Core(inner) => inner,
            LipSyncError::Config(msg) => CoreError::Configuration(msg),
            LipSyncError::AudioPlayback(msg) => CoreError::Playback(msg),
        }
    }
}
