use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Malformed marker sequence: {0}")]
    MalformedMarkers(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),
}

pub type Result<T> = std::result::Result<T, Error>;
