//! visage-spk: speech synthesis client for the talking avatar
//!
//! - Synthesis requests against a `/synthesize` backend (audio + speech marks)
//! - Speech mark parsing into viseme markers
//! - Voice catalogue and request validation

pub mod error;
pub mod config;
pub mod speech_marks;
pub mod client;

pub use error::SpeechError;
pub use config::{SpeechConfig, Voice};
pub use speech_marks::parse_speech_marks;
pub use client::{HttpSynthesisClient, SynthesisClient, SynthesisRequest, SynthesisResult};
