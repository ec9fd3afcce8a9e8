//! Synthesis client: text in, audio plus viseme markers out

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::speech_marks::parse_speech_marks;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use visage_core::MarkerSequence;

/// Text to speak and the voice to speak it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: Option<String>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: None,
        }
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }
}

/// Playable audio and its viseme markers
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: Bytes,
    pub markers: MarkerSequence,
}

/// Trait for synthesis backends
#[async_trait]
pub trait SynthesisClient: Send + Sync {
    /// Synthesize speech. Failures are returned as-is; nothing is retried.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, SpeechError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    audio: String,
    #[serde(rename = "speechMarks")]
    speech_marks: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for a backend exposing `POST /synthesize`
pub struct HttpSynthesisClient {
    client: Client,
    url: String,
    config: Arc<SpeechConfig>,
}

impl HttpSynthesisClient {
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}/synthesize", config.endpoint.trim_end_matches('/')),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Trimmed text and resolved voice for a request
    pub fn prepare<'a>(&'a self, request: &'a SynthesisRequest) -> Result<(&'a str, &'a str), SpeechError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(SpeechError::InvalidRequest("Please enter some text.".to_string()));
        }

        let len = text.chars().count();
        if len > self.config.max_text_len {
            return Err(SpeechError::InvalidRequest(format!(
                "Text too long ({} chars, max {})",
                len, self.config.max_text_len
            )));
        }

        let voice = self.config.resolve_voice(request.voice_id.as_deref());
        Ok((text, voice))
    }
}

#[async_trait]
impl SynthesisClient for HttpSynthesisClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, SpeechError> {
        let (text, voice) = self.prepare(request)?;
        debug!("Requesting synthesis of {} chars with voice {}", text.len(), voice);

        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text, "voiceId": voice }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Synthesis backend returned {}: {}", status, message);
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Api {
                status: status.as_u16(),
                message: format!("Unexpected response body: {}", e),
            })?;

        let audio = STANDARD
            .decode(body.audio.trim())
            .map_err(|e| SpeechError::Decode(format!("Invalid base64 audio: {}", e)))?;
        let markers = parse_speech_marks(&body.speech_marks)?;

        info!("Synthesized {} bytes of audio, {} markers", audio.len(), markers.len());
        Ok(SynthesisResult {
            audio: Bytes::from(audio),
            markers,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
