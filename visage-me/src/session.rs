//! A single playback of synthesized speech

use crate::audio::{AudioHandle, AudioState, SessionId};
use visage_core::MarkerSequence;

/// Audio plus the markers that drive the face while it plays
///
/// Owned by the controller; replaced wholesale when new speech arrives.
pub struct PlaybackSession {
    id: SessionId,
    audio: Box<dyn AudioHandle>,
    markers: MarkerSequence,
    duration_ms: Option<f64>,
}

impl PlaybackSession {
    pub(crate) fn new(
        id: SessionId,
        audio: Box<dyn AudioHandle>,
        markers: MarkerSequence,
        duration_ms: Option<f64>,
    ) -> Self {
        Self {
            id,
            audio,
            markers,
            duration_ms,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn markers(&self) -> &MarkerSequence {
        &self.markers
    }

    pub fn current_time_ms(&self) -> f64 {
        self.audio.current_time_ms()
    }

    pub fn audio_state(&self) -> AudioState {
        self.audio.state()
    }

    /// End of the last marker's interval: the payload's duration when it
    /// carried one, otherwise whatever the audio resource reports
    pub fn end_ms(&self) -> Option<f64> {
        self.duration_ms.or_else(|| self.audio.duration_ms())
    }

    /// Detach the listener and stop the audio
    pub(crate) fn release(mut self) {
        self.audio.detach();
        self.audio.stop();
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("markers", &self.markers.len())
            .field("duration_ms", &self.duration_ms)
            .finish()
    }
}
