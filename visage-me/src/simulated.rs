//! Clock-driven audio backend that produces no sound
//!
//! Used by the CLI to preview lip sync and by tests to script playback. The
//! backend is cheap to clone; clones share the list of opened tracks so a
//! caller can keep one clone and steer the tracks the controller plays.

use crate::audio::{AudioBackend, AudioHandle, AudioState, PlaybackListener};
use crate::error::LipSyncError;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
struct TrackState {
    position_ms: f64,
    duration_ms: Option<f64>,
    state: AudioState,
    started: bool,
    listener: Option<PlaybackListener>,
    play_error: Option<String>,
    size_bytes: usize,
}

/// Control handle for one simulated track
#[derive(Debug, Clone)]
pub struct SimulatedTrack {
    inner: Arc<Mutex<TrackState>>,
}

impl SimulatedTrack {
    fn new(duration_ms: Option<f64>, play_error: Option<String>, size_bytes: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TrackState {
                position_ms: 0.0,
                duration_ms,
                state: AudioState::Paused,
                started: false,
                listener: None,
                play_error,
                size_bytes,
            })),
        }
    }

    /// Move the playhead forward if playing. Reaching the duration ends the
    /// track and notifies the attached listener.
    pub fn advance(&self, elapsed_ms: f64) {
        let mut track = self.inner.lock();
        if track.state != AudioState::Playing {
            return;
        }
        track.position_ms += elapsed_ms.max(0.0);
        if let Some(duration) = track.duration_ms {
            if track.position_ms >= duration {
                track.position_ms = duration;
                track.state = AudioState::Ended;
                if let Some(listener) = &track.listener {
                    listener.ended();
                }
            }
        }
    }

    /// Jump the playhead without changing the play state
    pub fn seek(&self, position_ms: f64) {
        self.inner.lock().position_ms = position_ms.max(0.0);
    }

    pub fn pause(&self) {
        let mut track = self.inner.lock();
        if track.state == AudioState::Playing {
            track.state = AudioState::Paused;
        }
    }

    pub fn resume(&self) {
        let mut track = self.inner.lock();
        if track.started && track.state == AudioState::Paused {
            track.state = AudioState::Playing;
        }
    }

    /// Simulate a decode failure mid-playback
    pub fn fail(&self, message: &str) {
        let mut track = self.inner.lock();
        track.state = AudioState::Ended;
        if let Some(listener) = &track.listener {
            listener.error(message);
        }
    }

    /// Emit an ended notification without touching the playhead, the way a
    /// late callback would
    pub fn emit_ended(&self) {
        if let Some(listener) = &self.inner.lock().listener {
            listener.ended();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lock().listener.is_some()
    }

    pub fn position_ms(&self) -> f64 {
        self.inner.lock().position_ms
    }

    pub fn state(&self) -> AudioState {
        self.inner.lock().state
    }

    pub fn size_bytes(&self) -> usize {
        self.inner.lock().size_bytes
    }
}

/// `AudioHandle` view of a simulated track
#[derive(Debug)]
pub struct SimulatedAudio {
    track: SimulatedTrack,
}

impl AudioHandle for SimulatedAudio {
    fn play(&mut self) -> Result<(), LipSyncError> {
        let mut track = self.track.inner.lock();
        if let Some(message) = track.play_error.take() {
            return Err(LipSyncError::AudioPlayback(message));
        }
        track.started = true;
        track.state = AudioState::Playing;
        Ok(())
    }

    fn stop(&mut self) {
        self.track.inner.lock().state = AudioState::Ended;
    }

    fn state(&self) -> AudioState {
        self.track.state()
    }

    fn current_time_ms(&self) -> f64 {
        self.track.position_ms()
    }

    fn duration_ms(&self) -> Option<f64> {
        self.track.inner.lock().duration_ms
    }

    fn attach(&mut self, listener: PlaybackListener) {
        self.track.inner.lock().listener = Some(listener);
    }

    fn detach(&mut self) {
        self.track.inner.lock().listener = None;
    }
}

#[derive(Debug, Default)]
struct BackendState {
    duration_ms: Option<f64>,
    fail_next: Option<String>,
    tracks: Vec<SimulatedTrack>,
}

/// Backend handing out `SimulatedAudio` handles
#[derive(Debug, Clone, Default)]
pub struct SimulatedAudioBackend {
    inner: Arc<Mutex<BackendState>>,
}

impl SimulatedAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration reported by tracks opened from now on
    pub fn with_duration(self, duration_ms: f64) -> Self {
        self.set_duration(Some(duration_ms));
        self
    }

    pub fn set_duration(&self, duration_ms: Option<f64>) {
        self.inner.lock().duration_ms = duration_ms;
    }

    /// Make the next opened track refuse to play
    pub fn fail_next_play(&self, message: impl Into<String>) {
        self.inner.lock().fail_next = Some(message.into());
    }

    pub fn tracks(&self) -> Vec<SimulatedTrack> {
        self.inner.lock().tracks.clone()
    }

    pub fn last_track(&self) -> Option<SimulatedTrack> {
        self.inner.lock().tracks.last().cloned()
    }
}

impl AudioBackend for SimulatedAudioBackend {
    fn open(&mut self, audio: Bytes) -> Result<Box<dyn AudioHandle>, LipSyncError> {
        let mut backend = self.inner.lock();
        let fail = backend.fail_next.take();
        let track = SimulatedTrack::new(backend.duration_ms, fail, audio.len());
        backend.tracks.push(track.clone());
        Ok(Box::new(SimulatedAudio { track }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackEvent, SessionId};
    use tokio::sync::mpsc;

    #[test]
    fn test_track_ends_at_duration() {
        let mut backend = SimulatedAudioBackend::new().with_duration(300.0);
        let mut handle = backend.open(Bytes::from_static(b"mp3")).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.attach(PlaybackListener::new(SessionId(7), tx));
        handle.play().unwrap();

        let track = backend.last_track().unwrap();
        track.advance(200.0);
        assert_eq!(handle.state(), AudioState::Playing);
        assert_eq!(handle.current_time_ms(), 200.0);
        assert!(rx.try_recv().is_err());

        track.advance(200.0);
        assert_eq!(handle.state(), AudioState::Ended);
        assert_eq!(handle.current_time_ms(), 300.0);
        assert_eq!(rx.try_recv().unwrap(), PlaybackEvent::ended(SessionId(7)));
    }

    #[test]
    fn test_paused_track_does_not_advance() {
        let mut backend = SimulatedAudioBackend::new();
        let mut handle = backend.open(Bytes::new()).unwrap();
        handle.play().unwrap();
        let track = backend.last_track().unwrap();
        track.pause();
        track.advance(100.0);
        assert_eq!(handle.current_time_ms(), 0.0);
        track.resume();
        track.advance(100.0);
        assert_eq!(handle.current_time_ms(), 100.0);
    }

    #[test]
    fn test_fail_next_play() {
        let mut backend = SimulatedAudioBackend::new();
        backend.fail_next_play("codec");
        let mut first = backend.open(Bytes::new()).unwrap();
        let mut second = backend.open(Bytes::new()).unwrap();
        assert!(matches!(first.play(), Err(LipSyncError::AudioPlayback(m)) if m == "codec"));
        assert!(second.play().is_ok());
    }

    #[test]
    fn test_detach_drops_listener() {
        let mut backend = SimulatedAudioBackend::new();
        let mut handle = backend.open(Bytes::new()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.attach(PlaybackListener::new(SessionId(1), tx));
        let track = backend.last_track().unwrap();
        assert!(track.is_attached());
        handle.detach();
        assert!(!track.is_attached());
        track.emit_ended();
        assert!(rx.try_recv().is_err());
    }
}
