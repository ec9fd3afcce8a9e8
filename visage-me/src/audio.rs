//! Audio playback abstractions consumed by the lip sync controller

use crate::error::LipSyncError;
use bytes::Bytes;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

/// Identity of one playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle notifications raised by an audio resource
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEventKind {
    Ended,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEvent {
    pub session: SessionId,
    pub kind: PlaybackEventKind,
}

impl PlaybackEvent {
    pub fn ended(session: SessionId) -> Self {
        Self {
            session,
            kind: PlaybackEventKind::Ended,
        }
    }

    pub fn error(session: SessionId, message: impl Into<String>) -> Self {
        Self {
            session,
            kind: PlaybackEventKind::Error(message.into()),
        }
    }
}

/// Listener handed to an audio resource while it belongs to a session
///
/// Every event it emits is stamped with the session it was attached for.
#[derive(Debug, Clone)]
pub struct PlaybackListener {
    session: SessionId,
    sender: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackListener {
    pub(crate) fn new(session: SessionId, sender: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self { session, sender }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn ended(&self) {
        self.emit(PlaybackEvent::ended(self.session));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(PlaybackEvent::error(self.session, message));
    }

    fn emit(&self, event: PlaybackEvent) {
        if self.sender.send(event).is_err() {
            debug!("Playback event for {} dropped, controller is gone", self.session);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Playing,
    Paused,
    Ended,
}

/// A playable audio resource
pub trait AudioHandle: Send {
    /// Begin playback. Fails on permission or decode problems.
    fn play(&mut self) -> Result<(), LipSyncError>;

    fn stop(&mut self);

    fn state(&self) -> AudioState;

    /// Current playback position in milliseconds
    fn current_time_ms(&self) -> f64;

    /// Total length in milliseconds, if known
    fn duration_ms(&self) -> Option<f64>;

    /// Start delivering ended/error notifications to `listener`
    fn attach(&mut self, listener: PlaybackListener);

    /// Stop delivering notifications; the listener is dropped
    fn detach(&mut self);
}

/// Turns synthesized audio bytes into playable handles
pub trait AudioBackend: Send {
    fn open(&mut self, audio: Bytes) -> Result<Box<dyn AudioHandle>, LipSyncError>;
}
