//! Lip sync controller - playback and animation state machine
//!
//! Owns the current playback session, the morph surfaces and the idle/speaking
//! state. Driven once per rendered frame via [`LipSyncController::frame`];
//! audio lifecycle notifications queue up between frames and are applied at
//! the start of the next one.

use crate::audio::{AudioBackend, AudioState, PlaybackEvent, PlaybackEventKind, PlaybackListener, SessionId};
use crate::blend::Smoothing;
use crate::config::LipSyncConfig;
use crate::error::LipSyncError;
use crate::scheduler::active_viseme;
use crate::session::PlaybackSession;
use crate::surface::{MorphSurface, MorphTargetTable};
use crate::visemes::{Viseme, VisemeMap};
use bytes::Bytes;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use visage_core::MarkerSequence;

/// Body animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Speaking,
}

/// Receives animation clip changes (e.g. cross-fading the idle clip back in)
pub trait AnimationDriver: Send {
    fn transition(&mut self, to: AnimationState, fade: Duration);
}

type SessionCallback = Box<dyn FnMut(SessionId) + Send>;
type ErrorCallback = Box<dyn FnMut(SessionId, &LipSyncError) + Send>;

pub struct LipSyncController {
    config: LipSyncConfig,
    smoothing: Smoothing,
    visemes: VisemeMap,
    backend: Box<dyn AudioBackend>,
    surfaces: Vec<Box<dyn MorphSurface>>,
    session: Option<PlaybackSession>,
    state: AnimationState,
    active: Option<Viseme>,
    next_session: u64,
    events_tx: mpsc::UnboundedSender<PlaybackEvent>,
    events_rx: mpsc::UnboundedReceiver<PlaybackEvent>,
    animation: Option<Box<dyn AnimationDriver>>,
    started_observers: Vec<SessionCallback>,
    ended_observers: Vec<SessionCallback>,
    error_observers: Vec<ErrorCallback>,
}

impl LipSyncController {
    /// Create a controller with no surfaces attached
    pub fn new(config: LipSyncConfig, backend: impl AudioBackend + 'static) -> Result<Self, LipSyncError> {
        config.validate().map_err(LipSyncError::Config)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            smoothing: config.smoothing(),
            visemes: config.viseme_map(),
            config,
            backend: Box::new(backend),
            surfaces: Vec::new(),
            session: None,
            state: AnimationState::Idle,
            active: None,
            next_session: 1,
            events_tx,
            events_rx,
            animation: None,
            started_observers: Vec::new(),
            ended_observers: Vec::new(),
            error_observers: Vec::new(),
        })
    }

    /// Attach an in-memory viseme table for every surface named in the config
    pub fn with_configured_surfaces(mut self) -> Self {
        let names = self.config.surfaces.clone();
        for name in names {
            self.add_surface(MorphTargetTable::with_visemes(name));
        }
        self
    }

    pub fn add_surface(&mut self, surface: impl MorphSurface + 'static) {
        debug!("Attaching morph surface '{}'", surface.name());
        self.surfaces.push(Box::new(surface));
    }

    pub fn surface(&self, name: &str) -> Option<&dyn MorphSurface> {
        self.surfaces.iter().find(|s| s.name() == name).map(|s| s.as_ref())
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &dyn MorphSurface> {
        self.surfaces.iter().map(|s| s.as_ref())
    }

    pub fn set_animation_driver(&mut self, driver: impl AnimationDriver + 'static) {
        self.animation = Some(Box::new(driver));
    }

    pub fn on_speaking_started(&mut self, callback: impl FnMut(SessionId) + Send + 'static) {
        self.started_observers.push(Box::new(callback));
    }

    pub fn on_speaking_ended(&mut self, callback: impl FnMut(SessionId) + Send + 'static) {
        self.ended_observers.push(Box::new(callback));
    }

    pub fn on_playback_error(&mut self, callback: impl FnMut(SessionId, &LipSyncError) + Send + 'static) {
        self.error_observers.push(Box::new(callback));
    }

    pub fn config(&self) -> &LipSyncConfig {
        &self.config
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == AnimationState::Speaking
    }

    /// Viseme targeted on the last frame
    pub fn active_viseme(&self) -> Option<Viseme> {
        self.active
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id())
    }

    /// Start speaking new audio, replacing any session in progress
    pub fn start_speaking(&mut self, audio: Bytes, markers: MarkerSequence) -> Result<SessionId, LipSyncError> {
        self.start_speaking_with_duration(audio, markers, None)
    }

    /// Like [`start_speaking`](Self::start_speaking), with the audio length
    /// taken from the synthesis payload rather than the audio resource
    pub fn start_speaking_with_duration(
        &mut self,
        audio: Bytes,
        markers: MarkerSequence,
        duration_ms: Option<f64>,
    ) -> Result<SessionId, LipSyncError> {
        if let Some(duration) = duration_ms {
            if !duration.is_finite() || duration < 0.0 {
                return Err(LipSyncError::Config(format!(
                    "Audio duration must be a finite, non-negative number of milliseconds, got {}",
                    duration
                )));
            }
        }

        // Detach the old session before anything new can emit events
        let superseded = self.session.take().map(|old| {
            let id = old.id();
            old.release();
            debug!("{} superseded", id);
            id
        });

        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.active = None;

        let mut handle = match self.backend.open(audio) {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail_start(id, superseded, e)),
        };

        handle.attach(PlaybackListener::new(id, self.events_tx.clone()));
        if let Err(e) = handle.play() {
            handle.detach();
            handle.stop();
            return Err(self.fail_start(id, superseded, e));
        }

        info!("Speaking started: {} ({} markers)", id, markers.len());
        self.session = Some(PlaybackSession::new(id, handle, markers, duration_ms));
        self.transition(AnimationState::Speaking);
        for callback in self.started_observers.iter_mut() {
            callback(id);
        }

        Ok(id)
    }

    /// Stop the current session, if any
    pub fn stop_speaking(&mut self) {
        if let Some(session) = self.session.take() {
            let id = session.id();
            session.release();
            info!("Speaking stopped: {}", id);
            self.finish(id);
        }
    }

    /// Apply an audio lifecycle notification
    ///
    /// Events for any session other than the current one are dropped.
    pub fn handle_event(&mut self, event: PlaybackEvent) {
        let current = self.current_session();
        if current != Some(event.session) {
            debug!("Discarding stale {:?} from {} (current: {:?})", event.kind, event.session, current);
            return;
        }

        let Some(session) = self.session.take() else {
            return;
        };
        let id = session.id();
        session.release();

        match event.kind {
            PlaybackEventKind::Ended => {
                info!("Speaking ended: {}", id);
            }
            PlaybackEventKind::Error(message) => {
                warn!("Playback failed for {}: {}", id, message);
                let error = LipSyncError::AudioPlayback(message);
                for callback in self.error_observers.iter_mut() {
                    callback(id, &error);
                }
            }
        }
        self.finish(id);
    }

    /// Advance one rendered frame
    ///
    /// Returns the viseme targeted this frame.
    pub fn frame(&mut self) -> Option<Viseme> {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }

        let mut ended = None;
        let target = match &self.session {
            Some(session) => match session.audio_state() {
                AudioState::Playing => active_viseme(
                    &self.visemes,
                    session.markers(),
                    session.current_time_ms(),
                    session.end_ms(),
                ),
                AudioState::Paused => None,
                AudioState::Ended => {
                    ended = Some(session.id());
                    None
                }
            },
            None => None,
        };

        if let Some(id) = ended {
            self.handle_event(PlaybackEvent::ended(id));
        }

        if target != self.active {
            debug!("Viseme {:?} -> {:?}", self.active, target);
        }
        self.active = target;
        self.apply(target);
        target
    }

    /// Snap every viseme weight to zero
    pub fn reset(&mut self) {
        self.active = None;
        for surface in self.surfaces.iter_mut() {
            for viseme in Viseme::ALL {
                surface.set_weight(viseme.morph_target(), 0.0);
            }
        }
    }

    fn apply(&mut self, target: Option<Viseme>) {
        let smoothing = self.smoothing;
        for surface in self.surfaces.iter_mut() {
            for viseme in Viseme::ALL {
                let goal = if target == Some(viseme) { 1.0 } else { 0.0 };
                surface.drive(viseme.morph_target(), goal, smoothing);
            }
        }
    }

    fn fail_start(&mut self, id: SessionId, superseded: Option<SessionId>, error: LipSyncError) -> LipSyncError {
        warn!("Failed to start {}: {}", id, error);
        for callback in self.error_observers.iter_mut() {
            callback(id, &error);
        }
        if let Some(previous) = superseded {
            self.finish(previous);
        }
        error
    }

    fn finish(&mut self, id: SessionId) {
        self.active = None;
        if self.state == AnimationState::Speaking {
            self.transition(AnimationState::Idle);
            for callback in self.ended_observers.iter_mut() {
                callback(id);
            }
        }
    }

    fn transition(&mut self, to: AnimationState) {
        if self.state == to {
            return;
        }
        self.state = to;
        let fade = self.config.animation_fade();
        if let Some(driver) = self.animation.as_mut() {
            driver.transition(to, fade);
        }
    }
}

impl std::fmt::Debug for LipSyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LipSyncController")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("session", &self.session)
            .field("surfaces", &self.surfaces.len())
            .finish()
    }
}
