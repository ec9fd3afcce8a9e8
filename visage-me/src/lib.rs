//! visage-me: viseme lip sync for a talking 3D avatar
//!
//! Turns synthesized speech (audio plus timestamped phoneme markers) into
//! smoothly blended mouth-shape weights:
//! - Phoneme to viseme lookup with configurable overrides
//! - Per-frame exponential blending of morph target weights
//! - Viseme scheduling against the audio playback position
//! - Idle/speaking state machine with session-guarded audio events

pub mod error;
pub mod config;
pub mod visemes;
pub mod blend;
pub mod scheduler;
pub mod surface;
pub mod audio;
pub mod session;
pub mod controller;
pub mod simulated;

pub use error::LipSyncError;
pub use config::LipSyncConfig;
pub use visemes::{viseme_for, Viseme, VisemeMap};
pub use blend::{blend, Smoothing};
pub use scheduler::{active_marker, active_viseme};
pub use surface::{MorphSurface, MorphTargetTable};
pub use audio::{AudioBackend, AudioHandle, AudioState, PlaybackEvent, PlaybackEventKind, PlaybackListener, SessionId};
pub use session::PlaybackSession;
pub use controller::{AnimationDriver, AnimationState, LipSyncController};
pub use simulated::{SimulatedAudioBackend, SimulatedTrack};
