//! visage-core: shared types for the visage lip-sync workspace
//!
//! - Error and Result types shared by every crate
//! - Phoneme marker model (`Marker`, `MarkerSequence`)
//! - Config file loading (TOML, YAML, JSON)

pub mod error;
pub mod marker;
pub mod config;

pub use error::{Error, Result};
pub use marker::{Marker, MarkerSequence};
pub use config::load_config;
