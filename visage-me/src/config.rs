//! Configuration for lip sync playback

use crate::blend::Smoothing;
use crate::visemes::{Viseme, VisemeMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Lip sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSyncConfig {
    /// Blend morph targets toward their goal instead of snapping (default true)
    pub smooth_morph_targets: bool,

    /// Fraction of the remaining gap covered per frame (0.0-1.0 exclusive, default 0.5)
    pub morph_target_smoothing: f32,

    /// Names of the surfaces that carry visemes
    pub surfaces: Vec<String>,

    /// Extra phoneme symbols, or replacements for the default table
    pub phoneme_overrides: HashMap<String, Viseme>,

    /// Cross-fade time for body animation clips, in seconds (default 0.5)
    pub animation_fade_secs: f32,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            smooth_morph_targets: true,
            morph_target_smoothing: 0.5,
            surfaces: vec!["Wolf3D_Head".to_string(), "Wolf3D_Teeth".to_string()],
            phoneme_overrides: HashMap::new(),
            animation_fade_secs: 0.5,
        }
    }
}

impl LipSyncConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.morph_target_smoothing.is_finite()
            || self.morph_target_smoothing <= 0.0
            || self.morph_target_smoothing >= 1.0
        {
            return Err("Morph target smoothing must be between 0.0 and 1.0 (exclusive)".to_string());
        }

        if !self.animation_fade_secs.is_finite() || !(0.0..=10.0).contains(&self.animation_fade_secs) {
            return Err("Animation fade must be between 0 and 10 seconds".to_string());
        }

        for surface in &self.surfaces {
            if surface.is_empty() {
                return Err("Surface name cannot be empty".to_string());
            }
            if surface.len() > 256 {
                return Err("Surface name too long (max 256 chars)".to_string());
            }
        }

        for symbol in self.phoneme_overrides.keys() {
            if symbol.is_empty() {
                return Err("Phoneme override symbol cannot be empty".to_string());
            }
            if symbol.chars().any(|c| c.is_control()) {
                return Err("Phoneme override symbol contains invalid characters".to_string());
            }
        }

        Ok(())
    }

    pub fn smoothing(&self) -> Smoothing {
        if self.smooth_morph_targets {
            Smoothing::Lerp(self.morph_target_smoothing)
        } else {
            Smoothing::Off
        }
    }

    pub fn viseme_map(&self) -> VisemeMap {
        VisemeMap::with_overrides(self.phoneme_overrides.clone())
    }

    pub fn animation_fade(&self) -> Duration {
        Duration::from_secs_f32(self.animation_fade_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LipSyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing(), Smoothing::Lerp(0.5));
        assert_eq!(config.surfaces, vec!["Wolf3D_Head", "Wolf3D_Teeth"]);
        assert_eq!(config.animation_fade(), Duration::from_millis(500));
    }

    #[test]
    fn test_smoothing_disabled() {
        let mut config = LipSyncConfig::default();
        config.smooth_morph_targets = false;
        assert_eq!(config.smoothing(), Smoothing::Off);
    }

    #[test]
    fn test_smoothing_bounds() {
        let mut config = LipSyncConfig::default();
        for bad in [0.0, 1.0, -0.5, 1.5, f32::NAN] {
            config.morph_target_smoothing = bad;
            assert!(config.validate().is_err(), "{} should be rejected", bad);
        }
        config.morph_target_smoothing = 0.99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fade_bounds() {
        let mut config = LipSyncConfig::default();
        config.animation_fade_secs = 0.0;
        assert!(config.validate().is_ok());
        config.animation_fade_secs = 10.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_surface_name_rejected() {
        let mut config = LipSyncConfig::default();
        config.surfaces.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_from_json() {
        let config: LipSyncConfig =
            serde_json::from_str(r#"{"phoneme_overrides": {"k": "DD"}, "smooth_morph_targets": false}"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.viseme_map().lookup("k"), Some(Viseme::DD));
        assert_eq!(config.morph_target_smoothing, 0.5);
    }
}
