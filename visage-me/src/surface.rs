//! Morphable surfaces: the rig-side owners of pose weights

use crate::blend::{blend, Smoothing};
use crate::visemes::Viseme;
use std::collections::HashMap;

/// A mesh exposing named morph-target weight slots (head, teeth, ...)
///
/// The renderer owns the weights; the controller only asks for them to move
/// toward a target. Poses the mesh does not define are skipped.
pub trait MorphSurface: Send {
    fn name(&self) -> &str;

    /// Current weight, or `None` if the surface has no such morph target
    fn weight(&self, target: &str) -> Option<f32>;

    /// Write a weight. Returns `false` if the morph target does not exist.
    fn set_weight(&mut self, target: &str, value: f32) -> bool;

    /// Move one weight a blending step toward `goal`
    fn drive(&mut self, target: &str, goal: f32, smoothing: Smoothing) -> Option<f32> {
        let current = self.weight(target)?;
        let next = blend(current, goal, smoothing);
        self.set_weight(target, next);
        Some(next)
    }
}

/// In-memory morph target weights
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTargetTable {
    name: String,
    weights: HashMap<String, f32>,
}

impl MorphTargetTable {
    pub fn new<I, S>(name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            weights: targets.into_iter().map(|t| (t.into(), 0.0)).collect(),
        }
    }

    /// A surface carrying every viseme morph target
    pub fn with_visemes(name: impl Into<String>) -> Self {
        Self::new(name, Viseme::ALL.iter().map(|v| v.morph_target()))
    }

    pub fn targets(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl MorphSurface for MorphTargetTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self, target: &str) -> Option<f32> {
        self.weights.get(target).copied()
    }

    fn set_weight(&mut self, target: &str, value: f32) -> bool {
        match self.weights.get_mut(target) {
            Some(slot) => {
                *slot = value.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_target_is_skipped() {
        let mut teeth = MorphTargetTable::new("Wolf3D_Teeth", ["viseme_AA"]);
        assert_eq!(teeth.weight("viseme_PP"), None);
        assert!(!teeth.set_weight("viseme_PP", 1.0));
        assert_eq!(teeth.drive("viseme_PP", 1.0, Smoothing::Lerp(0.5)), None);
    }

    #[test]
    fn test_drive_blends_toward_goal() {
        let mut head = MorphTargetTable::with_visemes("Wolf3D_Head");
        assert_eq!(head.drive("viseme_AA", 1.0, Smoothing::Lerp(0.5)), Some(0.5));
        assert_eq!(head.drive("viseme_AA", 1.0, Smoothing::Lerp(0.5)), Some(0.75));
        assert_eq!(head.weight("viseme_AA"), Some(0.75));
        assert_eq!(head.drive("viseme_AA", 0.0, Smoothing::Off), Some(0.0));
    }

    #[test]
    fn test_set_weight_clamps() {
        let mut head = MorphTargetTable::with_visemes("Wolf3D_Head");
        head.set_weight("viseme_OW", 1.7);
        assert_eq!(head.weight("viseme_OW"), Some(1.0));
        head.set_weight("viseme_OW", -0.2);
        assert_eq!(head.weight("viseme_OW"), Some(0.0));
    }
}
