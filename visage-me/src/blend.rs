//! Per-frame weight smoothing

/// How a weight moves toward its target each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Jump straight to the target
    Off,
    /// Exponential approach: cover this fraction of the remaining gap per frame.
    /// Expected in (0, 1).
    Lerp(f32),
}

impl Smoothing {
    pub fn apply(self, current: f32, target: f32) -> f32 {
        blend(current, target, self)
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Lerp(0.5)
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// One blending step from `current` toward `target`
pub fn blend(current: f32, target: f32, smoothing: Smoothing) -> f32 {
    match smoothing {
        Smoothing::Off => target,
        Smoothing::Lerp(factor) => lerp(current, target, factor),
    }
}
