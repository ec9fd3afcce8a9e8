//! Phoneme symbol to viseme (mouth shape) lookup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Mouth shapes supported by the avatar rig
///
/// Each variant corresponds to one morph target on the head and teeth meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Viseme {
    PP,
    DD,
    SH,
    IH,
    UH,
    AA,
    AE,
    EH,
    EY,
    OW,
}

impl Viseme {
    pub const ALL: [Viseme; 10] = [
        Viseme::PP,
        Viseme::DD,
        Viseme::SH,
        Viseme::IH,
        Viseme::UH,
        Viseme::AA,
        Viseme::AE,
        Viseme::EH,
        Viseme::EY,
        Viseme::OW,
    ];

    /// Morph target name on the rig
    pub fn morph_target(&self) -> &'static str {
        match self {
            Viseme::PP => "viseme_PP",
            Viseme::DD => "viseme_DD",
            Viseme::SH => "viseme_SH",
            Viseme::IH => "viseme_IH",
            Viseme::UH => "viseme_UH",
            Viseme::AA => "viseme_AA",
            Viseme::AE => "viseme_AE",
            Viseme::EH => "viseme_EH",
            Viseme::EY => "viseme_EY",
            Viseme::OW => "viseme_OW",
        }
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.morph_target())
    }
}

/// Default phoneme table. Symbols are case-sensitive.
pub fn viseme_for(symbol: &str) -> Option<Viseme> {
    match symbol {
        "p" => Some(Viseme::PP),
        "t" => Some(Viseme::DD),
        "S" => Some(Viseme::SH),
        "i" => Some(Viseme::IH),
        "u" => Some(Viseme::UH),
        "a" => Some(Viseme::AA),
        "@" => Some(Viseme::AE),
        "e" => Some(Viseme::EH),
        "E" => Some(Viseme::EY),
        "o" => Some(Viseme::OW),
        _ => None,
    }
}

/// Phoneme table with per-rig overrides layered over the default table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisemeMap {
    overrides: HashMap<String, Viseme>,
}

impl VisemeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, Viseme>) -> Self {
        Self { overrides }
    }

    pub fn lookup(&self, symbol: &str) -> Option<Viseme> {
        self.overrides
            .get(symbol)
            .copied()
            .or_else(|| viseme_for(symbol))
    }
}
