//! CLI configuration file

use serde::{Deserialize, Serialize};
use std::path::Path;
use visage_me::LipSyncConfig;
use visage_spk::SpeechConfig;

/// Combined configuration read from `--config`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub lipsync: LipSyncConfig,
    pub speech: SpeechConfig,
}

impl CliConfig {
    /// Load from a TOML, YAML or JSON file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => visage_core::load_config(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.lipsync
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid lipsync config: {}", e))?;
        self.speech
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid speech config: {}", e))?;
        Ok(())
    }
}
