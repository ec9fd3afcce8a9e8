// Config file loading shared by the visage crates

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Supported config file formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "toml" => Ok(ConfigFormat::Toml),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            other => Err(Error::Configuration(format!(
                "Unsupported config file extension '{}' for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Parse config text in the given format
pub fn parse_config<T: DeserializeOwned>(text: &str, format: ConfigFormat) -> Result<T> {
    match format {
        ConfigFormat::Toml => toml::from_str(text).map_err(|e| Error::Serialization(e.to_string())),
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| Error::Serialization(e.to_string())),
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string())),
    }
}

/// Load a config file (TOML, YAML or JSON by extension)
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    debug!("Loading {:?} config from {}", format, path.display());
    parse_config(&text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        rate: f32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                rate: 0.5,
            }
        }
    }

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(".toml", "name = \"head\"\nrate = 0.25\n");
        let sample: Sample = load_config(file.path()).unwrap();
        assert_eq!(sample, Sample { name: "head".to_string(), rate: 0.25 });
    }

    #[test]
    fn test_load_yaml_with_defaults() {
        let file = write_temp(".yml", "name: teeth\n");
        let sample: Sample = load_config(file.path()).unwrap();
        assert_eq!(sample.name, "teeth");
        assert_eq!(sample.rate, 0.5);
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"rate": 0.75}"#);
        let sample: Sample = load_config(file.path()).unwrap();
        assert_eq!(sample.name, "default");
        assert_eq!(sample.rate, 0.75);
    }

    #[test]
    fn test_unknown_extension() {
        let file = write_temp(".ini", "rate=1");
        let err = load_config::<Sample>(file.path()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_invalid_content() {
        let file = write_temp(".toml", "rate = [");
        let err = load_config::<Sample>(file.path()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
