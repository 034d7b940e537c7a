//! Equalizer Configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use trieq_dsp::{BandLayout, MAX_CHANNELS};

use crate::error::{EqError, EqResult};

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqualizerConfig {
    /// Number of interleaved channels (1 = mono, 2 = stereo)
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Corner/centre frequencies and Q of the three bands
    #[serde(default)]
    pub layout: BandLayout,

    /// Capacity of the worker's command queue, in blocks
    #[serde(default = "default_queue_depth")]
    pub worker_queue_depth: usize,
}

fn default_channels() -> u16 {
    1
}

fn default_queue_depth() -> usize {
    32
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            layout: BandLayout::default(),
            worker_queue_depth: default_queue_depth(),
        }
    }
}

impl EqualizerConfig {
    pub fn mono() -> Self {
        Self::default()
    }

    pub fn stereo() -> Self {
        Self {
            channels: 2,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> EqResult<()> {
        if self.channels == 0 || self.channels as usize > MAX_CHANNELS {
            return Err(EqError::Config(format!(
                "Invalid channel count: {}",
                self.channels
            )));
        }
        if self.worker_queue_depth == 0 {
            return Err(EqError::Config("Worker queue depth must be positive".into()));
        }
        self.layout
            .validate()
            .map_err(|e| EqError::Config(format!("Invalid band layout: {}", e)))
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> EqResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> EqResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!("Equalizer config loaded from {:?}", path);
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> EqResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Equalizer config saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EqualizerConfig::default();
        assert_eq!(config.channels, 1);
        assert_eq!(config.worker_queue_depth, 32);
        assert_eq!(config.layout, BandLayout::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let invalid_channels = EqualizerConfig {
            channels: 3,
            ..Default::default()
        };
        assert!(invalid_channels.validate().is_err());

        let invalid_queue = EqualizerConfig {
            worker_queue_depth: 0,
            ..Default::default()
        };
        assert!(invalid_queue.validate().is_err());

        let mut invalid_layout = EqualizerConfig::default();
        invalid_layout.layout.bass.frequency = 0.0;
        assert!(matches!(invalid_layout.validate(), Err(EqError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EqualizerConfig::from_json_str(r#"{ "channels": 2 }"#).unwrap();
        assert_eq!(config.channels, 2);
        assert_eq!(config.worker_queue_depth, 32);
        assert_eq!(config.layout, BandLayout::default());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            EqualizerConfig::from_json_str(r#"{ "channels": 0 }"#),
            Err(EqError::Config(_))
        ));
        assert!(matches!(
            EqualizerConfig::from_json_str("not json"),
            Err(EqError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("trieq-config-{}.json", std::process::id()));
        let mut config = EqualizerConfig::stereo();
        config.layout.mid.frequency = 1500.0;

        config.save(&path).unwrap();
        let loaded = EqualizerConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.layout.mid.frequency, 1500.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EqualizerConfig::load("/nonexistent/trieq/config.json");
        assert!(matches!(result, Err(EqError::Io(_))));
    }
}
