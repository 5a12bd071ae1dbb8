// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration.
//!
//! Defaults reproduce the stock scene: a 10 second loop, six preview
//! backgrounds, a 60° perspective camera and the three-light rig.
//! Configs are stored as RON.

use crate::background::DEFAULT_PREVIEW_LIMIT;
use crate::camera::CameraConfig;
use crate::error::{ConfigError, Result};
use crate::lighting::LightingConfig;
use nebula_editor_sequencer::{DEFAULT_CYCLE_LENGTH, DEFAULT_PROPERTY_PATH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings the engine is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds before the playhead wraps to zero
    pub cycle_length: f64,
    /// Backgrounds the renderer draws
    pub preview_limit: usize,
    /// Property targeted by auto-animated keyframes
    pub keyframe_property: String,
    /// Camera at startup
    pub initial_camera: CameraConfig,
    /// Lighting at startup
    pub initial_lighting: LightingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            keyframe_property: DEFAULT_PROPERTY_PATH.to_string(),
            initial_camera: CameraConfig::default(),
            initial_lighting: LightingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate RON text
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: EngineConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Pretty-printed RON
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Write the config as RON
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.cycle_length.is_finite() || self.cycle_length <= 0.0 {
            return Err(ConfigError::InvalidCycleLength(self.cycle_length));
        }
        if self.preview_limit == 0 {
            return Err(ConfigError::InvalidPreviewLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.cycle_length, 10.0);
        assert_eq!(config.preview_limit, 6);
        assert_eq!(config.keyframe_property, "armature.spine.rotateZ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let mut config = EngineConfig::default();
        config.initial_camera.projection = Projection::Orthographic;
        config.cycle_length = 4.0;

        let ron_str = config.to_ron_string().unwrap();
        let loaded = EngineConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded = EngineConfig::from_ron_str("(preview_limit: 3)").unwrap();
        assert_eq!(loaded.preview_limit, 3);
        assert_eq!(loaded.cycle_length, 10.0);
        assert_eq!(loaded.initial_lighting, LightingConfig::default());
    }

    #[test]
    fn test_invalid_cycle_length() {
        let err = EngineConfig::from_ron_str("(cycle_length: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCycleLength(_)));

        let config = EngineConfig {
            cycle_length: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_preview_limit() {
        let err = EngineConfig::from_ron_str("(preview_limit: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPreviewLimit));
    }

    #[test]
    fn test_malformed_text() {
        let err = EngineConfig::from_ron_str("(cycle_length: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/nebula/engine.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("nebula-engine-{}.ron", uuid::Uuid::new_v4()));
        let config = EngineConfig {
            preview_limit: 4,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
