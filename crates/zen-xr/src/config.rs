//! Client configuration.
//!
//! Defaults reproduce the stock client. `from_env` layers a JSON file named
//! by `ZEN_CONFIG` and individual `ZEN_*` overrides on top.

use std::path::Path;

use serde::{Deserialize, Serialize};
use zen_common::helpers::{env_bool, env_parse};

use crate::{types::ReferenceSpaceType, XrError, XrResult};

/// When the rendering reference space is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceCreation {
    /// During session initialisation.
    #[default]
    Eager,
    /// On the first frame, once a predicted display time is known.
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub application_name: String,
    pub reference_space: ReferenceSpaceType,
    pub reference_space_creation: SpaceCreation,
    pub rendering_scale: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub clear_color: [f32; 4],
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            application_name: "zen-oculus".to_string(),
            reference_space: ReferenceSpaceType::Stage,
            reference_space_creation: SpaceCreation::Eager,
            rendering_scale: 2.0,
            near_clip: 0.05,
            far_clip: 1000.0,
            clear_color: [17.0 / 256.0, 31.0 / 256.0, 77.0 / 256.0, 1.0],
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> XrResult<Self> {
        serde_json::from_str(json).map_err(|err| XrError::Config(format!("invalid config: {err}")))
    }

    pub fn load(path: impl AsRef<Path>) -> XrResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|err| XrError::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_json(&json)
    }

    /// Defaults, then `ZEN_CONFIG`, then the individual `ZEN_*` variables.
    pub fn from_env() -> XrResult<Self> {
        let mut config = match std::env::var("ZEN_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        if let Some(space) = env_parse::<ReferenceSpaceType>("ZEN_REFERENCE_SPACE")? {
            config.reference_space = space;
        }
        if std::env::var_os("ZEN_LAZY_REFERENCE_SPACE").is_some() {
            config.reference_space_creation = if env_bool("ZEN_LAZY_REFERENCE_SPACE", false) {
                SpaceCreation::Lazy
            } else {
                SpaceCreation::Eager
            };
        }
        if let Some(scale) = env_parse::<f32>("ZEN_RENDERING_SCALE")? {
            config.rendering_scale = scale;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> XrResult<()> {
        if self.rendering_scale.is_nan() || self.rendering_scale <= 0.0 {
            return Err(XrError::Config(format!(
                "rendering_scale must be positive, got {}",
                self.rendering_scale
            )));
        }
        if self.near_clip <= 0.0 || self.near_clip >= self.far_clip || self.near_clip.is_nan() || self.far_clip.is_nan() {
            return Err(XrError::Config(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near_clip, self.far_clip
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reference_space, ReferenceSpaceType::Stage);
        assert_eq!(config.reference_space_creation, SpaceCreation::Eager);
        assert_eq!(config.rendering_scale, 2.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(
            r#"{ "reference_space": "local", "reference_space_creation": "lazy", "far_clip": 50.0 }"#,
        )
        .unwrap();
        assert_eq!(config.reference_space, ReferenceSpaceType::Local);
        assert_eq!(config.reference_space_creation, SpaceCreation::Lazy);
        assert_eq!(config.far_clip, 50.0);
        assert_eq!(config.near_clip, 0.05);
        assert_eq!(config.application_name, "zen-oculus");
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            ClientConfig::from_json(r#"{ "reference_space": "floor" }"#),
            Err(XrError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_scale = ClientConfig { rendering_scale: 0.0, ..ClientConfig::default() };
        assert!(bad_scale.validate().is_err());
        let inverted = ClientConfig { near_clip: 10.0, far_clip: 1.0, ..ClientConfig::default() };
        assert!(inverted.validate().is_err());
        let nan = ClientConfig { rendering_scale: f32::NAN, ..ClientConfig::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("ZEN_REFERENCE_SPACE", "local");
        std::env::set_var("ZEN_LAZY_REFERENCE_SPACE", "yes");
        std::env::set_var("ZEN_RENDERING_SCALE", "1.25");
        let config = ClientConfig::from_env().unwrap();
        std::env::remove_var("ZEN_REFERENCE_SPACE");
        std::env::remove_var("ZEN_LAZY_REFERENCE_SPACE");
        std::env::remove_var("ZEN_RENDERING_SCALE");

        assert_eq!(config.reference_space, ReferenceSpaceType::Local);
        assert_eq!(config.reference_space_creation, SpaceCreation::Lazy);
        assert_eq!(config.rendering_scale, 1.25);
    }
}
