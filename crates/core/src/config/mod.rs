use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{draw::EaseType, Result};

/// Top-level configuration structure for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub render: RenderConfig,
    pub animation: AnimationConfig,
    pub input: InputConfig,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Size of the virtual screen skins are laid out against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Tween defaults applied by the command layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Ease given to frames added by `time` / `delta` commands.
    pub default_ease: EaseType,
    /// Frame delta used by drivers that tick at a fixed rate.
    pub tick_ms: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_ease: EaseType::Out,
            tick_ms: 1000.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Pointer input is ignored until this many ms after a scene starts,
    /// unless the scene's own `#STARTINPUT` overrides it.
    pub begin_input_time_ms: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "render": { "width": 1280 } }"#).unwrap();
        assert_eq!(config.render.width, 1280);
        assert_eq!(config.render.height, 480);
        assert_eq!(config.animation.default_ease, EaseType::Out);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn ease_is_read_by_name() {
        let config =
            EngineConfig::from_json_str(r#"{ "animation": { "default_ease": "linear" } }"#)
                .unwrap();
        assert_eq!(config.animation.default_ease, EaseType::Linear);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EngineConfig::from_json_str("{ render").is_err());
    }
}
