//! LightBox configuration, loadable from JSON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::display::{BlendMode, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;

pub const DEFAULT_CHUNK_SIZE: u32 = 80;
pub const DEFAULT_CHUNK_OVERSHOOT: u32 = 1;

/// Settings for a `LightBox`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightBoxConfig {
    /// Viewport width in pixels (usually the window width)
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Side of one spatial chunk in pixels; tune for wall density
    pub chunk_size: u32,
    /// Extra chunks queried on every side of the expanded viewport
    pub chunk_overshoot: u32,
    /// How the lighting mask lands on the target: `add` brightens lit areas,
    /// `multiply` darkens unlit ones
    pub blend_mode: BlendMode,
}

impl LightBoxConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&json)?;
        config.chunk_size = config.chunk_size.max(1);
        Ok(config)
    }
}

impl Default for LightBoxConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overshoot: DEFAULT_CHUNK_OVERSHOOT,
            blend_mode: BlendMode::Add,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LightBoxConfig =
            serde_json::from_str(r#"{ "width": 500, "blend_mode": "multiply" }"#).unwrap();
        assert_eq!(config.width, 500);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.chunk_size, 80);
        assert_eq!(config.blend_mode, BlendMode::Multiply);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let path = std::env::temp_dir().join(format!("tilelight-config-{}.json", std::process::id()));
        let config = LightBoxConfig::new(320, 200).with_chunk_size(40);
        config.save(&path).unwrap();
        let loaded = LightBoxConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
