use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BoothError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    pub framing: FramingConfig,
    pub develop: DevelopConfig,
    pub surface: SurfaceConfig,
}

impl BoothConfig {
    /// Loads a configuration from a JSON file. Missing sections and fields
    /// fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|err| BoothError::config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.framing.target_width == 0 {
            return Err(BoothError::config("framing.target_width must be positive"));
        }

        let surface = &self.surface;
        if !(surface.min_scale > 0.0 && surface.min_scale <= surface.max_scale) {
            return Err(BoothError::config(format!(
                "surface scale bounds are invalid: [{}, {}]",
                surface.min_scale, surface.max_scale
            )));
        }
        if !(surface.min_scale..=surface.max_scale).contains(&surface.initial_scale) {
            return Err(BoothError::config(
                "surface.initial_scale must lie within the scale bounds",
            ));
        }
        if surface.max_rotation_deg < 0.0 || surface.margin < 0.0 {
            return Err(BoothError::config(
                "surface margin and rotation range must not be negative",
            ));
        }
        if surface.item_width <= 0.0 || surface.item_height <= 0.0 {
            return Err(BoothError::config("surface item footprint must be positive"));
        }

        Ok(())
    }
}

/// Settings consumed by the framer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Width in pixels of every framed artifact.
    pub target_width: u32,
    /// Font families tried in order for the caption, before the generic
    /// fallbacks.
    pub caption_fonts: Vec<String>,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            target_width: 600,
            caption_fonts: vec![
                "Caveat".to_string(),
                "Permanent Marker".to_string(),
                "cursive".to_string(),
            ],
        }
    }
}

/// Settings for the develop batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopConfig {
    /// Delay inserted after every framed item. Zero disables pacing.
    pub pacing_ms: u64,
}

/// Placement rules for the surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub margin: f32,
    pub item_width: f32,
    pub item_height: f32,
    pub max_rotation_deg: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub initial_scale: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            item_width: 150.0,
            item_height: 200.0,
            max_rotation_deg: 20.0,
            min_scale: 0.5,
            max_scale: 2.5,
            initial_scale: 1.0,
        }
    }
}
