//! Bake configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geom::LIGHTMAP_UV_CHANNEL;
use crate::util::{Error, Result};

/// How a patch decides whether it is emissive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissiveSource {
    /// Treat a diffuse color whose green exceeds red + blue as emissive.
    ///
    /// This is a placeholder for real emission data and misfires on any
    /// saturated green surface. Prefer [`EmissiveSource::MaterialChannel`].
    #[default]
    GreenDominantHeuristic,
    /// Read the material's `emissive` parameter (zero if absent).
    MaterialChannel,
}

/// Lightmap resolution, mip chain and light-transport tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    // Output
    pub width: u32,
    pub height: u32,
    /// Texcoord channel holding the lightmap unwrap.
    pub uv_channel: usize,

    // Patch hierarchy
    /// Number of texel-grid tiers, level 0 being the output resolution.
    pub mip_levels: u32,
    /// Level whose patches emit indirect light. Coarser is faster and blurrier.
    pub indirect_source_level: u32,

    // Light transport
    /// Shadow-ray origin offset along the ray (direct) or normal (indirect).
    pub ray_epsilon: f32,
    /// Indirect shadow rays stop this far short of the emitter.
    pub emitter_distance_bias: f32,
    /// Minimum `cos_i * cos_j` for an emitter to contribute.
    pub form_factor_threshold: f32,

    pub emissive: EmissiveSource,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            uv_channel: LIGHTMAP_UV_CHANNEL,
            mip_levels: 5,
            indirect_source_level: 4,
            ray_epsilon: 0.01,
            emitter_distance_bias: 0.1,
            form_factor_threshold: 1e-4,
            emissive: EmissiveSource::default(),
        }
    }
}

impl BakeSettings {
    /// Settings for a `width x height` lightmap, other fields default.
    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check resolution, mip chain and transport parameters.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::settings(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.mip_levels == 0 {
            return Err(Error::settings("mip_levels must be at least 1"));
        }
        let last = self.mip_levels - 1;
        if last >= u32::BITS || (self.width >> last) == 0 || (self.height >> last) == 0 {
            return Err(Error::settings(format!(
                "{}x{} cannot hold {} mip levels",
                self.width, self.height, self.mip_levels
            )));
        }
        if self.indirect_source_level >= self.mip_levels {
            return Err(Error::settings(format!(
                "indirect_source_level {} must be below mip_levels {}",
                self.indirect_source_level, self.mip_levels
            )));
        }
        for (name, value) in [
            ("ray_epsilon", self.ray_epsilon),
            ("emitter_distance_bias", self.emitter_distance_bias),
            ("form_factor_threshold", self.form_factor_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::settings(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        Ok(())
    }

    /// Texel grid size of a mip level.
    #[inline]
    pub fn level_size(&self, level: u32) -> (u32, u32) {
        (self.width >> level, self.height >> level)
    }
}
