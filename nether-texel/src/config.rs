//! Generator settings (TOML)
//!
//! Every section is optional; missing keys fall back to the defaults below.
//!
//! ```toml
//! [mips]
//! levels = 0                  # 0 = count_texture_mips(width, height, 1)
//! parallel_min_texels = 16384
//!
//! [sobel]
//! scale = 1.0
//!
//! [rotation]
//! seed = 42
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Texel processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TexelConfig {
    /// Mip chain generation
    #[serde(default)]
    pub mips: MipConfig,
    /// Sobel gradient
    #[serde(default)]
    pub sobel: SobelConfig,
    /// Random rotation field
    #[serde(default)]
    pub rotation: RotationConfig,
}

/// Mip chain generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MipConfig {
    /// Total levels to produce including the top level (default: 0 = derive from size)
    #[serde(default)]
    pub levels: u32,
    /// Levels with at least this many texels are filtered row-parallel (default: 16384)
    #[serde(default = "default_parallel_min_texels")]
    pub parallel_min_texels: usize,
}

/// Sobel gradient settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SobelConfig {
    /// Gradient scale factor (default: 1.0)
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Fields with at least this many texels are processed row-parallel (default: 16384)
    #[serde(default = "default_parallel_min_texels")]
    pub parallel_min_texels: usize,
}

/// Random rotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RotationConfig {
    /// Seed for the rotation RNG (default: 0)
    #[serde(default)]
    pub seed: u64,
}

fn default_parallel_min_texels() -> usize {
    16 * 1024
}
fn default_scale() -> f32 {
    1.0
}

impl Default for MipConfig {
    fn default() -> Self {
        Self {
            levels: 0,
            parallel_min_texels: default_parallel_min_texels(),
        }
    }
}

impl Default for SobelConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            parallel_min_texels: default_parallel_min_texels(),
        }
    }
}

impl MipConfig {
    /// Defaults with an explicit level count
    pub fn with_levels(levels: u32) -> Self {
        Self {
            levels,
            ..Self::default()
        }
    }
}

impl TexelConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded texel config from {}", path.display());
        Ok(config)
    }
}
