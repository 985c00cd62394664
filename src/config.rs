//! Runtime configuration for the course tools.
//!
//! Settings are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. a JSON file (`--config`)
//! 3. the `COURSE_KEY` environment variable
//! 4. command-line flags (applied by the binary)
//!
//! # Example
//!
//! ```
//! use course_codec::config::Config;
//!
//! let config = Config::from_json(r#"{ "render_scale": 4 }"#).unwrap();
//! assert_eq!(config.render_scale, 4);
//! assert_eq!(config.palette.cell_size, 16);
//! assert!(config.course_key.is_none());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{ContainerCodec, CourseCipher, StaticKey};
use crate::error::{CourseError, Result};
use crate::palette::PaletteConfig;

/// Environment variable holding the course key as 32 hex digits.
pub const COURSE_KEY_ENV: &str = "COURSE_KEY";

/// Default pixels per tile for rendered PNGs.
pub const DEFAULT_RENDER_SCALE: u32 = 1;

/// Command-line values that replace configured ones.
///
/// Apply them with [`Config::apply_overrides`] before [`Config::validate`],
/// so a bad flag is rejected the same way as a bad file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Course key as hex.
    pub course_key: Option<String>,
    /// Render upscale factor.
    pub render_scale: Option<u32>,
    /// Palette cell size in pixels.
    pub cell_size: Option<u32>,
    /// Palette clustering tolerance.
    pub tolerance: Option<f64>,
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 128-bit course key as hex, needed for BCD and ZCD containers.
    pub course_key: Option<String>,
    /// Palette extraction defaults.
    pub palette: PaletteConfig,
    /// Integer upscale factor for rendered areas.
    pub render_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            course_key: None,
            palette: PaletteConfig::default(),
            render_scale: DEFAULT_RENDER_SCALE,
        }
    }
}

impl Config {
    /// Parses a configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ConfigError` if the JSON is malformed.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::IoError` if the file cannot be read, or
    /// `CourseError::ConfigError` if it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Loads `path` if given, otherwise defaults, then applies the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(COURSE_KEY_ENV).filter(|key| !key.trim().is_empty()) {
            debug!("Course key taken from {COURSE_KEY_ENV}");
            self.course_key = Some(key.trim().to_string());
        }
    }

    /// Replaces every value that `overrides` sets.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(key) = overrides.course_key {
            self.course_key = Some(key);
        }
        if let Some(scale) = overrides.render_scale {
            self.render_scale = scale;
        }
        if let Some(cell_size) = overrides.cell_size {
            self.palette.cell_size = cell_size;
        }
        if let Some(tolerance) = overrides.tolerance {
            self.palette.tolerance = tolerance;
        }
    }

    /// Builds the container codec for this configuration.
    ///
    /// Without a course key the codec only handles zlib containers.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ConfigError` if the course key is not 32 hex
    /// digits.
    pub fn codec(&self) -> Result<ContainerCodec> {
        match &self.course_key {
            Some(text) => {
                let key = StaticKey::from_hex(text)?;
                Ok(ContainerCodec::new(CourseCipher::new(key)))
            }
            None => Ok(ContainerCodec::without_cipher()),
        }
    }

    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ConfigError` describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.render_scale == 0 {
            return Err(CourseError::ConfigError {
                reason: "render_scale must be at least 1".to_string(),
            });
        }
        if self.palette.cell_size == 0 {
            return Err(CourseError::ConfigError {
                reason: "palette.cell_size must be at least 1".to_string(),
            });
        }
        if !self.palette.tolerance.is_finite() || self.palette.tolerance < 0.0 {
            return Err(CourseError::ConfigError {
                reason: format!(
                    "palette.tolerance must be a non-negative number, got {}",
                    self.palette.tolerance
                ),
            });
        }
        if let Some(key) = &self.course_key {
            StaticKey::from_hex(key)?;
        }
        Ok(())
    }
}
