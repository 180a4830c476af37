//! Site configuration
//!
//! Folio reads an optional `folio.toml`:
//!
//! ```toml
//! [viewport]
//! width = 1280.0
//! height = 800.0
//!
//! [animation]
//! frame_rate = 60
//! default_threshold = 0.8
//! default_ease = "power3.out"
//! duration_scale = 1.0
//! stagger_seed = 7
//! ambient = true
//! ```
//!
//! Every field has a default, so an empty file (or no file) is valid.

use std::fs;
use std::path::Path;

use folio_animation::Easing;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SiteError};

/// Default config file name
pub const CONFIG_FILE: &str = "folio.toml";

/// Upper bound for `animation.duration_scale`
pub const MAX_DURATION_SCALE: f32 = 100.0;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// Simulated viewport size
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimationConfig {
    /// Simulated frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Viewport fraction for scroll triggers
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,
    #[serde(default = "default_ease")]
    pub default_ease: String,
    /// Multiplies every rule duration and stagger spread
    #[serde(default = "default_duration_scale")]
    pub duration_scale: f32,
    /// Seed for random stagger order
    #[serde(default = "default_stagger_seed")]
    pub stagger_seed: u64,
    /// Run ambient motion rules
    #[serde(default = "default_true")]
    pub ambient: bool,
}

fn default_frame_rate() -> u32 {
    60
}

fn default_threshold() -> f32 {
    0.8
}

fn default_ease() -> String {
    "power3.out".to_string()
}

fn default_duration_scale() -> f32 {
    1.0
}

fn default_stagger_seed() -> u64 {
    7
}

fn default_true() -> bool {
    true
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            default_threshold: default_threshold(),
            default_ease: default_ease(),
            duration_scale: default_duration_scale(),
            stagger_seed: default_stagger_seed(),
            ambient: default_true(),
        }
    }
}

impl AnimationConfig {
    /// The parsed default easing
    pub fn ease(&self) -> Result<Easing> {
        Ok(self.default_ease.parse::<Easing>()?)
    }

    /// Duration of one simulated frame in milliseconds
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.frame_rate.max(1) as f32
    }
}

impl SiteConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig = toml::from_str(&content).map_err(|source| SiteError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` if given, otherwise `./folio.toml` if it exists, otherwise
    /// the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::load(local)
                } else {
                    debug!("no {CONFIG_FILE}, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|source| SiteError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<()> {
        let viewport = &self.viewport;
        if !(viewport.width.is_finite() && viewport.width > 0.0) {
            return Err(SiteError::Invalid {
                field: "viewport.width",
                value: viewport.width,
            });
        }
        if !(viewport.height.is_finite() && viewport.height > 0.0) {
            return Err(SiteError::Invalid {
                field: "viewport.height",
                value: viewport.height,
            });
        }

        let animation = &self.animation;
        if !(1..=1000).contains(&animation.frame_rate) {
            return Err(SiteError::FrameRate(animation.frame_rate));
        }
        let threshold = animation.default_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(SiteError::Threshold(threshold));
        }
        if !(0.0..=MAX_DURATION_SCALE).contains(&animation.duration_scale) {
            return Err(SiteError::Invalid {
                field: "animation.duration_scale",
                value: animation.duration_scale,
            });
        }
        animation.ease()?;
        Ok(())
    }
}
