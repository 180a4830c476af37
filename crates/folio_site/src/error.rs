//! Error types for folio_site

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or building the site
#[derive(Error, Debug)]
pub enum SiteError {
    /// Failed to read a config or content file
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a config file
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config or content file is not valid TOML for its schema
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to serialize the config
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid easing: {0}")]
    Easing(#[from] folio_animation::UnknownEasing),

    /// Scroll threshold outside (0, 1]
    #[error("threshold {0} is outside (0, 1]")]
    Threshold(f32),

    #[error("frame rate must be between 1 and 1000, got {0}")]
    FrameRate(u32),

    /// Viewport size or duration scale that can't be laid out or played
    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: f32 },

    /// No element carries this label
    #[error("no element labeled {0:?}")]
    UnknownElement(String),

    /// Page layout failed
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
}

/// Result type for folio_site operations
pub type Result<T> = std::result::Result<T, SiteError>;
