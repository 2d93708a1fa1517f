//! PanOptions - option resolution for an interactive 360° panorama viewer
//!
//! PanOptions turns a partial, user-supplied option document into a fully
//! populated and validated configuration: defaults are merged in, unknown
//! options are rejected, deprecated ones are dropped with a warning, and
//! per-option normalizers (angles, speeds, FOV bounds, plugins, ...) run
//! against the merged tree.

pub mod cli;
pub mod config;
pub mod logging;
pub mod units;

pub use config::*;

/// Result type alias for PanOptions operations
pub type Result<T> = anyhow::Result<T>;

/// Error types surfaced by the PanOptions front end
#[derive(thiserror::Error, Debug)]
pub enum PanOptionsError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Options file error: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid override '{0}', expected key=value")]
    InvalidOverride(String),

    #[error("Logging error: {0}")]
    Logging(String),
}
