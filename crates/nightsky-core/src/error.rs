use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while configuring or starting the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host could not provide anything to draw on.
    #[error("drawing surface unavailable (viewport {width}x{height})")]
    SurfaceUnavailable { width: f32, height: f32 },
    #[error("animation loop is already running")]
    AlreadyRunning,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse TOML config: {0}")]
    ConfigToml(#[from] toml::de::Error),
    #[error("failed to parse JSON config: {0}")]
    ConfigJson(#[from] serde_json::Error),
    #[error("unsupported config format {0:?} (expected .toml or .json)")]
    UnsupportedConfigFormat(String),
}
