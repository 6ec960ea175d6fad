//! Error types for scene setup.
//!
//! Only setup can fail: a frame that cannot be presented is skipped, and bad
//! per-draw data degrades visibly rather than producing an error.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for paddock operations.
pub type Result<T> = std::result::Result<T, PaddockError>;

/// Error type for paddock operations.
#[derive(Error, Debug)]
pub enum PaddockError {
    /// The event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// The window surface could not be created.
    #[error("failed to create render surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter can present to the surface.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The GPU device could not be opened.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface reported no usable texture formats.
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,

    /// A texture image could not be decoded.
    #[error("failed to load texture '{path}': {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The config file could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`SceneConfig`](crate::SceneConfig).
    #[error("invalid config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Setup ended before the scene was running (for example the window was
    /// closed during initialization).
    #[error("scene setup did not complete")]
    SetupIncomplete,
}
