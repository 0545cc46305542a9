//! Rendering error types.

use calcscene_core::CalcSceneError;
use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Buffer creation failed.
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),

    /// Out of memory.
    #[error("out of memory: {requested} bytes requested, {available} available")]
    OutOfMemory { requested: u64, available: u64 },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for CalcSceneError {
    fn from(e: RenderError) -> Self {
        CalcSceneError::Render(e.to_string())
    }
}
