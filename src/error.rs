// Error types for viewer start-up

use thiserror::Error;

/// Failures that stop the viewer before or while entering the event loop.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// winit could not create or run the event loop
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// winit OS error while opening the window
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// wgpu could not wrap the window in a surface
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter can present to the window surface
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// The surface reports no usable format, present mode or alpha mode
    #[error("Surface is not supported by the adapter")]
    UnsupportedSurface,

    /// wgpu request device error
    #[error("GPU device error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;
