//! Errors raised while acquiring a drawable surface.
//!
//! None of these are fatal to the host: a field that cannot get a surface
//! simply does not animate.

use std::fmt;

#[derive(Debug)]
pub enum SurfaceError {
    /// The window could not back a wgpu surface.
    Creation(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    NoAdapter,
    /// The adapter refused to create a device.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no configuration for this adapter.
    Unsupported,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Creation(e) => write!(f, "failed to create surface: {}", e),
            SurfaceError::NoAdapter => write!(f, "no GPU adapter can present to this surface"),
            SurfaceError::Device(e) => write!(f, "failed to create GPU device: {}", e),
            SurfaceError::Unsupported => write!(f, "surface is not supported by the adapter"),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceError::Creation(e) => Some(e),
            SurfaceError::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for SurfaceError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        SurfaceError::Creation(e)
    }
}

impl From<wgpu::RequestDeviceError> for SurfaceError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        SurfaceError::Device(e)
    }
}
