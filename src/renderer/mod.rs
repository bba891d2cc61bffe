//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into flat-colored triangles in world
//! coordinates and mapped to NDC at upload time.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, WorldView};
pub use vertex::Vertex;

use thiserror::Error;

/// Failures while bringing up the GPU
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
