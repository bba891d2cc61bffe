//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SIDE_WALL: [f32; 4] = [1.0, 0.42, 0.0, 1.0];
    pub const BARRIER: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const FLOOR: [f32; 4] = [1.0, 0.0, 0.5, 1.0];
    pub const TOP_PUSHER: [f32; 4] = [0.62, 0.31, 0.87, 1.0];
    pub const BOTTOM_PUSHER: [f32; 4] = [0.45, 0.04, 0.72, 1.0];
    pub const COIN_RIM: [f32; 4] = [1.0, 0.42, 0.0, 1.0];
    pub const SCORE_LINE: [f32; 4] = [1.0, 0.0, 0.5, 0.25];
    pub const COIN_GOLD: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const COIN_ORANGE: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const COIN_LEMON: [f32; 4] = [1.0, 0.93, 0.31, 1.0];
    pub const COIN_AMBER: [f32; 4] = [1.0, 0.72, 0.0, 1.0];
    pub const COIN_BRIGHT: [f32; 4] = [1.0, 0.97, 0.6, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.04, 0.02, 0.1, 1.0];
}
