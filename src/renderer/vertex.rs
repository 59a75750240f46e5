//! Vertex type for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and straight (non-premultiplied) RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Colors
pub mod colors {
    /// Cleared to fully transparent so the page shows through
    pub const BACKGROUND: wgpu::Color = wgpu::Color::TRANSPARENT;
    pub const STAR: [f32; 3] = [1.0, 1.0, 1.0];

    /// Attach an alpha to an RGB triple
    #[inline]
    pub fn with_alpha(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
        [rgb[0], rgb[1], rgb[2], alpha]
    }
}
