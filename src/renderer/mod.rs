//! Rendering module
//!
//! The core hands each frame to a [`Renderer`]. The WebGPU implementation
//! tessellates the frame into a colored triangle list; [`FrameStats`] only
//! counts, for headless runs and tests.

pub mod mesh;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

use glam::Vec2;
use std::convert::Infallible;

use crate::graph::{Edge, Triangle};

pub use mesh::{MeshStyle, build_mesh};
pub use pipeline::{RenderState, RendererError};
pub use vertex::Vertex;

/// Paints one frame
pub trait Renderer {
    type Error;

    /// `vertices` is the frame snapshot (points, then the pointer); triangle and
    /// edge indices refer into it.
    fn render(
        &mut self,
        vertices: &[Vec2],
        triangles: &[Triangle],
        edges: &[Edge],
    ) -> Result<(), Self::Error>;
}

/// Renderer that records what it was given
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    /// Counts from the last frame
    pub vertices: usize,
    pub triangles: usize,
    pub edges: usize,
    /// Running totals
    pub total_triangles: u64,
    pub total_edges: u64,
    pub peak_triangles: usize,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean triangles per frame
    pub fn mean_triangles(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_triangles as f64 / self.frames as f64
        }
    }

    /// Mean edges per frame
    pub fn mean_edges(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.frames as f64
        }
    }
}

impl Renderer for FrameStats {
    type Error = Infallible;

    fn render(
        &mut self,
        vertices: &[Vec2],
        triangles: &[Triangle],
        edges: &[Edge],
    ) -> Result<(), Infallible> {
        self.frames += 1;
        self.vertices = vertices.len();
        self.triangles = triangles.len();
        self.edges = edges.len();
        self.total_triangles += triangles.len() as u64;
        self.total_edges += edges.len() as u64;
        self.peak_triangles = self.peak_triangles.max(triangles.len());
        Ok(())
    }
}
