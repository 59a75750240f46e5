//! Frame tessellation
//!
//! Paint order: dots (the pointer is the last one), triangles, edges.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::graph::{Edge, Triangle};
use crate::settings::Settings;

/// Circle segments per dot
pub const DOT_SEGMENTS: u32 = 12;

/// How a frame is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStyle {
    pub dot_radius: f32,
    pub dot_segments: u32,
    pub line_width: f32,
    pub color: [f32; 3],
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for MeshStyle {
    fn from(settings: &Settings) -> Self {
        Self {
            dot_radius: settings.dot_radius,
            dot_segments: DOT_SEGMENTS,
            line_width: settings.line_width,
            color: settings.color,
        }
    }
}

/// Tessellate one frame into a triangle list in viewport pixels
pub fn build_mesh(
    vertices: &[Vec2],
    triangles: &[Triangle],
    edges: &[Edge],
    style: &MeshStyle,
) -> Vec<Vertex> {
    let capacity = vertices.len() * style.dot_segments as usize * 3
        + triangles.len() * 3
        + edges.len() * 6;
    let mut out = Vec::with_capacity(capacity);

    let dot_color = colors::with_alpha(style.color, 1.0);
    for &v in vertices {
        shapes::circle(&mut out, v, style.dot_radius, dot_color, style.dot_segments);
    }

    for t in triangles {
        let [a, b, c] = t.vertices;
        shapes::gradient_triangle(
            &mut out,
            [vertices[a], vertices[b], vertices[c]],
            style.color,
            t.intensity,
        );
    }

    for e in edges {
        shapes::line(
            &mut out,
            vertices[e.from],
            vertices[e.to],
            style.line_width,
            colors::with_alpha(style.color, e.opacity),
        );
    }

    out
}
