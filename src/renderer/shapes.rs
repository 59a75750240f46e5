//! Shape generation for 2D primitives
//!
//! Every function appends triangle-list vertices to `out`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Straight line of the given width as a quad
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));

    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b2.x, b2.y, color));
}

/// Alpha of `p` along a linear gradient from `start` (alpha `a0`) to `end` (alpha `a1`).
/// Points are projected on the gradient axis and clamped to its ends.
pub fn gradient_alpha(p: Vec2, start: Vec2, end: Vec2, a0: f32, a1: f32) -> f32 {
    let axis = end - start;
    let len2 = axis.length_squared();
    let t = if len2 > 0.0 {
        ((p - start).dot(axis) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    a0 + (a1 - a0) * t
}

/// Filled triangle shaded from `a` (alpha `intensity`) towards `b` (alpha `intensity / 2`)
pub fn gradient_triangle(
    out: &mut Vec<Vertex>,
    [a, b, c]: [Vec2; 3],
    rgb: [f32; 3],
    intensity: f32,
) {
    let alpha = |p: Vec2| gradient_alpha(p, a, b, intensity, intensity / 2.0);
    let color = |p: Vec2| [rgb[0], rgb[1], rgb[2], alpha(p)];

    out.push(Vertex::new(a.x, a.y, color(a)));
    out.push(Vertex::new(b.x, b.y, color(b)));
    out.push(Vertex::new(c.x, c.y, color(c)));
}
