//! Proximity graph module
//!
//! Turns a vertex snapshot (points followed by the pointer) into the two lists
//! the renderer paints:
//! - Triangles whose three sides are all shorter than `max_distance`
//! - Per-vertex nearest edges shorter than `max_distance`
//!
//! Small vertex sets are scanned by brute force. Large ones go through a
//! bulk-loaded R-tree; both paths return the same lists in the same order.

pub mod proximity;
pub mod spatial;

use glam::Vec2;

pub use proximity::{Edge, ProximityGraph, ProximityParams, Triangle, build_brute_force};
pub use spatial::SpatialIndex;

/// Build the proximity graph for one frame
pub fn build(vertices: &[Vec2], params: &ProximityParams) -> ProximityGraph {
    let use_index = vertices.len() > params.index_threshold
        && params.max_distance.is_finite()
        && params.max_distance > 0.0;

    let graph = if use_index {
        spatial::build_with_index(vertices, params)
    } else {
        build_brute_force(vertices, params)
    };

    log::trace!(
        "proximity graph: {} vertices, {} triangles, {} edges (r-tree: {})",
        vertices.len(),
        graph.triangles.len(),
        graph.edges.len(),
        use_index
    );
    graph
}
