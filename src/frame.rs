//! One frame of work
//!
//! Step the simulation, take the vertex snapshot, build the proximity graph
//! from that snapshot and hand all three to the renderer. Pointer and viewport
//! updates land between calls, never inside one.

use crate::graph::{self, ProximityParams};
use crate::renderer::Renderer;
use crate::sim::Constellation;

/// What a frame produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSummary {
    pub vertices: usize,
    pub triangles: usize,
    pub edges: usize,
}

/// Run one frame: simulate, build the graph, paint
pub fn advance_frame<R: Renderer>(
    state: &mut Constellation,
    params: &ProximityParams,
    renderer: &mut R,
) -> Result<FrameSummary, R::Error> {
    state.step();

    let vertices = state.vertices();
    let graph = graph::build(&vertices, params);

    renderer.render(&vertices, &graph.triangles, &graph.edges)?;

    Ok(FrameSummary {
        vertices: vertices.len(),
        triangles: graph.triangles.len(),
        edges: graph.edges.len(),
    })
}
