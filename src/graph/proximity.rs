//! Proximity graph types and the brute-force builder

use glam::Vec2;
use std::cmp::Ordering;

use crate::consts::{INDEX_THRESHOLD, MAX_DISTANCE, MAX_NEIGHBORS};

/// Parameters for one graph build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityParams {
    /// Sides and edges must be strictly shorter than this
    pub max_distance: f32,
    /// Edges kept per vertex
    pub max_neighbors: usize,
    /// Vertex count above which the R-tree index is used
    pub index_threshold: usize,
}

impl Default for ProximityParams {
    fn default() -> Self {
        Self {
            max_distance: MAX_DISTANCE,
            max_neighbors: MAX_NEIGHBORS,
            index_threshold: INDEX_THRESHOLD,
        }
    }
}

/// A directed edge from a vertex to one of its nearest neighbours.
///
/// The same pair can appear twice, once from each endpoint's list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub distance: f32,
    /// `1 - distance / max_distance`
    pub opacity: f32,
}

impl Edge {
    pub fn new(from: usize, to: usize, distance: f32, max_distance: f32) -> Self {
        Self {
            from,
            to,
            distance,
            opacity: 1.0 - distance / max_distance,
        }
    }
}

/// Three mutually close vertices, indices ascending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [usize; 3],
    /// Side lengths `[ab, bc, ca]`
    pub sides: [f32; 3],
    pub average_distance: f32,
    /// `1 - average_distance / max_distance`, in (0, 1]
    pub intensity: f32,
}

impl Triangle {
    pub fn new(vertices: [usize; 3], sides: [f32; 3], max_distance: f32) -> Self {
        let average_distance = (sides[0] + sides[1] + sides[2]) / 3.0;
        Self {
            vertices,
            sides,
            average_distance,
            intensity: 1.0 - average_distance / max_distance,
        }
    }
}

/// Triangles and edges for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityGraph {
    /// Lexicographic by vertex indices
    pub triangles: Vec<Triangle>,
    /// Grouped by `from` in vertex order, each group ascending by distance
    pub edges: Vec<Edge>,
}

impl ProximityGraph {
    /// Edges selected from vertex `v`'s own neighbour list
    pub fn edges_from(&self, v: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from == v)
    }
}

/// Euclidean distance. Both builders go through here so their output matches bit for bit.
#[inline]
pub(crate) fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Upper bound on the edge count: each vertex has at most `n - 1` neighbours,
/// whatever cap the host asked for
#[inline]
pub(crate) fn edge_capacity(vertex_count: usize, max_neighbors: usize) -> usize {
    vertex_count.saturating_mul(max_neighbors.min(vertex_count.saturating_sub(1)))
}

/// Sort candidates by distance (stable, so ties keep index order) and keep the nearest `k`
pub(crate) fn push_nearest(
    edges: &mut Vec<Edge>,
    from: usize,
    candidates: &mut [(usize, f32)],
    params: &ProximityParams,
) {
    candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    edges.extend(
        candidates
            .iter()
            .take(params.max_neighbors)
            .map(|&(to, d)| Edge::new(from, to, d, params.max_distance)),
    );
}

/// Every triple `i < j < k` with all sides under the threshold. O(V³).
pub fn triangles_brute_force(vertices: &[Vec2], max_distance: f32) -> Vec<Triangle> {
    let n = vertices.len();
    let mut triangles = Vec::new();

    for i in 0..n {
        for j in i + 1..n {
            let d_ij = distance(vertices[i], vertices[j]);
            if d_ij < max_distance {
                for k in j + 1..n {
                    let d_jk = distance(vertices[j], vertices[k]);
                    let d_ki = distance(vertices[k], vertices[i]);
                    if d_jk < max_distance && d_ki < max_distance {
                        triangles.push(Triangle::new([i, j, k], [d_ij, d_jk, d_ki], max_distance));
                    }
                }
            }
        }
    }

    triangles
}

/// Nearest edges for every vertex. O(V² log V).
pub fn edges_brute_force(vertices: &[Vec2], params: &ProximityParams) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(edge_capacity(vertices.len(), params.max_neighbors));
    let mut candidates: Vec<(usize, f32)> = Vec::with_capacity(vertices.len());

    for (i, &a) in vertices.iter().enumerate() {
        candidates.clear();
        candidates.extend(
            vertices
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, &b)| (j, distance(a, b)))
                .filter(|&(_, d)| d < params.max_distance),
        );
        push_nearest(&mut edges, i, &mut candidates, params);
    }

    edges
}

/// Full graph by exhaustive scan
pub fn build_brute_force(vertices: &[Vec2], params: &ProximityParams) -> ProximityGraph {
    ProximityGraph {
        triangles: triangles_brute_force(vertices, params.max_distance),
        edges: edges_brute_force(vertices, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_distance: f32) -> ProximityParams {
        ProximityParams {
            max_distance,
            ..Default::default()
        }
    }

    /// Two points and the pointer on one line
    fn line_of_three() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(50.0, 0.0)]
    }

    #[test]
    fn test_single_triangle_scenario() {
        let graph = build_brute_force(&line_of_three(), &params(150.0));

        assert_eq!(graph.triangles.len(), 1);
        let t = graph.triangles[0];
        assert_eq!(t.vertices, [0, 1, 2]);
        assert_eq!(t.sides, [100.0, 50.0, 50.0]);
        assert!((t.average_distance - 66.666_67).abs() < 1e-3);
        assert!((t.intensity - 0.555_56).abs() < 1e-3);

        // Each vertex reaches the other two
        assert_eq!(graph.edges.len(), 6);
    }

    #[test]
    fn test_threshold_excludes_everything() {
        let graph = build_brute_force(&line_of_three(), &params(40.0));
        assert!(graph.triangles.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(0.0, 40.0)];
        // Hypotenuse is exactly 50
        let graph = build_brute_force(&vertices, &params(50.0));
        assert!(graph.triangles.is_empty());
        assert!(graph.edges.iter().all(|e| e.distance < 50.0));
        assert_eq!(graph.edges.len(), 4);
    }

    #[test]
    fn test_edges_sorted_and_capped() {
        // Vertex 0 at the origin with eight neighbours at increasing distance
        let mut vertices = vec![Vec2::ZERO];
        for d in [40.0, 10.0, 70.0, 20.0, 60.0, 30.0, 80.0, 50.0] {
            vertices.push(Vec2::new(d, 0.0));
        }
        let graph = build_brute_force(&vertices, &params(150.0));

        let from_origin: Vec<f32> = graph.edges_from(0).map(|e| e.distance).collect();
        assert_eq!(from_origin, vec![10.0, 20.0, 30.0, 40.0, 50.0]);

        for v in 0..vertices.len() {
            let list: Vec<&Edge> = graph.edges_from(v).collect();
            assert!(list.len() <= MAX_NEIGHBORS);
            assert!(list.windows(2).all(|w| w[0].distance <= w[1].distance));
        }
    }

    #[test]
    fn test_ties_keep_index_order() {
        let vertices = vec![
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(-10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        let graph = build_brute_force(&vertices, &params(150.0));
        let targets: Vec<usize> = graph.edges_from(0).map(|e| e.to).collect();
        assert_eq!(targets, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0)];
        let graph = build_brute_force(&vertices, &params(150.0));

        assert_eq!(graph.edges.len(), 2);
        assert_eq!((graph.edges[0].from, graph.edges[0].to), (0, 1));
        assert_eq!((graph.edges[1].from, graph.edges[1].to), (1, 0));
        assert_eq!(graph.edges[0].distance, 50.0);
        assert!((graph.edges[0].opacity - (1.0 - 50.0 / 150.0)).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_vertices_connect() {
        let vertices = vec![Vec2::new(5.0, 5.0); 3];
        let graph = build_brute_force(&vertices, &params(150.0));
        assert_eq!(graph.triangles.len(), 1);
        assert_eq!(graph.triangles[0].intensity, 1.0);
        assert!(graph.edges.iter().all(|e| e.from != e.to && e.opacity == 1.0));
    }

    #[test]
    fn test_triangles_are_lexicographic() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
        ];
        let graph = build_brute_force(&vertices, &params(150.0));
        let order: Vec<[usize; 3]> = graph.triangles.iter().map(|t| t.vertices).collect();
        assert_eq!(order, vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]);
    }

    #[test]
    fn test_empty_and_single_vertex() {
        assert_eq!(build_brute_force(&[], &params(150.0)), ProximityGraph::default());
        assert_eq!(build_brute_force(&[Vec2::ONE], &params(150.0)), ProximityGraph::default());
    }

    #[test]
    fn test_huge_neighbor_cap_keeps_every_neighbour() {
        for max_neighbors in [usize::MAX, usize::MAX / 3] {
            let params = ProximityParams {
                max_neighbors,
                ..Default::default()
            };
            let graph = build_brute_force(&line_of_three(), &params);
            assert_eq!(graph.edges.len(), 6);
            assert_eq!(graph.triangles.len(), 1);
        }
    }

    #[test]
    fn test_edge_capacity_is_bounded_by_vertex_count() {
        assert_eq!(edge_capacity(3, usize::MAX), 6);
        assert_eq!(edge_capacity(3, 1), 3);
        assert_eq!(edge_capacity(0, usize::MAX), 0);
        assert_eq!(edge_capacity(1, 5), 0);
    }
}
