//! R-tree index for large vertex sets
//!
//! Radius queries return every vertex that can be closer than the threshold.
//! Candidates are re-sorted by index before use, which keeps the output
//! identical to the brute-force scan.

use glam::Vec2;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::proximity::{
    ProximityGraph, ProximityParams, Triangle, distance, edge_capacity, push_nearest,
};

/// Query radius padding so squared-distance rounding never drops a pair the
/// exact `distance` check would keep
const RADIUS_PADDING: f32 = 1.0e-3;

/// A vertex position tagged with its index in the snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedVertex {
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.x == point[0] && self.y == point[1]
    }
}

/// Vertex snapshot bulk-loaded into an R*-tree
pub struct SpatialIndex {
    tree: RTree<IndexedVertex>,
}

impl SpatialIndex {
    pub fn new(vertices: &[Vec2]) -> Self {
        let points = vertices
            .iter()
            .enumerate()
            .map(|(index, p)| IndexedVertex {
                index,
                x: p.x,
                y: p.y,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices within `radius` of vertex `i` (padded), ascending, `i` excluded
    pub fn within(&self, vertices: &[Vec2], i: usize, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let center = vertices[i];
        let padded = radius * (1.0 + RADIUS_PADDING);
        out.extend(
            self.tree
                .locate_within_distance([center.x, center.y], padded * padded)
                .map(|p| p.index)
                .filter(|&j| j != i),
        );
        out.sort_unstable();
    }
}

/// Same output as [`super::build_brute_force`], found through the R-tree.
/// `params.max_distance` must be finite and positive.
pub fn build_with_index(vertices: &[Vec2], params: &ProximityParams) -> ProximityGraph {
    let max_distance = params.max_distance;
    let index = SpatialIndex::new(vertices);

    let mut triangles = Vec::new();
    let mut edges = Vec::with_capacity(edge_capacity(vertices.len(), params.max_neighbors));
    let mut nearby: Vec<usize> = Vec::new();
    let mut close: Vec<(usize, f32)> = Vec::new();

    for i in 0..vertices.len() {
        index.within(vertices, i, max_distance, &mut nearby);

        close.clear();
        close.extend(
            nearby
                .iter()
                .map(|&j| (j, distance(vertices[i], vertices[j])))
                .filter(|&(_, d)| d < max_distance),
        );

        // Triangles with `i` as their lowest index, walked in (j, k) order
        let higher_start = close.partition_point(|&(j, _)| j < i);
        let higher = &close[higher_start..];
        for (a, &(j, d_ij)) in higher.iter().enumerate() {
            for &(k, _) in &higher[a + 1..] {
                let d_jk = distance(vertices[j], vertices[k]);
                let d_ki = distance(vertices[k], vertices[i]);
                if d_jk < max_distance && d_ki < max_distance {
                    triangles.push(Triangle::new([i, j, k], [d_ij, d_jk, d_ki], max_distance));
                }
            }
        }

        push_nearest(&mut edges, i, &mut close, params);
    }

    log::trace!("r-tree: {} vertices indexed", index.len());

    ProximityGraph { triangles, edges }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::graph::build_brute_force;

    fn scatter(seed: u64, count: usize, w: f32, h: f32) -> Vec<Vec2> {
        let mut rng = Pcg32::seed_from_u64(seed);
        (0..count)
            .map(|_| Vec2::new(rng.random::<f32>() * w, rng.random::<f32>() * h))
            .collect()
    }

    #[test]
    fn test_index_matches_brute_force_on_scatter() {
        let params = ProximityParams::default();
        for seed in 0..5 {
            let vertices = scatter(seed, 300, 1920.0, 1080.0);
            assert_eq!(
                build_with_index(&vertices, &params),
                build_brute_force(&vertices, &params),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn test_index_matches_brute_force_outside_viewport() {
        // Negative coordinates, like points overshooting the top-left edge
        let mut vertices = scatter(17, 120, 400.0, 400.0);
        for v in &mut vertices {
            *v -= Vec2::splat(200.0);
        }
        let params = ProximityParams {
            max_distance: 60.0,
            ..Default::default()
        };
        assert_eq!(
            build_with_index(&vertices, &params),
            build_brute_force(&vertices, &params)
        );
    }

    #[test]
    fn test_index_keeps_pairs_just_under_threshold() {
        let vertices = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(149.99, 0.0),
            Vec2::new(150.0, 0.0),
            Vec2::new(299.98, 0.0),
        ];
        let params = ProximityParams::default();
        let graph = build_with_index(&vertices, &params);
        assert_eq!(graph, build_brute_force(&vertices, &params));
        // 0-2 sits exactly on the threshold
        assert!(graph.edges_from(0).any(|e| e.to == 1));
        assert!(!graph.edges_from(0).any(|e| e.to == 2));
    }

    #[test]
    fn test_within_is_sorted_and_excludes_self() {
        let vertices = scatter(3, 50, 300.0, 300.0);
        let index = SpatialIndex::new(&vertices);
        assert_eq!(index.len(), 50);

        let mut out = Vec::new();
        index.within(&vertices, 10, 150.0, &mut out);
        assert!(!out.contains(&10));
        assert!(out.windows(2).all(|w| w[0] < w[1]));
        for &j in &out {
            assert!(vertices[10].distance(vertices[j]) <= 150.0 * (1.0 + 2.0 * RADIUS_PADDING));
        }
    }

    #[test]
    fn test_huge_neighbor_cap_does_not_overflow() {
        let vertices = scatter(4, 20, 100.0, 100.0);
        let params = ProximityParams {
            max_neighbors: usize::MAX,
            ..Default::default()
        };
        let graph = build_with_index(&vertices, &params);
        // All 20 points are within 150px of each other
        assert_eq!(graph.edges.len(), 20 * 19);
    }
}
