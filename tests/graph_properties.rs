//! Property tests for the proximity graph

use constellation::graph::{ProximityParams, build, build_brute_force, spatial::build_with_index};
use glam::Vec2;
use proptest::prelude::*;

fn vertex() -> impl Strategy<Value = Vec2> {
    (-200.0f32..2200.0, -200.0f32..1300.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn vertex_set(max: usize) -> impl Strategy<Value = Vec<Vec2>> {
    prop::collection::vec(vertex(), 0..max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn triangles_respect_threshold(vertices in vertex_set(40), max_distance in 1.0f32..400.0) {
        let params = ProximityParams { max_distance, ..Default::default() };
        let graph = build(&vertices, &params);

        for t in &graph.triangles {
            let [a, b, c] = t.vertices;
            prop_assert!(a < b && b < c);
            prop_assert!(t.sides.iter().all(|&d| (0.0..max_distance).contains(&d)));
            prop_assert!(t.intensity > 0.0 && t.intensity <= 1.0);
        }
        prop_assert!(graph.triangles.windows(2).all(|w| w[0].vertices < w[1].vertices));
    }

    #[test]
    fn edges_are_capped_and_sorted(
        vertices in vertex_set(40),
        max_distance in 1.0f32..400.0,
        max_neighbors in 0usize..8,
    ) {
        let params = ProximityParams { max_distance, max_neighbors, ..Default::default() };
        let graph = build(&vertices, &params);

        for v in 0..vertices.len() {
            let list: Vec<_> = graph.edges_from(v).collect();
            prop_assert!(list.len() <= max_neighbors);
            prop_assert!(list.windows(2).all(|w| w[0].distance <= w[1].distance));
            for e in list {
                prop_assert!(e.to != v);
                prop_assert!(e.distance >= 0.0 && e.distance < max_distance);
                prop_assert!(e.opacity > 0.0 && e.opacity <= 1.0);
            }
        }
        // Grouped by source vertex
        prop_assert!(graph.edges.windows(2).all(|w| w[0].from <= w[1].from));
    }

    #[test]
    fn edge_lists_are_the_nearest(vertices in vertex_set(30), max_distance in 1.0f32..400.0) {
        let params = ProximityParams { max_distance, ..Default::default() };
        let graph = build(&vertices, &params);

        for (i, &a) in vertices.iter().enumerate() {
            let list: Vec<_> = graph.edges_from(i).collect();
            let in_range = vertices
                .iter()
                .enumerate()
                .filter(|&(j, &b)| j != i && a.distance(b) < max_distance)
                .count();
            prop_assert_eq!(list.len(), in_range.min(params.max_neighbors));

            // Nothing left out is closer than the farthest kept edge
            if let Some(farthest) = list.last() {
                let kept: Vec<usize> = list.iter().map(|e| e.to).collect();
                for (j, &b) in vertices.iter().enumerate() {
                    if j != i && !kept.contains(&j) {
                        prop_assert!(a.distance(b) >= farthest.distance);
                    }
                }
            }
        }
    }

    #[test]
    fn index_matches_brute_force(vertices in vertex_set(120), max_distance in 5.0f32..300.0) {
        let params = ProximityParams { max_distance, ..Default::default() };
        prop_assert_eq!(build_with_index(&vertices, &params), build_brute_force(&vertices, &params));
    }
}
