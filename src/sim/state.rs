//! Constellation state and core simulation types
//!
//! A `Constellation` owns everything one background instance needs between
//! frames. Several instances can coexist; each has its own seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::VELOCITY_SPREAD;
use crate::graph::{self, ProximityGraph, ProximityParams};

/// A drifting point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Position in viewport pixels (origin top-left)
    pub pos: Vec2,
    /// Displacement per step
    pub vel: Vec2,
}

impl Point {
    pub const fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Uniform position over the viewport, velocity in `[-spread/2, spread/2)` per axis
    pub fn random<R: Rng>(rng: &mut R, viewport: Viewport, spread: f32) -> Self {
        let pos = Vec2::new(
            rng.random::<f32>() * viewport.width,
            rng.random::<f32>() * viewport.height,
        );
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * spread,
            (rng.random::<f32>() - 0.5) * spread,
        );
        Self { pos, vel }
    }
}

/// Viewport extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive bounds check on both axes
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// The pointer (mouse or first touch). Position only, never moves by itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub pos: Vec2,
}

/// One constellation instance
#[derive(Debug, Clone)]
pub struct Constellation {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Current reflection bounds
    pub viewport: Viewport,
    /// Drifting points (fixed population between initializations)
    pub points: Vec<Point>,
    /// Pointer, always the last vertex
    pub pointer: Pointer,
    /// Width of the symmetric initial velocity range
    pub velocity_spread: f32,
    /// Steps taken since construction
    pub step_count: u64,
    rng: Pcg32,
}

impl Constellation {
    /// Create an empty constellation with the pointer at the viewport centre
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self {
            seed,
            viewport,
            points: Vec::new(),
            pointer: Pointer {
                pos: viewport.center(),
            },
            velocity_spread: VELOCITY_SPREAD,
            step_count: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn with_velocity_spread(mut self, spread: f32) -> Self {
        self.velocity_spread = spread;
        self
    }

    /// Seed (or re-seed) `population` points over the current viewport
    pub fn initialize(&mut self, population: usize) {
        let viewport = self.viewport;
        let spread = self.velocity_spread;
        let rng = &mut self.rng;
        self.points = (0..population)
            .map(|_| Point::random(&mut *rng, viewport, spread))
            .collect();
        log::debug!(
            "Seeded {} points over {}x{}",
            population,
            viewport.width,
            viewport.height
        );
    }

    /// Change the bounds used for reflection and future seeding.
    /// Existing points are kept, even when they now sit outside.
    pub fn set_viewport_extent(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        self.pointer.pos = Vec2::new(x, y);
    }

    /// Advance every point by one step
    pub fn step(&mut self) {
        super::step::step(self);
    }

    /// Number of simulated points (N)
    pub fn population(&self) -> usize {
        self.points.len()
    }

    /// Vertex count of every frame: N + 1
    pub fn vertex_count(&self) -> usize {
        self.points.len() + 1
    }

    /// Index of the pointer in the vertex set
    pub fn pointer_index(&self) -> usize {
        self.points.len()
    }

    /// Snapshot of all point positions followed by the pointer
    pub fn vertices(&self) -> Vec<Vec2> {
        let mut vertices = Vec::with_capacity(self.vertex_count());
        vertices.extend(self.points.iter().map(|p| p.pos));
        vertices.push(self.pointer.pos);
        vertices
    }

    /// Build the proximity graph for the current snapshot
    pub fn compute_proximity_graph(&self, params: &ProximityParams) -> ProximityGraph {
        graph::build(&self.vertices(), params)
    }
}
