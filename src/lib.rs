//! Constellation - an animated point-and-line background
//!
//! Core modules:
//! - `sim`: Point simulation (drift, boundary bounce, pointer, viewport)
//! - `graph`: Proximity graph (k-nearest edges, triangles under a threshold)
//! - `frame`: One frame of work: step, snapshot, build graph, render
//! - `renderer`: Renderer trait plus the WebGPU implementation
//! - `platform`: Browser/native platform policy (device class)
//! - `settings`: Tunables with defaults

pub mod frame;
pub mod graph;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use frame::{FrameSummary, advance_frame};
pub use graph::{Edge, ProximityGraph, ProximityParams, Triangle};
pub use platform::DeviceClass;
pub use settings::Settings;
pub use sim::{Constellation, Point, Viewport};

/// Default configuration constants
pub mod consts {
    /// Points seeded on touch / constrained devices
    pub const TOUCH_POPULATION: usize = 30;
    /// Points seeded on desktop
    pub const DESKTOP_POPULATION: usize = 70;

    /// Proximity threshold in pixels
    pub const MAX_DISTANCE: f32 = 150.0;
    /// Edges kept per vertex
    pub const MAX_NEIGHBORS: usize = 5;

    /// Initial velocity per axis is `(r - 0.5) * VELOCITY_SPREAD`, r in [0, 1)
    pub const VELOCITY_SPREAD: f32 = 0.5;

    /// Rendered dot radius (points and pointer)
    pub const DOT_RADIUS: f32 = 3.0;
    /// Rendered edge width
    pub const LINE_WIDTH: f32 = 1.0;

    /// Vertex count above which the graph builder switches to an R-tree index
    pub const INDEX_THRESHOLD: usize = 256;
}
