//! Point simulation module
//!
//! Owns the drifting points, the pointer and the viewport. This module must stay
//! pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by point index)
//! - No rendering or platform dependencies

pub mod state;
pub mod step;

pub use state::{Constellation, Point, Pointer, Viewport};
pub use step::{reflect_axis, step};
