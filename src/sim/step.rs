//! Simulation step
//!
//! Moves every point by its velocity, then bounces it off the viewport edges.

use super::state::Constellation;

/// Advance the constellation by one step.
///
/// Each axis is checked independently after the move. A point outside
/// `[0, extent]` has that velocity component negated; its position is left
/// where it landed, so a point may sit just outside the bounds for a frame.
pub fn step(state: &mut Constellation) {
    let viewport = state.viewport;

    for point in &mut state.points {
        point.pos += point.vel;
        point.vel.x = reflect_axis(point.pos.x, point.vel.x, viewport.width);
        point.vel.y = reflect_axis(point.pos.y, point.vel.y, viewport.height);
    }

    state.step_count += 1;
    log::trace!("step {}", state.step_count);
}

/// Velocity component after the bounds check on one axis
#[inline]
pub fn reflect_axis(pos: f32, vel: f32, extent: f32) -> f32 {
    if pos < 0.0 || pos > extent { -vel } else { vel }
}
