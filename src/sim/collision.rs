//! Proximity collision and screen wrap
//!
//! Contact is circle proximity, not impulse physics. Two entities touch once
//! their centers are closer than the sum of their *half* radii, which lets
//! sprites overlap a little before anything registers.

use glam::Vec2;

use super::entity::Entity;
use crate::Viewport;

/// True iff the centers are closer than `a_radius / 2 + b_radius / 2`
#[inline]
pub fn intersects(a_pos: Vec2, b_pos: Vec2, a_radius: f32, b_radius: f32) -> bool {
    let padding = a_radius / 2.0 + b_radius / 2.0;
    a_pos.distance(b_pos) < padding
}

/// [`intersects`] for two entities. Readiness filtering is the caller's job.
#[inline]
pub fn entities_intersect(a: &Entity, b: &Entity) -> bool {
    intersects(a.position, b.position, a.physics.radius, b.physics.radius)
}

/// Toroidal wrap with a margin of `radius / 2` on every edge.
///
/// A position past `extent + margin` reappears at `-margin` and vice versa,
/// so the result always lies in `[-margin, extent + margin]` on both axes.
pub fn screen_wrap(pos: Vec2, radius: f32, viewport: &Viewport) -> Vec2 {
    let margin = radius / 2.0;
    Vec2::new(
        wrap_axis(pos.x, viewport.width, margin),
        wrap_axis(pos.y, viewport.height, margin),
    )
}

#[inline]
fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
    if value > extent + margin {
        -margin
    } else if value < -margin {
        extent + margin
    } else {
        value
    }
}

/// Wrap an entity in place using its own radius
pub fn wrap_entity(entity: &mut Entity, viewport: &Viewport) {
    entity.position = screen_wrap(entity.position, entity.physics.radius, viewport);
}
