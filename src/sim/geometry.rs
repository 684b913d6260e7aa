//! Circle collision helpers
//!
//! Everything that collides is approximated as a circle: bullets, hostiles,
//! nests, and the rocket (inscribed circle of its bounding box).

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// True iff the circles strictly overlap. Touching circles do not collide.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    let offset = to - from;
    let len = offset.length();
    (len > 0.0).then(|| offset / len)
}

/// Scale a point from one viewport size to another
#[inline]
pub fn rescale(pos: Vec2, ratio: Vec2) -> Vec2 {
    pos * ratio
}
