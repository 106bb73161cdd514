//! Procedural mesh generators.
//!
//! Every generator is a pure function of its parameters that drives a
//! [`MeshBuilder`](crate::MeshBuilder). Front faces are counter-clockwise seen
//! from the side the vertex normal points to. Rings that need a texture seam
//! hold `segments + 1` vertices, the last one repeating the first position
//! with `u = 1`.

mod box_shapes;
mod cap;
mod cylinder;
mod sphere;
mod tube;

pub use box_shapes::{cornell_room, cube, CORNELL_PALETTE};
pub use cap::circular_cap;
pub use cylinder::cylinder;
pub use sphere::sphere;
pub use tube::bezier_tube;

use glam::{Vec2, Vec3};

use crate::{Cycle, MeshBuilder};

/// `(cos φ, sin φ)` for segment `s`. The seam index `segments` maps back onto 0
/// so duplicated seam vertices share bit-identical positions.
fn ring_direction(s: u32, segments: u32) -> Vec2 {
    let phi = std::f32::consts::TAU * (s % segments) as f32 / segments as f32;
    Vec2::new(phi.cos(), phi.sin())
}

/// Ring direction in a local frame whose axis is +Y.
fn radial(direction: Vec2) -> Vec3 {
    Vec3::new(direction.x, 0.0, -direction.y)
}

fn assert_segments(segments: u32) {
    assert!(segments >= 3, "at least 3 segments are required, got {}", segments);
}

/// Quad between ring vertices `s - 1` and `s` of two consecutive rings.
fn stitch(builder: &mut MeshBuilder, lower: Cycle, upper: Cycle, s: u32) {
    let s = s as i64;
    builder.quad(lower.rel(s - 1), lower.rel(s), upper.rel(s), upper.rel(s - 1));
}
