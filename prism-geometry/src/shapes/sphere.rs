use glam::{Vec2, Vec3};

use super::{assert_segments, radial, ring_direction, stitch};
use crate::{MeshBuilder, MeshDescription};

/// UV sphere centered on the origin with `rings` latitude bands.
///
/// Both poles are rings of `segments` coincident vertices, one per fan
/// triangle, so each pole triangle gets its own `u`.
pub fn sphere(radius: f32, rings: u32, segments: u32, color: Vec3) -> MeshDescription {
    assert!(rings >= 2, "a sphere needs at least 2 rings, got {}", rings);
    assert_segments(segments);
    let mut builder = MeshBuilder::new();

    let south = builder.start_cycle(segments);
    for s in 0..segments {
        let u = (s as f32 + 0.5) / segments as f32;
        builder.emit(Vec3::NEG_Y * radius, color, Vec3::NEG_Y, Vec2::new(u, 1.0));
    }

    let mut lower = south;
    for r in 1..rings {
        let theta = std::f32::consts::PI * r as f32 / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let v = 1.0 - r as f32 / rings as f32;

        let ring = builder.start_cycle(segments + 1);
        for s in 0..=segments {
            let normal = radial(ring_direction(s, segments)) * sin_theta - Vec3::Y * cos_theta;
            let u = s as f32 / segments as f32;
            builder.emit(normal * radius, color, normal, Vec2::new(u, v));

            if s == 0 {
                continue;
            }
            if r == 1 {
                let s = s as i64;
                builder.tri(south.rel(s - 1), ring.rel(s), ring.rel(s - 1));
            } else {
                stitch(&mut builder, lower, ring, s);
            }
        }
        lower = ring;
    }

    let north = builder.start_cycle(segments);
    for s in 0..segments {
        let u = (s as f32 + 0.5) / segments as f32;
        builder.emit(Vec3::Y * radius, color, Vec3::Y, Vec2::new(u, 0.0));
        let s = s as i64;
        builder.tri(lower.rel(s), lower.rel(s + 1), north.rel(s));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let (rings, segments) = (6, 10);
        let mesh = sphere(1.0, rings, segments, Vec3::ONE);
        assert_eq!(
            mesh.vertex_count() as u32,
            2 * segments + (rings - 1) * (segments + 1)
        );
        assert_eq!(
            mesh.triangle_count() as u32,
            2 * segments + 2 * segments * (rings - 2)
        );
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let radius = 2.5;
        let mesh = sphere(radius, 8, 12, Vec3::ONE);
        for vertex in &mesh.vertices {
            assert!((vertex.position().length() - radius).abs() < 1e-5);
            assert!(vertex.normal().abs_diff_eq(vertex.position() / radius, 1e-5));
        }
    }

    #[test]
    #[should_panic(expected = "at least 2 rings")]
    fn test_single_ring_panics() {
        sphere(1.0, 1, 8, Vec3::ONE);
    }
}
