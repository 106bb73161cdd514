use glam::{Mat4, Vec2, Vec3};

use super::{assert_segments, circular_cap, radial, ring_direction, stitch};
use crate::{MeshBuilder, MeshDescription};

/// Y-aligned cylinder centered on the origin: two caps plus a seam-duplicated side wall.
pub fn cylinder(radius: f32, height: f32, segments: u32, color: Vec3) -> MeshDescription {
    assert_segments(segments);
    let half = height * 0.5;
    let mut builder = MeshBuilder::new();

    for (offset, reverse) in [(half, false), (-half, true)] {
        builder.push_transform();
        builder.transform(Mat4::from_translation(Vec3::Y * offset));
        circular_cap(&mut builder, radius, segments, color, reverse);
        builder.pop_transform();
    }

    let bottom = builder.start_cycle(segments + 1);
    for s in 0..=segments {
        let normal = radial(ring_direction(s, segments));
        let u = s as f32 / segments as f32;
        builder.emit(normal * radius - Vec3::Y * half, color, normal, Vec2::new(u, 1.0));
    }

    let top = builder.start_cycle(segments + 1);
    for s in 0..=segments {
        let normal = radial(ring_direction(s, segments));
        let u = s as f32 / segments as f32;
        builder.emit(normal * radius + Vec3::Y * half, color, normal, Vec2::new(u, 0.0));
        if s > 0 {
            stitch(&mut builder, bottom, top, s);
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_counts() {
        let segments = 12;
        let mesh = cylinder(1.0, 2.0, segments, Vec3::ONE);
        let caps = 2 * (segments + 1);
        let side = 2 * (segments + 1);
        assert_eq!(mesh.vertex_count() as u32, caps + side);
        assert_eq!(mesh.triangle_count() as u32, 2 * segments + 2 * segments);
    }

    #[test]
    fn test_side_normals_are_radial() {
        let mesh = cylinder(0.5, 3.0, 8, Vec3::ONE);
        let side = &mesh.vertices[18..];
        for vertex in side {
            assert_eq!(vertex.normal().y, 0.0);
            assert!((vertex.normal().length() - 1.0).abs() < 1e-6);
        }
        assert_eq!(side[0].uv().x, 0.0);
        assert_eq!(side[8].uv().x, 1.0);
        assert_eq!(side[0].position(), side[8].position());
    }

    #[test]
    #[should_panic(expected = "at least 3 segments")]
    fn test_zero_segments_panics() {
        cylinder(1.0, 1.0, 0, Vec3::ONE);
    }
}
