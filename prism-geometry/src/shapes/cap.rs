use glam::{Vec2, Vec3};

use super::{assert_segments, radial, ring_direction};
use crate::MeshBuilder;

/// Disc of `segments` fan triangles in the local XZ plane, facing local +Y.
///
/// With `reverse` set the disc faces -Y instead: the normal is negated and
/// the winding flipped. Callers place the disc with the builder's transform
/// stack.
pub fn circular_cap(builder: &mut MeshBuilder, radius: f32, segments: u32, color: Vec3, reverse: bool) {
    assert_segments(segments);
    let normal = if reverse { Vec3::NEG_Y } else { Vec3::Y };
    builder.winding(reverse);

    builder.emit(Vec3::ZERO, color, normal, Vec2::splat(0.5));
    let center = builder.index();

    let rim = builder.start_cycle(segments);
    for s in 0..segments {
        let direction = ring_direction(s, segments);
        let uv = Vec2::new(0.5 + 0.5 * direction.x, 1.0 - (0.5 + 0.5 * direction.y));
        builder.emit(radial(direction) * radius, color, normal, uv);

        if s > 0 {
            builder.tri(center, rim.rel(s as i64 - 1), rim.rel(s as i64));
        }
    }
    builder.tri(center, rim.rel(segments as i64 - 1), rim.rel(0));

    builder.winding(false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_fan_closes_once() {
        let mut builder = MeshBuilder::new();
        circular_cap(&mut builder, 1.0, 6, Vec3::ONE, false);
        let mesh = builder.build();

        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.triangle_count(), 6);
        let wraps = mesh.triangles().filter(|t| *t == [0, 6, 1]).count();
        assert_eq!(wraps, 1);
    }

    #[test]
    fn test_reversed_cap_faces_down() {
        let mut builder = MeshBuilder::new();
        circular_cap(&mut builder, 2.0, 8, Vec3::ONE, true);
        let mesh = builder.build();

        for [a, b, c] in mesh.triangles() {
            let [pa, pb, pc] = [a, b, c].map(|i| mesh.vertices[i as usize].position());
            assert!((pb - pa).cross(pc - pa).y < 0.0);
        }
        assert!(mesh.vertices.iter().all(|v| v.normal() == Vec3::NEG_Y));
    }

    #[test]
    fn test_cap_uv_is_flipped_disc() {
        let mut builder = MeshBuilder::new();
        circular_cap(&mut builder, 1.0, 4, Vec3::ONE, false);
        let mesh = builder.build();

        assert_eq!(mesh.vertices[0].uv(), Vec2::splat(0.5));
        assert!(mesh.vertices[1].uv().abs_diff_eq(Vec2::new(1.0, 0.5), 1e-6));
        // Quarter turn: sin = 1 lands on the top edge of the image.
        assert!(mesh.vertices[2].uv().abs_diff_eq(Vec2::new(0.5, 0.0), 1e-6));
    }
}
