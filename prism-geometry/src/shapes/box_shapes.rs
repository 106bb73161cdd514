use glam::{Vec2, Vec3};

use crate::{MeshBuilder, MeshDescription};

/// Wall colors of the Cornell room: top, bottom, left, right, back.
pub const CORNELL_PALETTE: [Vec3; 5] = [
    Vec3::new(0.96, 0.93, 0.85),
    Vec3::new(0.64, 0.64, 0.64),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.76, 0.74, 0.68),
];

struct Face {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
}

// u x v == normal for every face.
const FACES: [Face; 6] = [
    Face { normal: Vec3::Y, u: Vec3::X, v: Vec3::NEG_Z },     // top
    Face { normal: Vec3::NEG_Y, u: Vec3::X, v: Vec3::Z },     // bottom
    Face { normal: Vec3::NEG_X, u: Vec3::Z, v: Vec3::Y },     // left
    Face { normal: Vec3::X, u: Vec3::NEG_Z, v: Vec3::Y },     // right
    Face { normal: Vec3::Z, u: Vec3::X, v: Vec3::Y },         // front
    Face { normal: Vec3::NEG_Z, u: Vec3::NEG_X, v: Vec3::Y }, // back
];

const FRONT: usize = 4;

const CORNERS: [(f32, f32, Vec2); 4] = [
    (-1.0, -1.0, Vec2::new(0.0, 1.0)),
    (1.0, -1.0, Vec2::new(1.0, 1.0)),
    (1.0, 1.0, Vec2::new(1.0, 0.0)),
    (-1.0, 1.0, Vec2::new(0.0, 0.0)),
];

fn emit_face(builder: &mut MeshBuilder, face: &Face, half_extent: Vec3, inward: bool, color: Vec3) {
    let normal = if inward { -face.normal } else { face.normal };
    let first = builder.vertex_count();
    for (su, sv, uv) in CORNERS {
        let position = (face.normal + face.u * su + face.v * sv) * half_extent;
        builder.emit(position, color, normal, uv);
    }
    builder.winding(inward);
    builder.quad(first, first + 1, first + 2, first + 3);
    builder.winding(false);
}

/// Axis-aligned box centered on the origin, four vertices per face.
/// Faces are emitted top, bottom, left, right, front, back.
pub fn cube(width: f32, height: f32, depth: f32, color: Vec3) -> MeshDescription {
    let half_extent = Vec3::new(width, height, depth) * 0.5;
    let mut builder = MeshBuilder::new();
    for face in &FACES {
        emit_face(&mut builder, face, half_extent, false, color);
    }
    builder.build()
}

/// Open-front room seen from the inside: five walls with inward normals,
/// colored from [`CORNELL_PALETTE`].
pub fn cornell_room(width: f32, height: f32, depth: f32) -> MeshDescription {
    let half_extent = Vec3::new(width, height, depth) * 0.5;
    let mut builder = MeshBuilder::new();
    let walls = FACES
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != FRONT)
        .map(|(_, face)| face);
    for (face, color) in walls.zip(CORNELL_PALETTE) {
        emit_face(&mut builder, face, half_extent, true, color);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_counts_and_top_face() {
        let mesh = cube(1.0, 1.0, 1.0, Vec3::ONE);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        for vertex in &mesh.vertices[0..4] {
            assert_eq!(vertex.normal(), Vec3::Y);
            assert_eq!(vertex.position().y, 0.5);
        }
    }

    #[test]
    fn test_cube_scales_per_axis() {
        let mesh = cube(2.0, 4.0, 6.0, Vec3::ONE);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_face_axes_are_right_handed() {
        for face in &FACES {
            assert_eq!(face.u.cross(face.v), face.normal);
        }
    }

    #[test]
    fn test_cornell_room_walls() {
        let mesh = cornell_room(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.index_count(), 30);

        // The left wall sits at -x, faces +x and is red.
        let left = &mesh.vertices[8..12];
        for vertex in left {
            assert_eq!(vertex.position().x, -0.5);
            assert_eq!(vertex.normal(), Vec3::X);
            assert_eq!(vertex.color, [1.0, 0.0, 0.0]);
        }
        // No front wall, whose inward normal would be -z.
        assert!(mesh.vertices.iter().all(|v| v.normal() != Vec3::NEG_Z));
    }
}
