use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::{MeshDescription, Vertex};

/// A ring of `length` consecutive vertices addressed modulo its length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cycle {
    pub start: u32,
    pub length: u32,
}

impl Cycle {
    /// Index of the `i`-th ring vertex. Wraps in both directions.
    pub fn rel(&self, i: i64) -> u32 {
        let length = self.length as i64;
        self.start + (((i % length) + length) % length) as u32
    }
}

/// Append-only vertex/index assembler with a transform stack.
///
/// `build` consumes the builder, so a builder is used for exactly one mesh.
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    transforms: Vec<Mat4>,
    reverse_winding: bool,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            transforms: vec![Mat4::IDENTITY],
            reverse_winding: false,
        }
    }

    fn top(&self) -> Mat4 {
        // The root frame can never be popped.
        self.transforms[self.transforms.len() - 1]
    }

    /// Appends `v` with its position and normal mapped through the active transform.
    pub fn vertex(&mut self, v: Vertex) {
        let top = self.top();
        let position = top.transform_point3(v.position());
        let normal = Mat3::from_mat4(top) * v.normal();
        self.vertices.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            ..v
        });
    }

    pub fn emit(&mut self, position: Vec3, color: Vec3, normal: Vec3, uv: Vec2) {
        self.vertex(Vertex::new(position, color, normal, uv));
    }

    /// Index of the most recently emitted vertex.
    pub fn index(&self) -> u32 {
        debug_assert!(!self.vertices.is_empty(), "no vertex emitted yet");
        self.vertices.len() as u32 - 1
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn push_transform(&mut self) {
        let top = self.top();
        self.transforms.push(top);
    }

    pub fn pop_transform(&mut self) {
        assert!(
            self.transforms.len() > 1,
            "pop_transform without a matching push_transform"
        );
        self.transforms.pop();
    }

    /// Right-multiplies the active transform, so `mat` is expressed in the current local frame.
    pub fn transform(&mut self, mat: Mat4) {
        let last = self.transforms.len() - 1;
        self.transforms[last] *= mat;
    }

    pub fn transform3(&mut self, mat: Mat3) {
        self.transform(Mat4::from_mat3(mat));
    }

    /// Starts a ring at the current vertex count. Emit its `length` vertices afterwards.
    pub fn start_cycle(&self, length: u32) -> Cycle {
        assert!(length > 0, "a cycle needs at least one vertex");
        Cycle {
            start: self.vertex_count(),
            length,
        }
    }

    /// Flips every following triangle from `a, b, c` to `a, c, b` while set.
    pub fn winding(&mut self, reverse: bool) {
        self.reverse_winding = reverse;
    }

    pub fn tri(&mut self, a: u32, b: u32, c: u32) {
        if self.reverse_winding {
            self.indices.extend_from_slice(&[a, c, b]);
        } else {
            self.indices.extend_from_slice(&[a, b, c]);
        }
    }

    pub fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.tri(a, b, c);
        self.tri(c, d, a);
    }

    pub fn build(self) -> MeshDescription {
        debug_assert_eq!(self.transforms.len(), 1, "unbalanced push_transform");
        MeshDescription {
            vertices: self.vertices,
            indices: self.indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(position: Vec3) -> Vertex {
        Vertex::new(position, Vec3::ONE, Vec3::Y, Vec2::ZERO)
    }

    #[test]
    fn test_cycle_rel_wraps_both_ways() {
        let cycle = Cycle { start: 10, length: 4 };
        assert_eq!(cycle.rel(0), 10);
        assert_eq!(cycle.rel(3), 13);
        assert_eq!(cycle.rel(4), 10);
        assert_eq!(cycle.rel(9), 11);
        assert_eq!(cycle.rel(-1), 13);
        assert_eq!(cycle.rel(-6), 12);
    }

    #[test]
    fn test_start_cycle_records_vertex_count() {
        let mut builder = MeshBuilder::new();
        builder.vertex(plain(Vec3::ZERO));
        builder.vertex(plain(Vec3::X));
        let cycle = builder.start_cycle(8);
        assert_eq!(cycle, Cycle { start: 2, length: 8 });
        assert_eq!(builder.index(), 1);
    }

    #[test]
    fn test_reverse_winding_swaps_last_two() {
        let mut builder = MeshBuilder::new();
        builder.tri(0, 1, 2);
        builder.winding(true);
        builder.tri(0, 1, 2);
        builder.quad(4, 5, 6, 7);
        builder.winding(false);
        builder.quad(4, 5, 6, 7);
        let mesh = builder.build();
        assert_eq!(
            mesh.indices,
            vec![0, 1, 2, 0, 2, 1, 4, 6, 5, 6, 4, 7, 4, 5, 6, 6, 7, 4]
        );
    }

    #[test]
    fn test_transform_applies_to_position_not_normal_translation() {
        let mut builder = MeshBuilder::new();
        builder.push_transform();
        builder.transform(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
        builder.transform3(Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2));
        builder.vertex(plain(Vec3::X));
        builder.pop_transform();
        builder.vertex(plain(Vec3::X));
        let mesh = builder.build();

        // Rotation is applied in the translated local frame.
        assert!(mesh.vertices[0].position().abs_diff_eq(Vec3::new(0.0, 6.0, 0.0), 1e-6));
        assert!(mesh.vertices[0].normal().abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-6));
        assert_eq!(mesh.vertices[1].position(), Vec3::X);
        assert_eq!(mesh.vertices[1].normal(), Vec3::Y);
    }

    #[test]
    #[should_panic(expected = "without a matching push_transform")]
    fn test_pop_root_frame_panics() {
        let mut builder = MeshBuilder::new();
        builder.pop_transform();
    }
}
