use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use prism_core::device::{VertexAttribute, VertexFormat, VertexLayout};
use prism_core::{PrismError, PrismResult};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3], // 0
    pub color: [f32; 3],    // 12
    pub normal: [f32; 3],   // 24
    pub uv: [f32; 2],       // 36, 44 bytes total
}

impl Vertex {
    pub fn new(position: Vec3, color: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }

    /// Attribute layout matching the `#[repr(C)]` field order, locations 0..=3.
    pub fn layout() -> VertexLayout {
        let formats = [
            VertexFormat::Float32x3,
            VertexFormat::Float32x3,
            VertexFormat::Float32x3,
            VertexFormat::Float32x2,
        ];
        let mut offset = 0;
        let attributes = formats
            .iter()
            .enumerate()
            .map(|(location, &format)| {
                let attribute = VertexAttribute {
                    location: location as u32,
                    format,
                    offset,
                };
                offset += format.size();
                attribute
            })
            .collect();

        VertexLayout {
            array_stride: std::mem::size_of::<Vertex>() as u32,
            attributes,
        }
    }
}

/// CPU-side triangle list produced by [`crate::MeshBuilder`].
#[derive(Clone, Debug, Default)]
pub struct MeshDescription {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshDescription {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.vertices.iter().map(Vertex::position);
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    pub fn validate(&self) -> PrismResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(PrismError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let count = self.vertices.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(PrismError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_offsets() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 44);
        let offsets: Vec<u32> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36]);
        assert_eq!(std::mem::size_of::<Vertex>(), 44);
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let vertex = Vertex::default();
        let mut mesh = MeshDescription {
            vertices: vec![vertex; 3],
            indices: vec![0, 1, 2],
        };
        assert!(mesh.validate().is_ok());

        mesh.indices = vec![0, 1, 3];
        assert!(matches!(mesh.validate(), Err(PrismError::InvalidMesh(_))));

        mesh.indices = vec![0, 1];
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_bounds() {
        let mesh = MeshDescription {
            vertices: vec![
                Vertex::new(Vec3::new(-1.0, 2.0, 0.0), Vec3::ONE, Vec3::Y, Vec2::ZERO),
                Vertex::new(Vec3::new(3.0, -2.0, 1.0), Vec3::ONE, Vec3::Y, Vec2::ZERO),
            ],
            indices: vec![],
        };
        assert_eq!(
            mesh.bounds(),
            Some((Vec3::new(-1.0, -2.0, 0.0), Vec3::new(3.0, 2.0, 1.0)))
        );
        assert_eq!(MeshDescription::default().bounds(), None);
    }
}
