use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use prism_core::device::*;
use prism_core::{PrismError, PrismResult};
use prism_geometry::{MeshDescription, Vertex};

use crate::pipelines::ShaderKind;
use crate::uniform::{SharedUniformBuffer, UniformBufferSlot};

/// Vertex and index buffers of one uploaded [`MeshDescription`].
pub struct GpuMesh<D: Device> {
    pub vertex_buffer: D::Buffer,
    pub index_buffer: D::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl<D: Device> GpuMesh<D> {
    pub fn upload(device: &D, description: &MeshDescription) -> PrismResult<Self> {
        description.validate()?;
        if description.indices.is_empty() {
            return Err(PrismError::InvalidMesh("mesh has no triangles".to_string()));
        }

        let vertex_buffer = device.create_buffer(BufferDescriptor {
            size: std::mem::size_of_val(description.vertices.as_slice()) as u64,
            usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
            mapped_at_creation: true,
        })?;
        vertex_buffer.write_data(0, bytemuck::cast_slice(&description.vertices))?;

        let index_buffer = device.create_buffer(BufferDescriptor {
            size: std::mem::size_of_val(description.indices.as_slice()) as u64,
            usage: BufferUsage::INDEX | BufferUsage::COPY_DST,
            mapped_at_creation: true,
        })?;
        index_buffer.write_data(0, bytemuck::cast_slice(&description.indices))?;

        log::debug!(
            "Uploaded mesh: {} vertices, {} indices",
            description.vertex_count(),
            description.index_count()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_count: description.vertex_count() as u32,
            index_count: description.index_count() as u32,
        })
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Count for the indexed draw of this mesh.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_stride() -> u64 {
        std::mem::size_of::<Vertex>() as u64
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshInstanceUniforms {
    pub color: Vec4,
    pub model: Mat4,
    /// x: roughness, y: metallic, z: ambient occlusion, w: unused.
    pub material_factors: Vec4,
}

impl Default for MeshInstanceUniforms {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            model: Mat4::IDENTITY,
            material_factors: Vec4::new(0.5, 0.0, 1.0, 0.0),
        }
    }
}

/// Binding points of the per-instance bind group.
pub const CAMERA_BINDING: u32 = 0;
pub const INSTANCE_BINDING: u32 = 1;

/// A placed mesh with its own uniform slot and bind group.
pub struct MeshInstance<D: Device> {
    pub mesh: Arc<GpuMesh<D>>,
    pub shader: ShaderKind,
    slot_index: u32,
    slot: UniformBufferSlot,
    bind_group: D::BindGroup,
    uniforms: MeshInstanceUniforms,
}

impl<D: Device> MeshInstance<D> {
    /// The bind group exposes `camera` at [`CAMERA_BINDING`] and slot `slot_index`
    /// of `uniforms` at [`INSTANCE_BINDING`].
    pub fn new(
        device: &D,
        mesh: Arc<GpuMesh<D>>,
        shader: ShaderKind,
        layout: &D::BindGroupLayout,
        camera: &D::Buffer,
        uniforms: &SharedUniformBuffer<D>,
        slot_index: u32,
    ) -> PrismResult<Self> {
        let slot = uniforms.slot(slot_index);
        let bind_group = device.create_bind_group(BindGroupDescriptor {
            layout,
            entries: vec![
                BindGroupEntry {
                    binding: CAMERA_BINDING,
                    resource: BindingResource::Buffer {
                        buffer: camera,
                        offset: 0,
                        size: None,
                    },
                },
                BindGroupEntry {
                    binding: INSTANCE_BINDING,
                    resource: BindingResource::Buffer {
                        buffer: uniforms.buffer(),
                        offset: slot.offset,
                        size: Some(slot.size),
                    },
                },
            ],
        })?;

        let instance = Self {
            mesh,
            shader,
            slot_index,
            slot,
            bind_group,
            uniforms: MeshInstanceUniforms::default(),
        };
        uniforms.write_pod(slot_index, &instance.uniforms)?;
        Ok(instance)
    }

    pub fn slot(&self) -> UniformBufferSlot {
        self.slot
    }

    pub fn bind_group(&self) -> &D::BindGroup {
        &self.bind_group
    }

    pub fn uniforms(&self) -> &MeshInstanceUniforms {
        &self.uniforms
    }

    pub fn set_uniforms(
        &mut self,
        buffer: &SharedUniformBuffer<D>,
        uniforms: MeshInstanceUniforms,
    ) -> PrismResult<()> {
        self.uniforms = uniforms;
        buffer.write_pod(self.slot_index, &self.uniforms)
    }
}
