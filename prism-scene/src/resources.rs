use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use prism_core::device::{Buffer, BufferDescriptor, BufferUsage};
use prism_core::{Device, PrismError, PrismResult};
use prism_geometry::MeshDescription;

use crate::mesh::{GpuMesh, MeshInstance, MeshInstanceUniforms};
use crate::pipelines::{PipelineVariantCache, ShaderKind};
use crate::uniform::SharedUniformBuffer;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_projection: Mat4,
    pub eye: Vec4,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_projection: Mat4::IDENTITY,
            eye: Vec4::W,
        }
    }
}

/// Everything the external recorder needs for one indexed draw.
pub struct DrawItem<'a, D: Device> {
    pub pipeline: &'a D::GraphicsPipeline,
    pub bind_group: &'a D::BindGroup,
    pub mesh: &'a GpuMesh<D>,
    pub index_count: u32,
}

/// Owner of every long-lived GPU resource of a scene.
///
/// Fields are declared in reverse construction order, so an implicit drop
/// releases instances before the buffers and pipelines they reference.
/// [`teardown`](Self::teardown) does the same after waiting for the GPU.
pub struct SceneResources<D: Device> {
    instances: Vec<MeshInstance<D>>,
    meshes: Vec<Arc<GpuMesh<D>>>,
    camera: D::Buffer,
    uniforms: SharedUniformBuffer<D>,
    pipelines: PipelineVariantCache<D>,
    bind_group_layout: D::BindGroupLayout,
}

impl<D: Device> SceneResources<D> {
    /// `bind_group_layout` must describe the camera and instance bindings of
    /// [`MeshInstance`]. `max_instances` fixes the uniform arena capacity.
    pub fn new(
        device: &D,
        bind_group_layout: D::BindGroupLayout,
        pipelines: PipelineVariantCache<D>,
        max_instances: u32,
    ) -> PrismResult<Self> {
        let uniforms = SharedUniformBuffer::new(
            device,
            std::mem::size_of::<MeshInstanceUniforms>() as u64,
            max_instances,
        )?;
        let camera = device.create_buffer(BufferDescriptor {
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            mapped_at_creation: true,
        })?;
        camera.write_data(0, bytemuck::bytes_of(&CameraUniforms::default()))?;

        Ok(Self {
            instances: Vec::new(),
            meshes: Vec::new(),
            camera,
            uniforms,
            pipelines,
            bind_group_layout,
        })
    }

    pub fn add_mesh(&mut self, device: &D, description: &MeshDescription) -> PrismResult<Arc<GpuMesh<D>>> {
        let mesh = Arc::new(GpuMesh::upload(device, description)?);
        self.meshes.push(Arc::clone(&mesh));
        Ok(mesh)
    }

    /// Places `mesh` in the next free uniform slot. Returns the instance index.
    pub fn add_instance(
        &mut self,
        device: &D,
        mesh: Arc<GpuMesh<D>>,
        shader: ShaderKind,
        uniforms: MeshInstanceUniforms,
    ) -> PrismResult<usize> {
        let slot_index = self.instances.len() as u32;
        if slot_index >= self.uniforms.capacity() {
            return Err(PrismError::InvalidArgument(format!(
                "all {} instance slots are in use",
                self.uniforms.capacity()
            )));
        }

        let mut instance = MeshInstance::new(
            device,
            mesh,
            shader,
            &self.bind_group_layout,
            &self.camera,
            &self.uniforms,
            slot_index,
        )?;
        instance.set_uniforms(&self.uniforms, uniforms)?;
        self.instances.push(instance);
        Ok(slot_index as usize)
    }

    pub fn set_instance_uniforms(&mut self, index: usize, uniforms: MeshInstanceUniforms) -> PrismResult<()> {
        let instance = self.instances.get_mut(index).ok_or_else(|| {
            PrismError::InvalidArgument(format!("no mesh instance {}", index))
        })?;
        instance.set_uniforms(&self.uniforms, uniforms)
    }

    pub fn set_camera(&self, camera: &CameraUniforms) -> PrismResult<()> {
        self.camera.write_data(0, bytemuck::bytes_of(camera))
    }

    pub fn pipelines(&self) -> &PipelineVariantCache<D> {
        &self.pipelines
    }

    pub fn pipelines_mut(&mut self) -> &mut PipelineVariantCache<D> {
        &mut self.pipelines
    }

    pub fn uniforms(&self) -> &SharedUniformBuffer<D> {
        &self.uniforms
    }

    pub fn instances(&self) -> &[MeshInstance<D>] {
        &self.instances
    }

    pub fn meshes(&self) -> &[Arc<GpuMesh<D>>] {
        &self.meshes
    }

    /// One draw per instance, using the instance's shader under the current
    /// polygon and cull modes.
    pub fn draws(&self) -> impl Iterator<Item = DrawItem<'_, D>> + '_ {
        let polygon_mode = self.pipelines.polygon_mode();
        let cull_mode = self.pipelines.cull_mode();
        self.instances.iter().map(move |instance| DrawItem {
            pipeline: self.pipelines.variant(instance.shader, polygon_mode, cull_mode),
            bind_group: instance.bind_group(),
            mesh: &instance.mesh,
            index_count: instance.mesh.index_count(),
        })
    }

    /// Waits for the device, then releases resources in reverse construction order.
    pub fn teardown(self, device: &D) -> PrismResult<()> {
        device.wait_idle()?;

        let Self {
            instances,
            meshes,
            camera,
            uniforms,
            pipelines,
            bind_group_layout,
        } = self;

        log::info!("Releasing {} mesh instances", instances.len());
        drop(instances);
        log::info!("Releasing {} meshes", meshes.len());
        drop(meshes);
        drop(camera);
        log::info!("Releasing shared uniform buffer ({} slots)", uniforms.capacity());
        drop(uniforms);
        log::info!("Releasing pipeline variants");
        drop(pipelines);
        drop(bind_group_layout);
        Ok(())
    }
}
