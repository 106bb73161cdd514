//! In-memory device used by the scene integration tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

use prism_core::device::*;
use prism_core::{PrismError, PrismResult};

#[derive(Default)]
pub struct MockStats {
    pub buffers_created: usize,
    pub pipelines_created: usize,
    pub bind_groups: Vec<Vec<(u32, u64, Option<u64>)>>,
    pub waits: usize,
}

/// Hands out sequential ids and keeps buffer contents in memory.
#[derive(Clone)]
pub struct MockDevice {
    pub limits: DeviceLimits,
    pub stats: Rc<RefCell<MockStats>>,
}

impl MockDevice {
    pub fn with_alignment(alignment: u64) -> Self {
        Self {
            limits: DeviceLimits {
                min_uniform_buffer_offset_alignment: alignment,
            },
            stats: Rc::default(),
        }
    }
}

pub struct MockBuffer {
    pub usage: BufferUsage,
    pub data: Mutex<Vec<u8>>,
}

impl MockBuffer {
    pub fn bytes(&self, offset: u64, len: usize) -> Vec<u8> {
        let data = self.data.lock().unwrap();
        data[offset as usize..offset as usize + len].to_vec()
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }

    fn write_data(&self, offset: u64, bytes: &[u8]) -> PrismResult<()> {
        let mut data = self.data.lock().unwrap();
        let end = offset as usize + bytes.len();
        if end > data.len() {
            return Err(PrismError::InvalidArgument("write past end of buffer".to_string()));
        }
        data[offset as usize..end].copy_from_slice(bytes);
        Ok(())
    }

    fn read_data(&self, offset: u64, bytes: &mut [u8]) -> PrismResult<()> {
        let data = self.data.lock().unwrap();
        let end = offset as usize + bytes.len();
        bytes.copy_from_slice(&data[offset as usize..end]);
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockPipeline {
    pub id: usize,
    pub polygon_mode: PolygonMode,
    pub cull_mode: CullMode,
    pub vertex_stride: u32,
}

pub struct MockHandle;

impl ShaderModule for MockHandle {}
impl RenderPass for MockHandle {}
impl PipelineLayout for MockHandle {}
impl BindGroupLayout for MockHandle {}
impl BindGroup for MockHandle {}
impl GraphicsPipeline for MockPipeline {}

impl Device for MockDevice {
    type Buffer = MockBuffer;
    type ShaderModule = MockHandle;
    type RenderPass = MockHandle;
    type PipelineLayout = MockHandle;
    type GraphicsPipeline = MockPipeline;
    type BindGroupLayout = MockHandle;
    type BindGroup = MockHandle;

    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn wait_idle(&self) -> PrismResult<()> {
        self.stats.borrow_mut().waits += 1;
        Ok(())
    }

    fn create_shader_module(&self, _code: &[u32]) -> PrismResult<MockHandle> {
        Ok(MockHandle)
    }

    fn create_render_pass(&self, _descriptor: RenderPassDescriptor) -> PrismResult<MockHandle> {
        Ok(MockHandle)
    }

    fn create_pipeline_layout(&self, _descriptor: PipelineLayoutDescriptor<Self>) -> PrismResult<MockHandle> {
        Ok(MockHandle)
    }

    fn create_graphics_pipeline(&self, descriptor: GraphicsPipelineDescriptor<Self>) -> PrismResult<MockPipeline> {
        let mut stats = self.stats.borrow_mut();
        stats.pipelines_created += 1;
        Ok(MockPipeline {
            id: stats.pipelines_created,
            polygon_mode: descriptor.primitive.polygon_mode,
            cull_mode: descriptor.primitive.cull_mode,
            vertex_stride: descriptor.vertex_layout.map_or(0, |l| l.array_stride),
        })
    }

    fn create_buffer(&self, descriptor: BufferDescriptor) -> PrismResult<MockBuffer> {
        self.stats.borrow_mut().buffers_created += 1;
        Ok(MockBuffer {
            usage: descriptor.usage,
            data: Mutex::new(vec![0; descriptor.size as usize]),
        })
    }

    fn create_bind_group_layout(&self, _descriptor: BindGroupLayoutDescriptor) -> PrismResult<MockHandle> {
        Ok(MockHandle)
    }

    fn create_bind_group(&self, descriptor: BindGroupDescriptor<Self>) -> PrismResult<MockHandle> {
        let entries = descriptor
            .entries
            .iter()
            .map(|entry| match entry.resource {
                BindingResource::Buffer { offset, size, .. } => (entry.binding, offset, size),
            })
            .collect();
        self.stats.borrow_mut().bind_groups.push(entries);
        Ok(MockHandle)
    }
}
