use ash::vk;
use gpu_allocator::vulkan::Allocator;
use prism_core::device::*;
use prism_core::{PrismError, PrismResult};
use std::sync::{Arc, Mutex};

use crate::instance::VulkanInstanceInner;

pub struct VulkanDeviceInner {
    pub allocator: Option<Arc<Mutex<Allocator>>>,
    pub descriptor_pool: vk::DescriptorPool,
    pub graphics_queue_index: u32,
    pub graphics_queue: vk::Queue,
    pub physical_device: vk::PhysicalDevice,
    pub limits: DeviceLimits,
    /// `fillModeNonSolid` was enabled, so `PolygonMode::Line` rasterizes as wireframe.
    pub supports_wireframe: bool,
    pub device: ash::Device,
    pub instance: Arc<VulkanInstanceInner>,
}

#[derive(Clone)]
pub struct VulkanDevice {
    pub inner: Arc<VulkanDeviceInner>,
}

impl std::ops::Deref for VulkanDevice {
    type Target = VulkanDeviceInner;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

const MAX_BIND_GROUPS: u32 = 1024;

impl VulkanDevice {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        instance: Arc<VulkanInstanceInner>,
        device: ash::Device,
        physical_device: vk::PhysicalDevice,
        graphics_queue_index: u32,
        allocator: Allocator,
        limits: DeviceLimits,
        supports_wireframe: bool,
    ) -> PrismResult<Self> {
        let pool_sizes = [vk::DescriptorPoolSize {
            ty: vk::DescriptorType::UNIFORM_BUFFER,
            descriptor_count: MAX_BIND_GROUPS * 2,
        }];

        let pool_info = vk::DescriptorPoolCreateInfo {
            pool_size_count: pool_sizes.len() as u32,
            p_pool_sizes: pool_sizes.as_ptr(),
            max_sets: MAX_BIND_GROUPS,
            ..Default::default()
        };

        let descriptor_pool = match unsafe { device.create_descriptor_pool(&pool_info, None) } {
            Ok(pool) => pool,
            Err(e) => {
                drop(allocator);
                unsafe { device.destroy_device(None) };
                return Err(PrismError::DeviceCreationFailed(format!(
                    "Failed to create descriptor pool: {}",
                    e
                )));
            }
        };

        let graphics_queue = unsafe { device.get_device_queue(graphics_queue_index, 0) };

        Ok(Self {
            inner: Arc::new(VulkanDeviceInner {
                allocator: Some(Arc::new(Mutex::new(allocator))),
                descriptor_pool,
                graphics_queue_index,
                graphics_queue,
                physical_device,
                limits,
                supports_wireframe,
                device,
                instance,
            }),
        })
    }

    fn allocator(&self) -> PrismResult<&Arc<Mutex<Allocator>>> {
        self.inner
            .allocator
            .as_ref()
            .ok_or_else(|| PrismError::BackendError("Allocator not initialized".to_string()))
    }
}

impl Drop for VulkanDeviceInner {
    fn drop(&mut self) {
        unsafe {
            log::info!("Destroying Vulkan Device and Descriptor Pool");
            self.allocator.take();
            self.device.destroy_descriptor_pool(self.descriptor_pool, None);
            self.device.destroy_device(None);
        }
    }
}

impl prism_core::Device for VulkanDevice {
    type Buffer = crate::VulkanBuffer;
    type ShaderModule = crate::VulkanShaderModule;
    type RenderPass = crate::VulkanRenderPass;
    type PipelineLayout = crate::VulkanPipelineLayout;
    type GraphicsPipeline = crate::VulkanGraphicsPipeline;
    type BindGroupLayout = VulkanBindGroupLayout;
    type BindGroup = VulkanBindGroup;

    fn limits(&self) -> DeviceLimits {
        self.inner.limits
    }

    fn wait_idle(&self) -> PrismResult<()> {
        unsafe {
            self.inner
                .device
                .device_wait_idle()
                .map_err(|e| PrismError::BackendError(format!("Device wait idle failed: {}", e)))
        }
    }

    fn create_shader_module(&self, code: &[u32]) -> PrismResult<Self::ShaderModule> {
        self.create_shader_module_impl(code)
    }

    fn create_render_pass(&self, descriptor: RenderPassDescriptor) -> PrismResult<Self::RenderPass> {
        self.create_render_pass_impl(descriptor)
    }

    fn create_pipeline_layout(&self, descriptor: PipelineLayoutDescriptor<Self>) -> PrismResult<Self::PipelineLayout> {
        self.create_pipeline_layout_impl(descriptor)
    }

    fn create_graphics_pipeline(&self, descriptor: GraphicsPipelineDescriptor<Self>) -> PrismResult<Self::GraphicsPipeline> {
        self.create_graphics_pipeline_impl(descriptor)
    }

    fn create_buffer(&self, descriptor: BufferDescriptor) -> PrismResult<Self::Buffer> {
        self.create_buffer_impl(descriptor)
    }

    fn create_bind_group_layout(&self, descriptor: BindGroupLayoutDescriptor) -> PrismResult<Self::BindGroupLayout> {
        self.create_bind_group_layout_impl(descriptor)
    }

    fn create_bind_group(&self, descriptor: BindGroupDescriptor<Self>) -> PrismResult<Self::BindGroup> {
        self.create_bind_group_impl(descriptor)
    }
}

mod resource;
mod pipeline;
mod descriptor;

pub use descriptor::{VulkanBindGroup, VulkanBindGroupLayout};
