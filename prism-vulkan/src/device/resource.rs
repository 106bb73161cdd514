use ash::vk;
use gpu_allocator::vulkan::*;
use gpu_allocator::MemoryLocation;
use prism_core::device::{BufferDescriptor, BufferUsage};
use prism_core::{PrismError, PrismResult};

use crate::VulkanDevice;

fn map_buffer_usage(usage: BufferUsage) -> vk::BufferUsageFlags {
    const TABLE: [(BufferUsage, vk::BufferUsageFlags); 6] = [
        (BufferUsage::VERTEX, vk::BufferUsageFlags::VERTEX_BUFFER),
        (BufferUsage::INDEX, vk::BufferUsageFlags::INDEX_BUFFER),
        (BufferUsage::UNIFORM, vk::BufferUsageFlags::UNIFORM_BUFFER),
        (BufferUsage::STORAGE, vk::BufferUsageFlags::STORAGE_BUFFER),
        (BufferUsage::COPY_SRC, vk::BufferUsageFlags::TRANSFER_SRC),
        (BufferUsage::COPY_DST, vk::BufferUsageFlags::TRANSFER_DST),
    ];
    TABLE
        .iter()
        .filter(|(ours, _)| usage.contains(*ours))
        .fold(vk::BufferUsageFlags::empty(), |flags, (_, vk_flag)| flags | *vk_flag)
}

impl VulkanDevice {
    pub fn create_buffer_impl(&self, descriptor: BufferDescriptor) -> PrismResult<crate::VulkanBuffer> {
        if descriptor.size == 0 {
            return Err(PrismError::ResourceCreationFailed("Buffer size must be non-zero".to_string()));
        }

        let create_info = vk::BufferCreateInfo {
            size: descriptor.size,
            usage: map_buffer_usage(descriptor.usage),
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        };

        let buffer = unsafe {
            self.inner.device.create_buffer(&create_info, None)
                .map_err(|e| PrismError::ResourceCreationFailed(format!("Failed to create buffer: {}", e)))?
        };

        let requirements = unsafe { self.inner.device.get_buffer_memory_requirements(buffer) };
        let location = if descriptor.mapped_at_creation { MemoryLocation::CpuToGpu } else { MemoryLocation::GpuOnly };

        let allocation = self
            .allocator()
            .and_then(|allocator| {
                allocator
                    .lock()
                    .map_err(|_| PrismError::BackendError("Allocator lock poisoned".to_string()))?
                    .allocate(&AllocationCreateDesc {
                        name: "prism_buffer",
                        requirements,
                        location,
                        linear: true,
                        allocation_scheme: AllocationScheme::GpuAllocatorManaged,
                    })
                    .map_err(|e| match e {
                        gpu_allocator::AllocationError::OutOfMemory => PrismError::OutOfMemory,
                        other => PrismError::BackendError(format!("Failed to allocate buffer memory: {}", other)),
                    })
            });
        let allocation = match allocation {
            Ok(allocation) => allocation,
            Err(e) => {
                unsafe { self.inner.device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        // From here on the buffer and its memory are released by `VulkanBuffer::drop`.
        let buffer = crate::VulkanBuffer {
            buffer,
            allocation,
            size: descriptor.size,
            device: self.clone(),
        };

        unsafe {
            self.inner.device.bind_buffer_memory(buffer.buffer, buffer.allocation.memory(), buffer.allocation.offset())
                .map_err(|e| PrismError::BackendError(format!("Failed to bind buffer memory: {}", e)))?;
        }

        log::debug!("Created buffer of {} bytes ({:?})", descriptor.size, location);
        Ok(buffer)
    }
}
