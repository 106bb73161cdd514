use ash::vk;
use gpu_allocator::vulkan::*;
use prism_core::{PrismError, PrismResult};

use crate::VulkanDevice;

pub struct VulkanBuffer {
    pub buffer: vk::Buffer,
    pub allocation: Allocation,
    pub size: u64,
    pub device: VulkanDevice,
}

impl VulkanBuffer {
    fn mapped_range(&self, offset: u64, len: usize) -> PrismResult<*mut u8> {
        if offset + len as u64 > self.size {
            return Err(PrismError::InvalidArgument(format!(
                "range {}..{} exceeds buffer of {} bytes",
                offset,
                offset + len as u64,
                self.size
            )));
        }
        let ptr = self
            .allocation
            .mapped_ptr()
            .ok_or_else(|| PrismError::BackendError("Buffer is not host visible".to_string()))?
            .as_ptr() as *mut u8;
        // In bounds of the mapped allocation, checked above.
        Ok(unsafe { ptr.add(offset as usize) })
    }
}

impl Drop for VulkanBuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_buffer(self.buffer, None);
        }
        let allocation = std::mem::take(&mut self.allocation);
        if let Some(allocator) = &self.device.allocator {
            match allocator.lock() {
                Ok(mut allocator) => {
                    if let Err(e) = allocator.free(allocation) {
                        log::error!("Failed to free buffer memory: {}", e);
                    }
                }
                Err(_) => log::error!("Allocator lock poisoned, leaking buffer memory"),
            }
        }
    }
}

impl prism_core::device::Buffer for VulkanBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    /// Host-coherent memory: the copy is visible to the GPU without a flush.
    fn write_data(&self, offset: u64, data: &[u8]) -> PrismResult<()> {
        let dst = self.mapped_range(offset, data.len())?;
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
        }
        Ok(())
    }

    fn read_data(&self, offset: u64, data: &mut [u8]) -> PrismResult<()> {
        let src = self.mapped_range(offset, data.len())?;
        unsafe {
            std::ptr::copy_nonoverlapping(src as *const u8, data.as_mut_ptr(), data.len());
        }
        Ok(())
    }
}
