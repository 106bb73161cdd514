use ash::vk;
use prism_core::device::{
    BindGroupDescriptor, BindGroupLayoutDescriptor, BindingResource, BindingType, ShaderStages,
};
use prism_core::{PrismError, PrismResult};
use std::collections::HashMap;

use crate::VulkanDevice;

pub struct VulkanBindGroupLayout {
    pub layout: vk::DescriptorSetLayout,
    pub entries: HashMap<u32, BindingType>,
    pub device: VulkanDevice,
}

impl Drop for VulkanBindGroupLayout {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

impl prism_core::device::BindGroupLayout for VulkanBindGroupLayout {}

/// Descriptor set allocated from the device pool. Returned to the pool when the device is destroyed.
pub struct VulkanBindGroup {
    pub set: vk::DescriptorSet,
}

impl prism_core::device::BindGroup for VulkanBindGroup {}

fn map_binding_type(ty: BindingType) -> vk::DescriptorType {
    match ty {
        BindingType::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
    }
}

fn map_stages(stages: ShaderStages) -> vk::ShaderStageFlags {
    let mut flags = vk::ShaderStageFlags::empty();
    if stages.0 & ShaderStages::VERTEX.0 != 0 {
        flags |= vk::ShaderStageFlags::VERTEX;
    }
    if stages.0 & ShaderStages::FRAGMENT.0 != 0 {
        flags |= vk::ShaderStageFlags::FRAGMENT;
    }
    flags
}

impl VulkanDevice {
    pub fn create_bind_group_layout_impl(&self, descriptor: BindGroupLayoutDescriptor) -> PrismResult<VulkanBindGroupLayout> {
        let bindings: Vec<vk::DescriptorSetLayoutBinding> = descriptor
            .entries
            .iter()
            .map(|entry| vk::DescriptorSetLayoutBinding {
                binding: entry.binding,
                descriptor_type: map_binding_type(entry.ty),
                descriptor_count: 1,
                stage_flags: map_stages(entry.visibility),
                ..Default::default()
            })
            .collect();

        let create_info = vk::DescriptorSetLayoutCreateInfo {
            binding_count: bindings.len() as u32,
            p_bindings: bindings.as_ptr(),
            ..Default::default()
        };

        let layout = unsafe {
            self.inner.device.create_descriptor_set_layout(&create_info, None)
                .map_err(|e| PrismError::ResourceCreationFailed(format!("Failed to create bind group layout: {}", e)))?
        };

        Ok(VulkanBindGroupLayout {
            layout,
            entries: descriptor.entries.iter().map(|e| (e.binding, e.ty)).collect(),
            device: self.clone(),
        })
    }

    pub fn create_bind_group_impl(&self, descriptor: BindGroupDescriptor<Self>) -> PrismResult<VulkanBindGroup> {
        let mut buffer_infos = Vec::with_capacity(descriptor.entries.len());
        let mut types = Vec::with_capacity(descriptor.entries.len());
        for entry in &descriptor.entries {
            let ty = descriptor.layout.entries.get(&entry.binding).ok_or_else(|| {
                PrismError::InvalidArgument(format!("Binding {} is not part of the layout", entry.binding))
            })?;
            match entry.resource {
                BindingResource::Buffer { buffer, offset, size } => {
                    buffer_infos.push(vk::DescriptorBufferInfo {
                        buffer: buffer.buffer,
                        offset,
                        range: size.unwrap_or(vk::WHOLE_SIZE),
                    });
                }
            }
            types.push(map_binding_type(*ty));
        }

        let allocate_info = vk::DescriptorSetAllocateInfo {
            descriptor_pool: self.inner.descriptor_pool,
            descriptor_set_count: 1,
            p_set_layouts: &descriptor.layout.layout,
            ..Default::default()
        };

        let sets = unsafe {
            self.inner.device.allocate_descriptor_sets(&allocate_info)
                .map_err(|e| match e {
                    vk::Result::ERROR_OUT_OF_POOL_MEMORY => PrismError::OutOfMemory,
                    e => PrismError::ResourceCreationFailed(format!("Failed to allocate bind group: {}", e)),
                })?
        };
        let set = sets[0];

        // `buffer_infos` is not touched again, so the pointers stay valid until the update.
        let writes: Vec<vk::WriteDescriptorSet> = descriptor
            .entries
            .iter()
            .zip(buffer_infos.iter().zip(&types))
            .map(|(entry, (info, ty))| vk::WriteDescriptorSet {
                dst_set: set,
                dst_binding: entry.binding,
                descriptor_count: 1,
                descriptor_type: *ty,
                p_buffer_info: info,
                ..Default::default()
            })
            .collect();

        unsafe {
            self.inner.device.update_descriptor_sets(&writes, &[]);
        }

        Ok(VulkanBindGroup { set })
    }
}
