use ash::vk;
use std::sync::Arc;

use crate::VulkanDevice;

pub struct VulkanShaderModuleInner {
    pub module: vk::ShaderModule,
    pub device: VulkanDevice,
}

impl Drop for VulkanShaderModuleInner {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_shader_module(self.module, None);
        }
    }
}

#[derive(Clone)]
pub struct VulkanShaderModule(pub Arc<VulkanShaderModuleInner>);

impl prism_core::device::ShaderModule for VulkanShaderModule {}

pub struct VulkanRenderPassInner {
    pub render_pass: vk::RenderPass,
    pub device: VulkanDevice,
}

impl Drop for VulkanRenderPassInner {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_render_pass(self.render_pass, None);
        }
    }
}

#[derive(Clone)]
pub struct VulkanRenderPass(pub Arc<VulkanRenderPassInner>);

impl prism_core::device::RenderPass for VulkanRenderPass {}

pub struct VulkanPipelineLayoutInner {
    pub layout: vk::PipelineLayout,
    pub set_layouts: Vec<vk::DescriptorSetLayout>,
    pub device: VulkanDevice,
}

impl Drop for VulkanPipelineLayoutInner {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_pipeline_layout(self.layout, None);
        }
    }
}

#[derive(Clone)]
pub struct VulkanPipelineLayout(pub Arc<VulkanPipelineLayoutInner>);

impl prism_core::device::PipelineLayout for VulkanPipelineLayout {}

pub struct VulkanGraphicsPipelineInner {
    pub pipeline: vk::Pipeline,
    pub layout: vk::PipelineLayout,
    pub polygon_mode: vk::PolygonMode,
    pub cull_mode: vk::CullModeFlags,
    pub device: VulkanDevice,
}

impl Drop for VulkanGraphicsPipelineInner {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_pipeline(self.pipeline, None);
        }
    }
}

#[derive(Clone)]
pub struct VulkanGraphicsPipeline(pub Arc<VulkanGraphicsPipelineInner>);

impl VulkanGraphicsPipeline {
    pub fn raw(&self) -> vk::Pipeline {
        self.0.pipeline
    }
}

impl prism_core::device::GraphicsPipeline for VulkanGraphicsPipeline {}
