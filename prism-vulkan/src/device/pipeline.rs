use ash::vk;
use prism_core::device::*;
use prism_core::{PrismError, PrismResult};
use std::sync::Arc;

use crate::VulkanDevice;
use crate::{VulkanGraphicsPipelineInner, VulkanPipelineLayoutInner, VulkanRenderPassInner, VulkanShaderModuleInner};

const ENTRY_POINT: &std::ffi::CStr = c"main";

fn map_color_format(format: TextureFormat) -> PrismResult<vk::Format> {
    match format {
        TextureFormat::Bgra8UnormSrgb => Ok(vk::Format::B8G8R8A8_SRGB),
        TextureFormat::Rgba8UnormSrgb => Ok(vk::Format::R8G8B8A8_SRGB),
        TextureFormat::Rgba8Unorm => Ok(vk::Format::R8G8B8A8_UNORM),
        TextureFormat::Depth32Float => Err(PrismError::InvalidArgument(
            "Cannot use Depth32Float as color format".to_string(),
        )),
    }
}

fn map_depth_format(format: TextureFormat) -> PrismResult<vk::Format> {
    match format {
        TextureFormat::Depth32Float => Ok(vk::Format::D32_SFLOAT),
        other => Err(PrismError::InvalidArgument(format!(
            "{:?} is not a depth format",
            other
        ))),
    }
}

fn map_cull_mode(mode: CullMode) -> vk::CullModeFlags {
    match mode {
        CullMode::None => vk::CullModeFlags::NONE,
        CullMode::Back => vk::CullModeFlags::BACK,
        CullMode::Front => vk::CullModeFlags::FRONT,
    }
}

fn map_front_face(face: FrontFace) -> vk::FrontFace {
    match face {
        FrontFace::CounterClockwise => vk::FrontFace::COUNTER_CLOCKWISE,
        FrontFace::Clockwise => vk::FrontFace::CLOCKWISE,
    }
}

fn map_vertex_format(format: VertexFormat) -> vk::Format {
    match format {
        VertexFormat::Float32x2 => vk::Format::R32G32_SFLOAT,
        VertexFormat::Float32x3 => vk::Format::R32G32B32_SFLOAT,
        VertexFormat::Float32x4 => vk::Format::R32G32B32A32_SFLOAT,
    }
}

fn map_compare(compare: CompareFunction) -> vk::CompareOp {
    match compare {
        CompareFunction::Never => vk::CompareOp::NEVER,
        CompareFunction::Less => vk::CompareOp::LESS,
        CompareFunction::Equal => vk::CompareOp::EQUAL,
        CompareFunction::LessEqual => vk::CompareOp::LESS_OR_EQUAL,
        CompareFunction::Greater => vk::CompareOp::GREATER,
        CompareFunction::NotEqual => vk::CompareOp::NOT_EQUAL,
        CompareFunction::GreaterEqual => vk::CompareOp::GREATER_OR_EQUAL,
        CompareFunction::Always => vk::CompareOp::ALWAYS,
    }
}

impl VulkanDevice {
    fn map_polygon_mode(&self, mode: PolygonMode) -> vk::PolygonMode {
        match mode {
            PolygonMode::Fill => vk::PolygonMode::FILL,
            PolygonMode::Line if self.inner.supports_wireframe => vk::PolygonMode::LINE,
            PolygonMode::Line => {
                log::warn!("fillModeNonSolid is unavailable, wireframe variant falls back to FILL");
                vk::PolygonMode::FILL
            }
        }
    }

    pub fn create_shader_module_impl(&self, code: &[u32]) -> PrismResult<crate::VulkanShaderModule> {
        let create_info = vk::ShaderModuleCreateInfo {
            code_size: std::mem::size_of_val(code),
            p_code: code.as_ptr(),
            ..Default::default()
        };

        let module = unsafe {
            self.inner.device.create_shader_module(&create_info, None)
                .map_err(|e| PrismError::ResourceCreationFailed(format!("Failed to create shader module: {}", e)))?
        };

        Ok(crate::VulkanShaderModule(Arc::new(VulkanShaderModuleInner {
            module,
            device: self.clone(),
        })))
    }

    /// Single-subpass pass rendering into an offscreen color target and an optional depth target.
    pub fn create_render_pass_impl(&self, descriptor: RenderPassDescriptor) -> PrismResult<crate::VulkanRenderPass> {
        let mut attachments = vec![vk::AttachmentDescription {
            format: map_color_format(descriptor.color_format)?,
            samples: vk::SampleCountFlags::TYPE_1,
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::STORE,
            initial_layout: vk::ImageLayout::UNDEFINED,
            final_layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            ..Default::default()
        }];

        let color_attachment_ref = vk::AttachmentReference {
            attachment: 0,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        };

        let depth_attachment_ref = match descriptor.depth_stencil_format {
            Some(format) => {
                attachments.push(vk::AttachmentDescription {
                    format: map_depth_format(format)?,
                    samples: vk::SampleCountFlags::TYPE_1,
                    load_op: vk::AttachmentLoadOp::CLEAR,
                    store_op: vk::AttachmentStoreOp::DONT_CARE,
                    initial_layout: vk::ImageLayout::UNDEFINED,
                    final_layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
                    ..Default::default()
                });
                Some(vk::AttachmentReference {
                    attachment: 1,
                    layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
                })
            }
            None => None,
        };

        let subpass = vk::SubpassDescription {
            pipeline_bind_point: vk::PipelineBindPoint::GRAPHICS,
            color_attachment_count: 1,
            p_color_attachments: &color_attachment_ref,
            p_depth_stencil_attachment: depth_attachment_ref
                .as_ref()
                .map_or(std::ptr::null(), |r| r as *const _),
            ..Default::default()
        };

        let dependency = vk::SubpassDependency {
            src_subpass: vk::SUBPASS_EXTERNAL,
            dst_subpass: 0,
            src_stage_mask: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
            dst_stage_mask: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
            src_access_mask: vk::AccessFlags::empty(),
            dst_access_mask: vk::AccessFlags::COLOR_ATTACHMENT_WRITE | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            ..Default::default()
        };

        let create_info = vk::RenderPassCreateInfo {
            attachment_count: attachments.len() as u32,
            p_attachments: attachments.as_ptr(),
            subpass_count: 1,
            p_subpasses: &subpass,
            dependency_count: 1,
            p_dependencies: &dependency,
            ..Default::default()
        };

        let render_pass = unsafe {
            self.inner.device.create_render_pass(&create_info, None)
                .map_err(|e| PrismError::ResourceCreationFailed(format!("Failed to create render pass: {}", e)))?
        };

        Ok(crate::VulkanRenderPass(Arc::new(VulkanRenderPassInner {
            render_pass,
            device: self.clone(),
        })))
    }

    pub fn create_pipeline_layout_impl(&self, descriptor: PipelineLayoutDescriptor<Self>) -> PrismResult<crate::VulkanPipelineLayout> {
        let set_layouts: Vec<vk::DescriptorSetLayout> = descriptor
            .bind_group_layouts
            .iter()
            .map(|l| l.layout)
            .collect();

        let create_info = vk::PipelineLayoutCreateInfo {
            set_layout_count: set_layouts.len() as u32,
            p_set_layouts: set_layouts.as_ptr(),
            ..Default::default()
        };

        let layout = unsafe {
            self.inner.device.create_pipeline_layout(&create_info, None)
                .map_err(|e| PrismError::ResourceCreationFailed(format!("Failed to create pipeline layout: {}", e)))?
        };

        Ok(crate::VulkanPipelineLayout(Arc::new(VulkanPipelineLayoutInner {
            layout,
            set_layouts,
            device: self.clone(),
        })))
    }

    pub fn create_graphics_pipeline_impl(&self, descriptor: GraphicsPipelineDescriptor<Self>) -> PrismResult<crate::VulkanGraphicsPipeline> {
        let shader_stages = [
            vk::PipelineShaderStageCreateInfo {
                stage: vk::ShaderStageFlags::VERTEX,
                module: descriptor.vertex_shader.0.module,
                p_name: ENTRY_POINT.as_ptr(),
                ..Default::default()
            },
            vk::PipelineShaderStageCreateInfo {
                stage: vk::ShaderStageFlags::FRAGMENT,
                module: descriptor.fragment_shader.0.module,
                p_name: ENTRY_POINT.as_ptr(),
                ..Default::default()
            },
        ];

        let mut vertex_bindings = Vec::new();
        let mut vertex_attributes = Vec::new();
        if let Some(layout) = &descriptor.vertex_layout {
            vertex_bindings.push(vk::VertexInputBindingDescription {
                binding: 0,
                stride: layout.array_stride,
                input_rate: vk::VertexInputRate::VERTEX,
            });
            vertex_attributes.extend(layout.attributes.iter().map(|attr| {
                vk::VertexInputAttributeDescription {
                    location: attr.location,
                    binding: 0,
                    format: map_vertex_format(attr.format),
                    offset: attr.offset,
                }
            }));
        }

        let vertex_input_info = vk::PipelineVertexInputStateCreateInfo {
            vertex_binding_description_count: vertex_bindings.len() as u32,
            p_vertex_binding_descriptions: vertex_bindings.as_ptr(),
            vertex_attribute_description_count: vertex_attributes.len() as u32,
            p_vertex_attribute_descriptions: vertex_attributes.as_ptr(),
            ..Default::default()
        };

        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo {
            topology: match descriptor.primitive.topology {
                PrimitiveTopology::TriangleList => vk::PrimitiveTopology::TRIANGLE_LIST,
            },
            ..Default::default()
        };

        let polygon_mode = self.map_polygon_mode(descriptor.primitive.polygon_mode);
        let cull_mode = map_cull_mode(descriptor.primitive.cull_mode);
        let rasterizer = vk::PipelineRasterizationStateCreateInfo {
            polygon_mode,
            line_width: 1.0,
            cull_mode,
            front_face: map_front_face(descriptor.primitive.front_face),
            ..Default::default()
        };

        let multisampling = vk::PipelineMultisampleStateCreateInfo {
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            ..Default::default()
        };

        let color_blend_attachment = vk::PipelineColorBlendAttachmentState {
            color_write_mask: vk::ColorComponentFlags::RGBA,
            blend_enable: vk::FALSE,
            ..Default::default()
        };

        let color_blending = vk::PipelineColorBlendStateCreateInfo {
            attachment_count: 1,
            p_attachments: &color_blend_attachment,
            ..Default::default()
        };

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state_info = vk::PipelineDynamicStateCreateInfo {
            dynamic_state_count: dynamic_states.len() as u32,
            p_dynamic_states: dynamic_states.as_ptr(),
            ..Default::default()
        };

        let viewport_state = vk::PipelineViewportStateCreateInfo {
            viewport_count: 1,
            scissor_count: 1,
            ..Default::default()
        };

        let depth_stencil_info = match &descriptor.depth_stencil {
            Some(ds) => vk::PipelineDepthStencilStateCreateInfo {
                depth_test_enable: vk::TRUE,
                depth_write_enable: if ds.depth_write_enabled { vk::TRUE } else { vk::FALSE },
                depth_compare_op: map_compare(ds.depth_compare),
                ..Default::default()
            },
            None => vk::PipelineDepthStencilStateCreateInfo::default(),
        };

        let create_info = vk::GraphicsPipelineCreateInfo {
            stage_count: shader_stages.len() as u32,
            p_stages: shader_stages.as_ptr(),
            p_vertex_input_state: &vertex_input_info,
            p_input_assembly_state: &input_assembly,
            p_viewport_state: &viewport_state,
            p_rasterization_state: &rasterizer,
            p_multisample_state: &multisampling,
            p_color_blend_state: &color_blending,
            p_depth_stencil_state: &depth_stencil_info,
            p_dynamic_state: &dynamic_state_info,
            layout: descriptor.layout.0.layout,
            render_pass: descriptor.render_pass.0.render_pass,
            ..Default::default()
        };

        let pipelines = unsafe {
            self.inner.device.create_graphics_pipelines(vk::PipelineCache::null(), &[create_info], None)
                .map_err(|(_, e)| PrismError::PipelineCreationFailed(format!("Failed to create graphics pipeline: {}", e)))?
        };

        log::debug!("Created graphics pipeline ({:?}, {:?})", polygon_mode, cull_mode);

        Ok(crate::VulkanGraphicsPipeline(Arc::new(VulkanGraphicsPipelineInner {
            pipeline: pipelines[0],
            layout: descriptor.layout.0.layout,
            polygon_mode,
            cull_mode,
            device: self.clone(),
        })))
    }
}
