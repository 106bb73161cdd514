pub mod input;
pub mod mesh;
pub mod pipelines;
pub mod resources;
pub mod settings;
pub mod uniform;

pub use input::{InputSnapshot, Key, KeySet};
pub use mesh::{GpuMesh, MeshInstance, MeshInstanceUniforms};
pub use pipelines::{PipelineTemplate, PipelineVariantCache, ShaderKind};
pub use resources::{CameraUniforms, DrawItem, SceneResources};
pub use settings::RendererSettings;
pub use uniform::{SharedUniformBuffer, SlotLayout, UniformBufferSlot};
