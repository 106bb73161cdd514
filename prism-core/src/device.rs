use crate::PrismResult;

pub trait Device: Sized + Clone {
    type Buffer: Buffer;
    type ShaderModule: ShaderModule;
    type RenderPass: RenderPass;
    type PipelineLayout: PipelineLayout;
    type GraphicsPipeline: GraphicsPipeline;
    type BindGroupLayout: BindGroupLayout;
    type BindGroup: BindGroup;

    /// Limits reported by the physical device at creation time.
    fn limits(&self) -> DeviceLimits;

    /// Wait for the device to be idle.
    fn wait_idle(&self) -> PrismResult<()>;

    fn create_shader_module(&self, code: &[u32]) -> PrismResult<Self::ShaderModule>;
    fn create_render_pass(&self, descriptor: RenderPassDescriptor) -> PrismResult<Self::RenderPass>;
    fn create_pipeline_layout(&self, descriptor: PipelineLayoutDescriptor<Self>) -> PrismResult<Self::PipelineLayout>;
    fn create_graphics_pipeline(&self, descriptor: GraphicsPipelineDescriptor<Self>) -> PrismResult<Self::GraphicsPipeline>;
    fn create_buffer(&self, descriptor: BufferDescriptor) -> PrismResult<Self::Buffer>;
    fn create_bind_group_layout(&self, descriptor: BindGroupLayoutDescriptor) -> PrismResult<Self::BindGroupLayout>;
    fn create_bind_group(&self, descriptor: BindGroupDescriptor<Self>) -> PrismResult<Self::BindGroup>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceLimits {
    /// `minUniformBufferOffsetAlignment` in bytes.
    pub min_uniform_buffer_offset_alignment: u64,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        // Upper bound of what drivers report.
        Self {
            min_uniform_buffer_offset_alignment: 256,
        }
    }
}

pub trait ShaderModule {}
pub trait RenderPass {}
pub trait PipelineLayout {}
pub trait GraphicsPipeline: Send + Sync {}
pub trait BindGroupLayout {}
pub trait BindGroup {}

pub trait Buffer {
    fn size(&self) -> u64;
    fn write_data(&self, offset: u64, data: &[u8]) -> PrismResult<()>;
    fn read_data(&self, offset: u64, data: &mut [u8]) -> PrismResult<()>;
}

pub struct RenderPassDescriptor {
    pub color_format: TextureFormat,
    pub depth_stencil_format: Option<TextureFormat>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TextureFormat {
    Bgra8UnormSrgb,
    Rgba8UnormSrgb,
    Rgba8Unorm,
    Depth32Float,
}

pub struct PipelineLayoutDescriptor<'a, D: Device> {
    pub bind_group_layouts: &'a [&'a D::BindGroupLayout],
}

pub struct GraphicsPipelineDescriptor<'a, D: Device> {
    pub vertex_shader: &'a D::ShaderModule,
    pub fragment_shader: &'a D::ShaderModule,
    pub render_pass: &'a D::RenderPass,
    pub layout: &'a D::PipelineLayout,
    pub primitive: PrimitiveState,
    pub vertex_layout: Option<VertexLayout>,
    pub depth_stencil: Option<DepthStencilState>,
}

#[derive(Clone, Copy, Debug)]
pub struct DepthStencilState {
    pub format: TextureFormat,
    pub depth_write_enabled: bool,
    pub depth_compare: CompareFunction,
}

#[derive(Clone, Copy, Debug)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveState {
    pub topology: PrimitiveTopology,
    pub polygon_mode: PolygonMode,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
}

impl Default for PrimitiveState {
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::None,
            front_face: FrontFace::CounterClockwise,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Back,
    Front,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

#[derive(Clone, Debug)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub fn size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VertexLayout {
    pub array_stride: u32,
    pub attributes: Vec<VertexAttribute>,
}

pub struct BufferDescriptor {
    pub size: u64,
    pub usage: BufferUsage,
    /// Allocate in host-visible, host-coherent memory so `write_data` needs no flush.
    pub mapped_at_creation: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BufferUsage(pub u32);

impl BufferUsage {
    pub const VERTEX: Self = Self(1 << 0);
    pub const INDEX: Self = Self(1 << 1);
    pub const UNIFORM: Self = Self(1 << 2);
    pub const STORAGE: Self = Self(1 << 3);
    pub const COPY_SRC: Self = Self(1 << 4);
    pub const COPY_DST: Self = Self(1 << 5);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

pub struct BindGroupLayoutDescriptor {
    pub entries: Vec<BindGroupLayoutEntry>,
}

pub struct BindGroupLayoutEntry {
    pub binding: u32,
    pub visibility: ShaderStages,
    pub ty: BindingType,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ShaderStages(pub u32);

impl ShaderStages {
    pub const VERTEX: Self = Self(1 << 0);
    pub const FRAGMENT: Self = Self(1 << 1);
}

impl std::ops::BitOr for ShaderStages {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingType {
    UniformBuffer,
}

pub struct BindGroupDescriptor<'a, D: Device> {
    pub layout: &'a D::BindGroupLayout,
    pub entries: Vec<BindGroupEntry<'a, D>>,
}

pub struct BindGroupEntry<'a, D: Device> {
    pub binding: u32,
    pub resource: BindingResource<'a, D>,
}

pub enum BindingResource<'a, D: Device> {
    /// A byte range of a buffer. `size: None` binds everything from `offset` to the end.
    Buffer {
        buffer: &'a D::Buffer,
        offset: u64,
        size: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_usage_contains() {
        let usage = BufferUsage::UNIFORM | BufferUsage::COPY_DST;
        assert!(usage.contains(BufferUsage::UNIFORM));
        assert!(!usage.contains(BufferUsage::VERTEX));
    }

    #[test]
    fn test_default_primitive_state_is_filled_unculled_ccw() {
        let state = PrimitiveState::default();
        assert_eq!(state.polygon_mode, PolygonMode::Fill);
        assert_eq!(state.cull_mode, CullMode::None);
        assert_eq!(state.front_face, FrontFace::CounterClockwise);
    }
}
