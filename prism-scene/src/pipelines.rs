use prism_core::device::{
    CullMode, DepthStencilState, GraphicsPipelineDescriptor, PolygonMode, PrimitiveState,
    VertexLayout,
};
use prism_core::{Device, PrismResult};

use crate::input::{InputSnapshot, Key};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Phong,
    Gouraud,
    Box,
    Pbr,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 4] = [
        ShaderKind::Phong,
        ShaderKind::Gouraud,
        ShaderKind::Box,
        ShaderKind::Pbr,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Phong => "phong",
            ShaderKind::Gouraud => "gouraud",
            ShaderKind::Box => "box",
            ShaderKind::Pbr => "pbr",
        }
    }
}

pub const POLYGON_MODES: [PolygonMode; 2] = [PolygonMode::Fill, PolygonMode::Line];
pub const CULL_MODES: [CullMode; 3] = [CullMode::None, CullMode::Back, CullMode::Front];

const SHADER_COUNT: usize = ShaderKind::ALL.len();

type VariantTable<P> = [[P; CULL_MODES.len()]; POLYGON_MODES.len()];

/// Fixed state shared by every pipeline variant.
pub struct PipelineTemplate<D: Device> {
    pub render_pass: D::RenderPass,
    pub layout: D::PipelineLayout,
    pub vertex_layout: VertexLayout,
    pub depth_stencil: Option<DepthStencilState>,
}

/// Closed table of pipelines indexed by shader, polygon mode and cull mode.
///
/// Each shader's six variants are compiled together by [`load`](Self::load).
/// Selection is a plain lookup and never compiles.
pub struct PipelineVariantCache<D: Device> {
    tables: [Option<VariantTable<D::GraphicsPipeline>>; SHADER_COUNT],
    template: PipelineTemplate<D>,
    shader: ShaderKind,
    polygon_mode: usize,
    cull_mode: usize,
}

impl<D: Device> PipelineVariantCache<D> {
    pub fn new(template: PipelineTemplate<D>) -> Self {
        Self {
            tables: Default::default(),
            template,
            shader: ShaderKind::Phong,
            polygon_mode: 0,
            cull_mode: 0,
        }
    }

    pub fn template(&self) -> &PipelineTemplate<D> {
        &self.template
    }

    /// Compiles every (polygon mode, cull mode) variant of `kind`, replacing an earlier table.
    pub fn load(
        &mut self,
        device: &D,
        kind: ShaderKind,
        vertex_shader: &D::ShaderModule,
        fragment_shader: &D::ShaderModule,
    ) -> PrismResult<()> {
        let mut rows = Vec::with_capacity(POLYGON_MODES.len());
        for polygon_mode in POLYGON_MODES {
            let mut row = Vec::with_capacity(CULL_MODES.len());
            for cull_mode in CULL_MODES {
                row.push(device.create_graphics_pipeline(GraphicsPipelineDescriptor {
                    vertex_shader,
                    fragment_shader,
                    render_pass: &self.template.render_pass,
                    layout: &self.template.layout,
                    primitive: PrimitiveState {
                        polygon_mode,
                        cull_mode,
                        ..Default::default()
                    },
                    vertex_layout: Some(self.template.vertex_layout.clone()),
                    depth_stencil: self.template.depth_stencil,
                })?);
            }
            rows.push(into_array(row));
        }

        log::info!(
            "Loaded {} pipeline variants for shader '{}'",
            POLYGON_MODES.len() * CULL_MODES.len(),
            kind.name()
        );
        self.tables[kind.index()] = Some(into_array(rows));
        Ok(())
    }

    pub fn is_loaded(&self, kind: ShaderKind) -> bool {
        self.tables[kind.index()].is_some()
    }

    pub fn shader(&self) -> ShaderKind {
        self.shader
    }

    pub fn polygon_mode(&self) -> PolygonMode {
        POLYGON_MODES[self.polygon_mode]
    }

    pub fn cull_mode(&self) -> CullMode {
        CULL_MODES[self.cull_mode]
    }

    pub fn set_shader(&mut self, kind: ShaderKind) {
        self.shader = kind;
    }

    /// Any integer is accepted and wrapped onto `[Fill, Line]`.
    pub fn set_polygon_mode(&mut self, mode: i32) {
        self.polygon_mode = wrap(mode, POLYGON_MODES.len());
        log::debug!("Polygon mode: {:?}", self.polygon_mode());
    }

    /// Any integer is accepted and wrapped onto `[None, Back, Front]`.
    pub fn set_culling_mode(&mut self, mode: i32) {
        self.cull_mode = wrap(mode, CULL_MODES.len());
        log::debug!("Cull mode: {:?}", self.cull_mode());
    }

    pub fn cycle_polygon_mode(&mut self) {
        self.set_polygon_mode(self.polygon_mode as i32 + 1);
    }

    pub fn cycle_culling_mode(&mut self) {
        self.set_culling_mode(self.cull_mode as i32 + 1);
    }

    /// F1 cycles the polygon mode, F2 the cull mode.
    pub fn update(&mut self, input: &InputSnapshot) {
        if input.key_press(Key::F1) {
            self.cycle_polygon_mode();
        }
        if input.key_press(Key::F2) {
            self.cycle_culling_mode();
        }
    }

    /// The pipeline for the current shader, polygon mode and cull mode.
    ///
    /// Panics if the current shader was never loaded.
    pub fn selected(&self) -> &D::GraphicsPipeline {
        self.variant(self.shader, self.polygon_mode(), self.cull_mode())
    }

    /// Panics if `kind` was never loaded.
    pub fn variant(&self, kind: ShaderKind, polygon_mode: PolygonMode, cull_mode: CullMode) -> &D::GraphicsPipeline {
        let table = self.tables[kind.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("shader '{}' was selected before being loaded", kind.name()));
        &table[polygon_mode as usize][cull_mode as usize]
    }
}

fn wrap(value: i32, len: usize) -> usize {
    value.rem_euclid(len as i32) as usize
}

fn into_array<T, const N: usize>(items: Vec<T>) -> [T; N] {
    match items.try_into() {
        Ok(array) => array,
        Err(items) => unreachable!("expected {} items, built {}", N, items.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_handles_negative_and_large_values() {
        assert_eq!(wrap(0, 2), 0);
        assert_eq!(wrap(3, 2), 1);
        assert_eq!(wrap(-1, 3), 2);
        assert_eq!(wrap(-7, 3), 2);
        assert_eq!(wrap(i32::MAX, 3), 1);
    }

    #[test]
    fn test_mode_discriminants_match_axis_order() {
        for (i, mode) in POLYGON_MODES.iter().enumerate() {
            assert_eq!(*mode as usize, i);
        }
        for (i, mode) in CULL_MODES.iter().enumerate() {
            assert_eq!(*mode as usize, i);
        }
        for (i, kind) in ShaderKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
