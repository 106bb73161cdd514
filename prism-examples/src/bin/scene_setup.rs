use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{Mat4, Vec3, Vec4};
use prism_core::device::*;
use prism_core::shader::{ShaderSource, ShaderStage, compile_shader};
use prism_core::{Instance, InstanceDescriptor};
use prism_geometry::shapes::{bezier_tube, cornell_room, cylinder, sphere};
use prism_geometry::{BezierCurve, Vertex};
use prism_scene::{
    CameraUniforms, InputSnapshot, Key, KeySet, MeshInstanceUniforms, PipelineTemplate,
    PipelineVariantCache, RendererSettings, SceneResources, ShaderKind,
};
use prism_vulkan::{VulkanDevice, VulkanInstance, VulkanShaderModule};

/// Builds a headless scene on Vulkan and replays scripted key presses against it.
#[derive(Parser, Debug)]
#[command(name = "scene_setup", version)]
struct Args {
    /// Settings file with a `[renderer]` table.
    #[arg(long, default_value = "prism-examples/renderer.toml")]
    config: PathBuf,

    /// Enable GPU validation layers.
    #[arg(long)]
    validation: bool,

    /// Uniform slots reserved for mesh instances.
    #[arg(long, default_value = "16")]
    max_instances: u32,
}

const MESH_VERT: &str = include_str!("../../shaders/mesh.vert");
const GOURAUD_VERT: &str = include_str!("../../shaders/gouraud.vert");

fn shader_sources(kind: ShaderKind) -> (&'static str, &'static str) {
    match kind {
        ShaderKind::Phong => (MESH_VERT, include_str!("../../shaders/phong.frag")),
        ShaderKind::Gouraud => (GOURAUD_VERT, include_str!("../../shaders/gouraud.frag")),
        ShaderKind::Box => (MESH_VERT, include_str!("../../shaders/box.frag")),
        ShaderKind::Pbr => (MESH_VERT, include_str!("../../shaders/pbr.frag")),
    }
}

fn create_module(device: &VulkanDevice, source: &str, stage: ShaderStage) -> Result<VulkanShaderModule> {
    let spirv = compile_shader(ShaderSource::glsl(source, stage))?;
    Ok(device.create_shader_module(&spirv)?)
}

fn load_pipelines(device: &VulkanDevice, pipelines: &mut PipelineVariantCache<VulkanDevice>) -> Result<()> {
    for kind in ShaderKind::ALL {
        let (vs, fs) = shader_sources(kind);
        let vertex = create_module(device, vs, ShaderStage::Vertex)
            .with_context(|| format!("vertex shader of '{}'", kind.name()))?;
        let fragment = create_module(device, fs, ShaderStage::Fragment)
            .with_context(|| format!("fragment shader of '{}'", kind.name()))?;
        pipelines.load(device, kind, &vertex, &fragment)?;
    }
    Ok(())
}

fn populate(device: &VulkanDevice, scene: &mut SceneResources<VulkanDevice>) -> Result<()> {
    let room = scene.add_mesh(device, &cornell_room(4.0, 4.0, 4.0))?;
    scene.add_instance(device, room, ShaderKind::Box, MeshInstanceUniforms::default())?;

    let ball = scene.add_mesh(device, &sphere(0.6, 24, 48, Vec3::new(0.9, 0.6, 0.2)))?;
    scene.add_instance(
        device,
        ball,
        ShaderKind::Pbr,
        MeshInstanceUniforms {
            model: Mat4::from_translation(Vec3::new(-0.8, -1.4, 0.3)),
            material_factors: Vec4::new(0.3, 1.0, 1.0, 0.0),
            ..Default::default()
        },
    )?;

    let pillar = scene.add_mesh(device, &cylinder(0.4, 1.6, 32, Vec3::splat(0.8)))?;
    scene.add_instance(
        device,
        pillar,
        ShaderKind::Phong,
        MeshInstanceUniforms {
            model: Mat4::from_translation(Vec3::new(0.9, -1.2, -0.6)),
            ..Default::default()
        },
    )?;

    let curve = BezierCurve::new(vec![
        Vec3::new(-1.5, 1.0, -1.0),
        Vec3::new(-0.5, 2.0, 1.0),
        Vec3::new(0.5, 0.0, -1.0),
        Vec3::new(1.5, 1.0, 1.0),
    ]);
    let tube = scene.add_mesh(device, &bezier_tube(&curve, Vec3::Y, 0.08, 48, 16, Vec3::new(0.2, 0.7, 0.9)))?;
    scene.add_instance(device, tube, ShaderKind::Gouraud, MeshInstanceUniforms::default())?;

    let eye = Vec3::new(0.0, 0.0, 7.0);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
    scene.set_camera(&CameraUniforms {
        view_projection: projection * view,
        eye: eye.extend(1.0),
    })?;
    Ok(())
}

fn replay_input(scene: &mut SceneResources<VulkanDevice>) {
    let frames: [&[Key]; 8] = [
        &[],
        &[Key::F1],
        &[Key::F1],
        &[],
        &[Key::F2],
        &[],
        &[Key::F2],
        &[Key::F1, Key::F2],
    ];

    let mut input = InputSnapshot::default();
    for (frame, keys) in frames.iter().enumerate() {
        input = input.next(keys.iter().copied().collect::<KeySet>());
        scene.pipelines_mut().update(&input);

        let pipelines = scene.pipelines();
        let selected = pipelines.selected();
        log::info!(
            "frame {}: {:?} -> {:?}/{:?} (pipeline {:?}, {:?} {:?}), {} draws",
            frame,
            keys,
            pipelines.polygon_mode(),
            pipelines.cull_mode(),
            selected.raw(),
            selected.0.polygon_mode,
            selected.0.cull_mode,
            scene.draws().count()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = RendererSettings::load(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;

    let instance = VulkanInstance::new(InstanceDescriptor {
        name: "scene_setup",
        validation: args.validation,
    })
    .context("Failed to create Vulkan instance")?;
    let device = instance.request_device().context("Failed to request device")?;

    let bind_group_layout = device.create_bind_group_layout(BindGroupLayoutDescriptor {
        entries: vec![
            BindGroupLayoutEntry {
                binding: prism_scene::mesh::CAMERA_BINDING,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: BindingType::UniformBuffer,
            },
            BindGroupLayoutEntry {
                binding: prism_scene::mesh::INSTANCE_BINDING,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: BindingType::UniformBuffer,
            },
        ],
    })?;
    let layout = device.create_pipeline_layout(PipelineLayoutDescriptor {
        bind_group_layouts: &[&bind_group_layout],
    })?;
    let render_pass = device.create_render_pass(RenderPassDescriptor {
        color_format: TextureFormat::Bgra8UnormSrgb,
        depth_stencil_format: Some(TextureFormat::Depth32Float),
    })?;

    let mut pipelines = PipelineVariantCache::new(PipelineTemplate {
        render_pass,
        layout,
        vertex_layout: Vertex::layout(),
        depth_stencil: Some(DepthStencilState {
            format: TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
        }),
    });
    load_pipelines(&device, &mut pipelines).context("Failed to build pipeline variants")?;
    settings.apply(&mut pipelines);

    let mut scene = SceneResources::new(&device, bind_group_layout, pipelines, args.max_instances)?;
    populate(&device, &mut scene).context("Failed to populate scene")?;
    log::info!(
        "Scene ready: {} meshes, {} instances, uniform stride {} bytes",
        scene.meshes().len(),
        scene.instances().len(),
        scene.uniforms().stride()
    );

    replay_input(&mut scene);

    scene.teardown(&device)?;
    drop(device);
    drop(instance);
    Ok(())
}
