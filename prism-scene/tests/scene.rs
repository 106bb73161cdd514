mod common;

use std::collections::HashSet;

use common::{MockDevice, MockHandle};
use glam::{Mat4, Vec3, Vec4};
use prism_core::device::{Buffer, BufferUsage, CullMode, PolygonMode};
use prism_core::PrismError;
use prism_geometry::{shapes, MeshDescription, Vertex};
use prism_scene::*;
use rstest::rstest;

fn template() -> PipelineTemplate<MockDevice> {
    PipelineTemplate {
        render_pass: MockHandle,
        layout: MockHandle,
        vertex_layout: Vertex::layout(),
        depth_stencil: None,
    }
}

fn loaded_cache(device: &MockDevice, kinds: &[ShaderKind]) -> PipelineVariantCache<MockDevice> {
    let mut cache = PipelineVariantCache::new(template());
    for &kind in kinds {
        cache.load(device, kind, &MockHandle, &MockHandle).unwrap();
    }
    cache
}

#[test]
fn test_shared_uniform_buffer_example_slots() {
    let device = MockDevice::with_alignment(256);
    let buffer = SharedUniformBuffer::new(&device, 80, 4).unwrap();

    assert_eq!(buffer.stride(), 256);
    assert_eq!(buffer.buffer().size(), 1024);
    assert!(buffer.buffer().usage.contains(BufferUsage::UNIFORM));
    let offsets: Vec<_> = (0..4).map(|i| (buffer.slot(i).offset, buffer.slot(i).size)).collect();
    assert_eq!(offsets, vec![(0, 80), (256, 80), (512, 80), (768, 80)]);
}

#[test]
fn test_shared_uniform_buffer_writes_into_slot() {
    let device = MockDevice::with_alignment(64);
    let buffer = SharedUniformBuffer::new(&device, 16, 3).unwrap();
    let value = Vec4::new(1.0, 2.0, 3.0, 4.0);
    buffer.write_pod(2, &value).unwrap();

    assert_eq!(buffer.buffer().bytes(128, 16), bytemuck::bytes_of(&value));
    assert!(buffer.buffer().bytes(0, 128).iter().all(|&b| b == 0));

    let too_big = [0u8; 17];
    assert!(matches!(buffer.write(0, &too_big), Err(PrismError::InvalidArgument(_))));
}

#[test]
fn test_shared_uniform_buffer_rejects_empty_arena() {
    let device = MockDevice::with_alignment(256);
    assert!(SharedUniformBuffer::new(&device, 80, 0).is_err());
}

#[test]
fn test_load_builds_six_distinct_variants() {
    let device = MockDevice::with_alignment(256);
    let mut cache = loaded_cache(&device, &[ShaderKind::Phong]);
    assert_eq!(device.stats.borrow().pipelines_created, 6);
    assert!(cache.is_loaded(ShaderKind::Phong));
    assert!(!cache.is_loaded(ShaderKind::Pbr));

    let mut ids = HashSet::new();
    for polygon in 0..2 {
        for cull in 0..3 {
            cache.set_polygon_mode(polygon);
            cache.set_culling_mode(cull);
            let pipeline = cache.selected();
            assert_eq!(pipeline.polygon_mode, cache.polygon_mode());
            assert_eq!(pipeline.cull_mode, cache.cull_mode());
            assert_eq!(pipeline.vertex_stride, 44);
            ids.insert(pipeline.id);
        }
    }
    assert_eq!(ids.len(), 6);
}

#[test]
fn test_shaders_do_not_share_variants() {
    let device = MockDevice::with_alignment(256);
    let cache = loaded_cache(&device, &ShaderKind::ALL);
    let ids: HashSet<_> = ShaderKind::ALL
        .iter()
        .flat_map(|&kind| {
            let cache = &cache;
            [PolygonMode::Fill, PolygonMode::Line].into_iter().flat_map(move |polygon| {
                [CullMode::None, CullMode::Back, CullMode::Front]
                    .into_iter()
                    .map(move |cull| cache.variant(kind, polygon, cull).id)
            })
        })
        .collect();
    assert_eq!(ids.len(), 24);
}

#[rstest]
#[case(0, PolygonMode::Fill)]
#[case(1, PolygonMode::Line)]
#[case(2, PolygonMode::Fill)]
#[case(-1, PolygonMode::Line)]
#[case(-4, PolygonMode::Fill)]
fn test_polygon_mode_wraps(#[case] value: i32, #[case] expected: PolygonMode) {
    let mut cache = PipelineVariantCache::<MockDevice>::new(template());
    cache.set_polygon_mode(value);
    assert_eq!(cache.polygon_mode(), expected);
}

#[rstest]
#[case(0, CullMode::None)]
#[case(1, CullMode::Back)]
#[case(2, CullMode::Front)]
#[case(3, CullMode::None)]
#[case(-1, CullMode::Front)]
#[case(-5, CullMode::Back)]
fn test_cull_mode_wraps(#[case] value: i32, #[case] expected: CullMode) {
    let mut cache = PipelineVariantCache::<MockDevice>::new(template());
    cache.set_culling_mode(value);
    assert_eq!(cache.cull_mode(), expected);
}

#[test]
#[should_panic(expected = "before being loaded")]
fn test_selecting_unloaded_shader_panics() {
    let device = MockDevice::with_alignment(256);
    let mut cache = loaded_cache(&device, &[ShaderKind::Phong]);
    cache.set_shader(ShaderKind::Gouraud);
    cache.selected();
}

#[test]
fn test_update_reacts_to_key_presses_only() {
    let device = MockDevice::with_alignment(256);
    let mut cache = loaded_cache(&device, &[ShaderKind::Box]);
    cache.set_shader(ShaderKind::Box);

    let f1: KeySet = [Key::F1].into_iter().collect();
    let both: KeySet = [Key::F1, Key::F2].into_iter().collect();

    let frame = InputSnapshot::default().next(f1);
    cache.update(&frame);
    assert_eq!(cache.polygon_mode(), PolygonMode::Line);

    // F1 still held, F2 newly pressed.
    let frame = frame.next(both);
    cache.update(&frame);
    assert_eq!(cache.polygon_mode(), PolygonMode::Line);
    assert_eq!(cache.cull_mode(), CullMode::Back);

    let frame = frame.next(KeySet::EMPTY).next(f1);
    cache.update(&frame);
    assert_eq!(cache.polygon_mode(), PolygonMode::Fill);
    assert_eq!(cache.selected().polygon_mode, PolygonMode::Fill);
}

#[test]
fn test_settings_select_wireframe_and_back_culling() {
    let mut cache = PipelineVariantCache::<MockDevice>::new(template());
    let settings = RendererSettings::from_toml("[renderer]\nwireframe = true\nbackface_culling = true").unwrap();
    settings.apply(&mut cache);
    assert_eq!(cache.polygon_mode(), PolygonMode::Line);
    assert_eq!(cache.cull_mode(), CullMode::Back);

    let mut untouched = PipelineVariantCache::<MockDevice>::new(template());
    RendererSettings::default().apply(&mut untouched);
    assert_eq!(untouched.polygon_mode(), PolygonMode::Fill);
    assert_eq!(untouched.cull_mode(), CullMode::None);
}

#[test]
fn test_mesh_upload_matches_description() {
    let device = MockDevice::with_alignment(256);
    let cube = shapes::cube(1.0, 1.0, 1.0, Vec3::ONE);
    let mesh = GpuMesh::upload(&device, &cube).unwrap();

    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.index_count(), 36);
    assert_eq!(mesh.vertex_buffer.size(), 24 * 44);
    assert_eq!(mesh.index_buffer.size(), 36 * 4);
    assert!(mesh.vertex_buffer.usage.contains(BufferUsage::VERTEX));
    assert!(!mesh.vertex_buffer.usage.contains(BufferUsage::INDEX));
    assert!(mesh.index_buffer.usage.contains(BufferUsage::INDEX));
    assert!(!mesh.index_buffer.usage.contains(BufferUsage::VERTEX));
    assert_eq!(
        mesh.index_buffer.bytes(0, 36 * 4),
        bytemuck::cast_slice::<u32, u8>(&cube.indices)
    );
}

#[test]
fn test_mesh_upload_rejects_invalid_descriptions() {
    let device = MockDevice::with_alignment(256);
    let broken = MeshDescription {
        vertices: vec![Vertex::default(); 2],
        indices: vec![0, 1, 2],
    };
    assert!(matches!(GpuMesh::upload(&device, &broken), Err(PrismError::InvalidMesh(_))));
    assert!(GpuMesh::upload(&device, &MeshDescription::default()).is_err());
    assert_eq!(device.stats.borrow().buffers_created, 0);
}

fn scene(device: &MockDevice, max_instances: u32) -> SceneResources<MockDevice> {
    let pipelines = loaded_cache(device, &[ShaderKind::Phong, ShaderKind::Pbr]);
    SceneResources::new(device, MockHandle, pipelines, max_instances).unwrap()
}

#[test]
fn test_instances_bind_their_own_slot() {
    let device = MockDevice::with_alignment(256);
    let mut resources = scene(&device, 3);
    let sphere = resources.add_mesh(&device, &shapes::sphere(1.0, 6, 12, Vec3::ONE)).unwrap();

    for _ in 0..3 {
        resources
            .add_instance(&device, sphere.clone(), ShaderKind::Phong, MeshInstanceUniforms::default())
            .unwrap();
    }

    let stats = device.stats.borrow();
    let instance_ranges: Vec<_> = stats.bind_groups.iter().map(|entries| entries[1]).collect();
    assert_eq!(
        instance_ranges,
        vec![(1, 0, Some(96)), (1, 256, Some(96)), (1, 512, Some(96))]
    );
    assert!(stats.bind_groups.iter().all(|entries| entries[0] == (0, 0, None)));
}

#[test]
fn test_instance_uniforms_land_in_shared_buffer() {
    let device = MockDevice::with_alignment(256);
    let mut resources = scene(&device, 2);
    let cube = resources.add_mesh(&device, &shapes::cube(1.0, 1.0, 1.0, Vec3::ONE)).unwrap();
    resources
        .add_instance(&device, cube.clone(), ShaderKind::Phong, MeshInstanceUniforms::default())
        .unwrap();
    let index = resources
        .add_instance(&device, cube, ShaderKind::Pbr, MeshInstanceUniforms::default())
        .unwrap();

    let uniforms = MeshInstanceUniforms {
        color: Vec4::new(1.0, 0.0, 0.0, 1.0),
        model: Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        material_factors: Vec4::new(0.3, 1.0, 1.0, 0.0),
    };
    resources.set_instance_uniforms(index, uniforms).unwrap();

    let stored = resources.uniforms().buffer().bytes(256, 96);
    assert_eq!(stored, bytemuck::bytes_of(&uniforms));
    assert_eq!(resources.instances()[index].uniforms(), &uniforms);
    assert!(resources.set_instance_uniforms(7, uniforms).is_err());
}

#[test]
fn test_instance_capacity_is_enforced() {
    let device = MockDevice::with_alignment(256);
    let mut resources = scene(&device, 1);
    let cube = resources.add_mesh(&device, &shapes::cube(1.0, 1.0, 1.0, Vec3::ONE)).unwrap();
    resources
        .add_instance(&device, cube.clone(), ShaderKind::Phong, MeshInstanceUniforms::default())
        .unwrap();
    let overflow = resources.add_instance(&device, cube, ShaderKind::Phong, MeshInstanceUniforms::default());
    assert!(matches!(overflow, Err(PrismError::InvalidArgument(_))));
}

#[test]
fn test_draws_follow_instance_shader_and_current_modes() {
    let device = MockDevice::with_alignment(256);
    let mut resources = scene(&device, 4);
    let cube = resources.add_mesh(&device, &shapes::cube(1.0, 1.0, 1.0, Vec3::ONE)).unwrap();
    let tube_curve = prism_geometry::BezierCurve::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)]);
    let tube = resources
        .add_mesh(&device, &shapes::bezier_tube(&tube_curve, Vec3::Z, 0.1, 8, 6, Vec3::ONE))
        .unwrap();
    resources
        .add_instance(&device, cube, ShaderKind::Phong, MeshInstanceUniforms::default())
        .unwrap();
    resources
        .add_instance(&device, tube.clone(), ShaderKind::Pbr, MeshInstanceUniforms::default())
        .unwrap();

    resources.pipelines_mut().set_polygon_mode(1);
    resources.pipelines_mut().set_culling_mode(2);

    let draws: Vec<_> = resources.draws().collect();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].index_count, 36);
    assert_eq!(draws[1].index_count, tube.index_count());
    for draw in &draws {
        assert_eq!(draw.pipeline.polygon_mode, PolygonMode::Line);
        assert_eq!(draw.pipeline.cull_mode, CullMode::Front);
    }
    assert_ne!(draws[0].pipeline.id, draws[1].pipeline.id);
}

#[test]
fn test_teardown_waits_for_idle() {
    let device = MockDevice::with_alignment(256);
    let mut resources = scene(&device, 2);
    let cube = resources.add_mesh(&device, &shapes::cube(1.0, 1.0, 1.0, Vec3::ONE)).unwrap();
    resources
        .add_instance(&device, cube, ShaderKind::Phong, MeshInstanceUniforms::default())
        .unwrap();

    resources.teardown(&device).unwrap();
    assert_eq!(device.stats.borrow().waits, 1);
}
