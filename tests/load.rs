mod common;

use std::path::Path;

use common::{png, Call, MemoryAssets, RecordingDevice};

use lineal::{Matrix, Vector};

use lumen::camera::Camera;
use lumen::gpu::{LayoutHandle, Program, ShaderStage};
use lumen::materials::{MapFlags, MapKind, MaterialResource};
use lumen::{DrawTarget, Error, Model, Topology};

const QUAD: &str = "\
# textured quad
mtllib quad.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl Painted
f 1/1 2/2 3/3
f 1/1 3/3 4/4
";

const PAINTED: &str = "\
newmtl Painted
Kd 0.8 0.2 0.2
map_Kd textures/paint.png
";

fn quad_assets() -> MemoryAssets {
    return MemoryAssets::new()
        .with("assets/quad.obj", QUAD)
        .with("assets/quad.mtl", PAINTED)
        .with("assets/textures/paint.png", png(2, 2));
}

#[test]
fn loads_a_textured_quad() {
    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &quad_assets(), Path::new("assets/quad.obj")).unwrap();

    assert_eq!(model.vertex_count(), 6);
    assert_eq!(model.ranges().len(), 1);

    let range = &model.ranges()[0];
    assert_eq!((range.start, range.count), (0, 6));
    assert_eq!(range.topology, Topology::TriangleList);
    assert_eq!(range.material, Some(0));

    let uploads: Vec<_> = gpu
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::UploadBuffer {
                len,
                slot,
                components,
                ..
            } => Some((*len, *slot, *components)),
            _ => None,
        })
        .collect();
    assert_eq!(uploads, vec![(18, 0, 3), (12, 2, 2)]);

    let positions = model.buffer(0).unwrap();
    assert_eq!(&gpu.buffers[&positions.id()][15..18], &[0., 1., 0.]);
    assert!(model.buffer(1).is_none());

    let material = model.material(range).unwrap();
    assert_eq!(material.diffuse(), [0.8, 0.2, 0.2]);
    assert_eq!(gpu.texture_uploads(), 1);

    model.release(&mut gpu);
    assert!(gpu.live.is_empty());
}

#[test]
fn loaded_models_start_at_the_identity_transform() {
    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &quad_assets(), Path::new("assets/quad.obj")).unwrap();

    assert!(is_identity(&model.transform));
    model.release(&mut gpu);
}

#[test]
fn diffuse_only_material_sets_a_single_flag() {
    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &quad_assets(), Path::new("assets/quad.obj")).unwrap();

    let material = &model.materials()[0];
    assert_eq!(material.flags(), MapFlags::DIFFUSE);
    assert_eq!(material.uniforms().map_flags, 2);
    assert!(material.map(MapKind::Diffuse).is_some());
    assert!(material.map(MapKind::Ambient).is_none());
    assert!(material.map(MapKind::Specular).is_none());
    assert!(material.map(MapKind::Bump).is_none());

    assert!(gpu.calls.contains(&Call::UploadTexture {
        id: material.map(MapKind::Diffuse).unwrap().id(),
        width: 2,
        height: 2,
    }));

    model.release(&mut gpu);
}

#[test]
fn layout_binds_only_uploaded_streams() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
    let assets = MemoryAssets::new().with("tri.obj", text);

    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &assets, Path::new("tri.obj")).unwrap();

    let position = model.buffer(0).unwrap().id();
    let normal = model.buffer(1).unwrap().id();
    assert!(model.buffer(2).is_none());

    let layout = gpu
        .calls
        .iter()
        .find_map(|call| match call {
            Call::CreateLayout { slots, .. } => Some(slots.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(layout, vec![(0, position, 3), (1, normal, 3)]);

    model.release(&mut gpu);
    assert!(gpu.live.is_empty());
}

#[test]
fn groups_sharing_a_material_share_one_resource() {
    let text = "\
mtllib shared.mtl
v 0 0 0
vt 0 0
g Left
usemtl Painted
f 1/1 1/1 1/1
g Middle
usemtl Missing
f 1/1 1/1 1/1
g Right
usemtl Painted
f 1/1 1/1 1/1
";
    let assets = quad_assets()
        .with("assets/shared.obj", text)
        .with("assets/shared.mtl", PAINTED);

    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &assets, Path::new("assets/shared.obj")).unwrap();

    let summary: Vec<_> = model
        .ranges()
        .iter()
        .map(|range| (range.name.as_str(), range.start, range.count, range.material))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Left", 0, 3, Some(0)),
            ("Middle", 3, 3, None),
            ("Right", 6, 3, Some(0)),
        ]
    );
    assert_eq!(model.materials().len(), 1);
    assert_eq!(gpu.texture_uploads(), 1);

    model.release(&mut gpu);
    assert!(gpu.live.is_empty());
}

#[test]
fn later_libraries_override_earlier_definitions() {
    let text = "mtllib a.mtl\nmtllib b.mtl\nv 0 0 0\nvt 0 0\nusemtl Paint\nf 1/1 1/1 1/1\n";
    let assets = MemoryAssets::new()
        .with("m.obj", text)
        .with("a.mtl", "newmtl Paint\nKd 1 0 0\n")
        .with("b.mtl", "newmtl Paint\nKd 0 0 1\n");

    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &assets, Path::new("m.obj")).unwrap();

    assert_eq!(model.materials()[0].diffuse(), [0., 0., 1.]);
    model.release(&mut gpu);
}

#[test]
fn missing_texture_releases_everything_already_uploaded() {
    let assets = MemoryAssets::new()
        .with("assets/quad.obj", QUAD)
        .with("assets/quad.mtl", PAINTED);

    let mut gpu = RecordingDevice::new();
    let result = Model::load(&mut gpu, &assets, Path::new("assets/quad.obj"));

    match result {
        Err(Error::Io { path, .. }) => assert_eq!(path, Path::new("assets/textures/paint.png")),
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(gpu
        .calls
        .iter()
        .any(|call| matches!(call, Call::UploadBuffer { .. })));
    assert!(gpu.live.is_empty());
}

#[test]
fn failed_texture_upload_releases_earlier_materials() {
    let text = "\
mtllib two.mtl
v 0 0 0
vt 0 0
g A
usemtl First
f 1/1 1/1 1/1
g B
usemtl Second
f 1/1 1/1 1/1
";
    let library = "\
newmtl First
map_Ka a.png
map_Kd a.png
newmtl Second
map_Kd b.png
";
    let assets = MemoryAssets::new()
        .with("two.obj", text)
        .with("two.mtl", library)
        .with("a.png", png(1, 1))
        .with("b.png", png(1, 1));

    let mut gpu = RecordingDevice::new();
    gpu.texture_budget = Some(2);

    let result = Model::load(&mut gpu, &assets, Path::new("two.obj"));
    assert!(matches!(result, Err(Error::Gpu(_))));
    assert_eq!(gpu.texture_uploads(), 2);
    assert!(gpu.live.is_empty());
}

#[test]
fn parse_errors_touch_no_gpu_state() {
    let assets = MemoryAssets::new().with("bad.obj", "v 0 0 0\nf 1 1 1\n");

    let mut gpu = RecordingDevice::new();
    let result = Model::load(&mut gpu, &assets, Path::new("bad.obj"));

    assert!(matches!(result, Err(Error::Malformed { line_number: 2, .. })));
    assert!(gpu.calls.is_empty());
}

#[derive(Default)]
struct Recorder {
    commands: Vec<String>,
}

fn is_identity(matrix: &Matrix<f32, 4, 4>) -> bool {
    return (0..4).all(|i| (0..4).all(|j| matrix[i][j] == if i == j { 1. } else { 0. }));
}

impl DrawTarget for Recorder {
    fn bind_transforms(
        &mut self,
        model: &Matrix<f32, 4, 4>,
        _view: &Matrix<f32, 4, 4>,
        _projection: &Matrix<f32, 4, 4>,
    ) {
        let kind = if is_identity(model) { "identity" } else { "moved" };
        self.commands.push(format!("transforms {}", kind));
    }

    fn bind_layout(&mut self, layout: &LayoutHandle) {
        self.commands.push(format!("layout {}", layout.id()));
    }

    fn bind_material(&mut self, material: &MaterialResource) {
        self.commands.push(format!("material {:?}", material.diffuse()));
    }

    fn draw(&mut self, _topology: Topology, start: u32, count: u32) {
        self.commands.push(format!("draw {} {}", start, count));
    }
}

#[test]
fn draw_walks_ranges_in_order() {
    let text = "\
mtllib colors.mtl
v 0 0 0
vn 0 0 1
g Red
usemtl Red
f 1//1 1//1 1//1
f 1//1 1//1 1//1
g Plain
f 1//1 1//1 1//1
g Blue
usemtl Blue
f 1//1 1//1 1//1
";
    let assets = MemoryAssets::new()
        .with("colors.obj", text)
        .with("colors.mtl", "newmtl Red\nKd 1 0 0\nnewmtl Blue\nKd 0 0 1\n");

    let mut gpu = RecordingDevice::new();
    let model = Model::load(&mut gpu, &assets, Path::new("colors.obj")).unwrap();

    let camera = Camera::new(
        Vector::new([0., 0., -5.]),
        Vector::new([0., 0., 1.]),
        45.0f32.to_radians(),
        4. / 3.,
        0.1,
        100.,
    );
    let mut recorder = Recorder::default();
    model.draw(&camera, &mut recorder);

    let layout = format!("layout {}", model.layout().id());
    assert_eq!(
        recorder.commands,
        vec![
            "transforms identity",
            layout.as_str(),
            "material [1.0, 0.0, 0.0]",
            "draw 0 6",
            "draw 6 3",
            "material [0.0, 0.0, 1.0]",
            "draw 9 3",
        ]
    );

    model.release(&mut gpu);
    assert!(gpu.live.is_empty());
}

#[test]
fn programs_are_compiled_from_stage_files() {
    let assets = MemoryAssets::new()
        .with("shaders/mesh.vert.spv", vec![0u8; 4])
        .with("shaders/mesh.frag.spv", vec![0u8; 4]);

    let mut gpu = RecordingDevice::new();
    let program = Program::load(
        &mut gpu,
        &assets,
        &[Path::new("shaders/mesh.vert.spv"), Path::new("shaders/mesh.frag.spv")],
    )
    .unwrap();

    assert!(gpu.calls.contains(&Call::CompileProgram {
        id: program.handle().id(),
        stages: 2,
    }));
    assert_eq!(
        ShaderStage::from_path(Path::new("shaders/mesh.frag.spv")),
        Some(ShaderStage::Fragment)
    );

    program.release(&mut gpu);
    assert!(gpu.live.is_empty());

    let result = Program::load(&mut gpu, &assets, &[Path::new("shaders/mesh.glsl")]);
    assert!(matches!(result, Err(Error::Compile { .. })));
}
