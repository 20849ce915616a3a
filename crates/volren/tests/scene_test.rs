//! End-to-end tests for the scene context with in-memory resources.

use std::io::{Cursor, Write};
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use image::{GrayImage, ImageFormat, Luma};
use proptest::prelude::*;
use volren::*;

const ARTERIES: &str = r#"{
    "version": 1,
    "name": "arteries",
    "colourPoints": [
        { "dataValue": -1024, "colourValue": { "r": 0.0, "g": 0.0, "b": 0.0, "a": 1.0 } },
        { "dataValue": 200, "colourValue": { "r": 1.0, "g": 0.2, "b": 0.1, "a": 1.0 } },
        { "dataValue": 3071, "colourValue": { "r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0 } }
    ],
    "alphaPoints": [
        { "dataValue": -1024, "alphaValue": 0.0 },
        { "dataValue": 150, "alphaValue": 0.0 },
        { "dataValue": 400, "alphaValue": 0.8 }
    ]
}"#;

const LUNG: &str = r#"{
    "name": "lung",
    "colourPoints": [
        { "dataValue": -600, "colourValue": { "r": 0.9, "g": 0.6, "b": 0.5, "a": 1.0 } }
    ],
    "alphaPoints": []
}"#;

#[derive(Default)]
struct RecordingSink {
    uploads: Vec<(String, TexelFormat, u32, u32, u32, usize)>,
    fail: bool,
}

impl TextureSink for RecordingSink {
    fn upload(&mut self, texture: &TextureUpload<'_>) -> Result<()> {
        if self.fail {
            return Err(VolrenError::Upload("device lost".into()));
        }
        texture.validate()?;
        self.uploads.push((
            texture.label.to_string(),
            texture.format,
            texture.width,
            texture.height,
            texture.depth,
            texture.bytes.len(),
        ));
        Ok(())
    }
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn png(width: u32, height: u32, value: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    GrayImage::from_pixel(width, height, Luma([value]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn head_voxels() -> Vec<u8> {
    (0..4 * 4 * 2)
        .map(|i| i16::try_from(i * 100 - 1024).unwrap())
        .flat_map(i16::to_le_bytes)
        .collect()
}

fn datasets() -> DatasetTable {
    DatasetTable::default()
        .with_entry(
            BodyPart::Head,
            DatasetEntry {
                dimension: UVec3::new(4, 4, 2),
                resolution: Vec3::new(0.05, 0.05, 0.1),
                source: VolumeSource::Raw {
                    archive: "head.raw.gz".into(),
                },
            },
        )
        .with_entry(
            BodyPart::Chest,
            DatasetEntry {
                dimension: UVec3::new(3, 2, 2),
                resolution: Vec3::new(0.1, 0.1, 0.2),
                source: VolumeSource::ImageStack {
                    prefix: "chest_".into(),
                    extension: "png".into(),
                    slices: 2,
                },
            },
        )
}

fn resources() -> MemoryResources {
    let mut res = MemoryResources::new();
    res.insert("head.raw.gz", gzip(&head_voxels()));
    res.insert("chest_0000.png", png(3, 2, 0));
    res.insert("chest_0001.png", png(3, 2, 255));
    res.insert("ct_arteries.tf", ARTERIES.as_bytes().to_vec());
    res.insert("ct_lung.tf", LUNG.as_bytes().to_vec());
    res.insert("ct_entire.tf", b"{ \"colourPoints\": 3 }".to_vec());
    res
}

fn scene_with(res: MemoryResources) -> VolumeScene<MemoryResources> {
    VolumeScene::new(
        Options::default(),
        datasets(),
        PresetTable::default(),
        res,
        Camera::new(1.0).unwrap(),
    )
    .unwrap()
}

fn scene() -> VolumeScene<MemoryResources> {
    scene_with(resources())
}

#[test]
fn test_initial_scene_uploads_everything_once() {
    init_logging();
    let mut scene = scene();
    assert_eq!(scene.options().body_part, BodyPart::None);
    assert_eq!(*scene.volume(), Volume::placeholder());
    assert_eq!(scene.transfer_function().name, "arteries");
    assert!(scene.has_pending_uploads());

    let mut sink = RecordingSink::default();
    assert_eq!(scene.upload_pending(&mut sink).unwrap(), 2);
    assert_eq!(
        sink.uploads[0],
        ("volume".to_string(), TexelFormat::R16Sint, 1, 1, 1, 2)
    );
    assert_eq!(
        sink.uploads[1],
        (
            "transfer function".to_string(),
            TexelFormat::Rgba32Float,
            512,
            2,
            1,
            512 * 2 * 16
        )
    );

    assert!(!scene.has_pending_uploads());
    assert_eq!(scene.upload_pending(&mut sink).unwrap(), 0);
    assert_eq!(sink.uploads.len(), 2);
}

#[test]
fn test_set_part_loads_and_rescales() {
    let mut scene = scene();
    scene.set_shift(100.0).unwrap();
    let mut sink = RecordingSink::default();
    scene.upload_pending(&mut sink).unwrap();

    scene.set_part(BodyPart::Head).unwrap();
    assert_eq!(scene.options().body_part, BodyPart::Head);
    assert_eq!(scene.options().shift, 0.0);
    assert_eq!(scene.volume().descriptor.dimension, UVec3::new(4, 4, 2));
    assert_eq!(scene.volume().buffer.sample(0, 0, 0), Some(-1024.0));
    assert_eq!(scene.volume().buffer.sample(3, 3, 1), Some(2076.0));

    let scale = scene.volume().descriptor.physical_scale();
    assert!(scene
        .parameters()
        .model_matrix()
        .abs_diff_eq(math::scale_matrix(scale), 1e-6));

    let unshifted = resample(scene.transfer_function());
    assert_eq!(*scene.lookup_texture(), unshifted);

    sink.uploads.clear();
    assert_eq!(scene.upload_pending(&mut sink).unwrap(), 2);
    assert_eq!(sink.uploads[0].1, TexelFormat::R16Sint);
    assert_eq!(sink.uploads[0].5, 4 * 4 * 2 * 2);
}

#[test]
fn test_image_stack_part() {
    let mut scene = scene();
    scene.set_part(BodyPart::Chest).unwrap();
    let volume = scene.volume();
    assert_eq!(volume.descriptor.element_type, ElementType::Float32);
    assert_eq!(volume.descriptor.dimension, UVec3::new(3, 2, 2));
    assert_eq!(volume.buffer.sample(1, 1, 0), Some(0.0));
    assert!((volume.buffer.sample(1, 1, 1).unwrap() - 1.0).abs() < 1e-6);

    let mut sink = RecordingSink::default();
    scene.upload_pending(&mut sink).unwrap();
    assert_eq!(sink.uploads[0].1, TexelFormat::R32Float);
}

#[test]
fn test_failed_part_change_keeps_last_good_state() {
    let mut res = resources();
    res.remove("head.raw.gz");
    let mut scene = scene_with(res);
    scene.set_part(BodyPart::Chest).unwrap();
    scene.set_shift(50.0).unwrap();
    let mut sink = RecordingSink::default();
    scene.upload_pending(&mut sink).unwrap();

    let volume_before = scene.volume().clone();
    let lut_before = scene.lookup_texture().clone();
    let params_before = *scene.parameters();
    let generation = scene.frame_source().volume_generation();

    let err = scene.set_part(BodyPart::Head).unwrap_err();
    assert!(matches!(err, VolrenError::ResourceNotFound(ref name) if name == "head.raw.gz"));
    assert!(err.is_ingestion_failure());

    assert_eq!(scene.options().body_part, BodyPart::Chest);
    assert_eq!(scene.options().shift, 50.0);
    assert_eq!(*scene.volume(), volume_before);
    assert_eq!(*scene.lookup_texture(), lut_before);
    assert_eq!(*scene.parameters(), params_before);
    assert_eq!(scene.frame_source().volume_generation(), generation);
    assert!(!scene.has_pending_uploads());
}

#[test]
fn test_truncated_archive_is_rejected() {
    let mut res = resources();
    let mut short = head_voxels();
    short.truncate(short.len() - 2);
    res.insert("head.raw.gz", gzip(&short));
    let mut scene = scene_with(res);

    assert!(matches!(
        scene.set_part(BodyPart::Head),
        Err(VolrenError::CorruptArchive { .. })
    ));
    assert_eq!(*scene.volume(), Volume::placeholder());
}

#[test]
fn test_preset_switch_and_failures() {
    let mut scene = scene();
    scene.set_shift(-200.0).unwrap();

    scene.set_preset(Preset::CtLung).unwrap();
    assert_eq!(scene.options().preset, Preset::CtLung);
    assert_eq!(scene.options().shift, 0.0);
    assert_eq!(scene.transfer_function().name, "lung");

    // One color stop and no alpha stops: white at both ends, alpha ramps 0 -> 1.
    let lut = scene.lookup_texture();
    assert_eq!(lut.texel(0, 0), Some([1.0, 1.0, 1.0, 0.0]));
    assert_eq!(lut.texel(LUT_WIDTH - 1, 1), Some([1.0, 1.0, 1.0, 1.0]));

    let lut_before = lut.clone();
    assert!(matches!(
        scene.set_preset(Preset::CtEntire),
        Err(VolrenError::Format(_))
    ));
    assert_eq!(scene.options().preset, Preset::CtLung);
    assert_eq!(*scene.lookup_texture(), lut_before);
}

#[test]
fn test_shift_round_trip() {
    let mut scene = scene();
    let unshifted = scene.lookup_texture().clone();
    scene.set_shift(120.0).unwrap();
    assert_ne!(*scene.lookup_texture(), unshifted);
    assert_eq!(scene.options().shift, 120.0);
    scene.set_shift(0.0).unwrap();
    assert_eq!(*scene.lookup_texture(), unshifted);

    assert!(matches!(
        scene.set_shift(f32::NAN),
        Err(VolrenError::Format(_))
    ));
    assert_eq!(scene.options().shift, 0.0);
}

#[test]
fn test_uniform_controls() {
    let mut scene = scene();
    scene.set_method(RenderMethod::Mip);
    scene.set_lighting(false);
    scene.set_quality(256).unwrap();
    assert!(scene.set_quality(0).is_err());

    let uniforms = scene.uniforms();
    assert_eq!(uniforms.method, 2);
    assert_eq!(uniforms.lighting_enabled, 0);
    assert_eq!(uniforms.rendering_quality, 256);
    assert_eq!(scene.parameters().render_quality, 256);

    let frame = scene.frame_source().frame();
    assert_eq!(*frame.uniforms, *uniforms);
    assert_eq!(frame.parameters.render_quality, 256);
}

#[test]
fn test_drag_publishes_parameters() {
    let mut scene = scene();
    let source = scene.frame_source();
    let before = *source.parameters();

    assert!(!scene.update());
    assert_eq!(source.generation(), 0);
    scene.begin_drag();
    scene.drag_changed(Vec2::new(0.0, 0.0));
    assert!(scene.update());
    assert_eq!(source.parameters().model, before.model);

    scene.drag_changed(Vec2::new(500.0, 250.0));
    assert!(scene.update());
    scene.end_drag();
    assert!(!scene.update());
    assert_eq!(source.generation(), 2);

    let after = source.parameters();
    assert_ne!(after.model, before.model);
    assert_eq!(*after, *scene.parameters());
    let m = after.model_matrix() * after.inverse_model_matrix();
    assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
}

#[test]
fn test_zero_drag_cycle_keeps_model() {
    let mut scene = scene();
    scene.set_part(BodyPart::Head).unwrap();
    let before = scene.parameters().model;
    scene.begin_drag();
    scene.drag_by(Vec2::ZERO);
    scene.update();
    scene.end_drag();
    scene.update();
    assert_eq!(scene.parameters().model, before);
}

#[test]
fn test_camera_validation() {
    let mut scene = scene();
    let mut camera = scene.camera().clone();
    camera.position = camera.target;
    assert!(matches!(
        scene.set_camera(camera),
        Err(VolrenError::InvalidProjection(_))
    ));

    let mut camera = scene.camera().clone();
    camera.set_clip_planes(0.5, 20.0).unwrap();
    camera.position = Vec3::new(0.0, 1.0, 4.0);
    scene.set_camera(camera).unwrap();
    assert_eq!(
        scene.frame_source().parameters().camera_world_position(),
        Vec3::new(0.0, 1.0, 4.0)
    );
}

#[test]
fn test_failed_upload_stays_pending() {
    let mut scene = scene();
    let mut sink = RecordingSink {
        fail: true,
        ..Default::default()
    };
    assert!(matches!(
        scene.upload_pending(&mut sink),
        Err(VolrenError::Upload(_))
    ));
    assert!(scene.has_pending_uploads());

    sink.fail = false;
    assert_eq!(scene.upload_pending(&mut sink).unwrap(), 2);
}

#[test]
fn test_missing_initial_preset_fails_construction() {
    let mut res = resources();
    res.remove("ct_arteries.tf");
    let result = VolumeScene::new(
        Options::default(),
        datasets(),
        PresetTable::default(),
        res,
        Camera::default(),
    );
    assert!(matches!(result, Err(VolrenError::ResourceNotFound(_))));
}

#[test]
fn test_reader_thread_sees_whole_lookup_textures() {
    let mut scene = scene();
    let source = scene.frame_source();
    let reader = std::thread::spawn(move || {
        for _ in 0..200 {
            let frame = source.frame();
            let lut = Arc::clone(&frame.lookup_texture);
            assert_eq!(lut.row(0), lut.row(1));
            assert_eq!(lut.as_bytes().len(), LUT_WIDTH * LUT_HEIGHT * 16);
        }
    });
    for i in 0..50 {
        scene.set_shift(i as f32 * 10.0).unwrap();
    }
    reader.join().unwrap();
    assert_eq!(scene.frame_source().lookup_texture_generation(), 50);
}

#[test]
fn test_reader_thread_never_sees_mixed_frames() {
    let mut scene = scene();
    scene.set_part(BodyPart::Head).unwrap();
    let source = scene.frame_source();
    let done = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let reader = {
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            let mut frames = 0;
            while !done.load(std::sync::atomic::Ordering::Relaxed) || frames == 0 {
                let frame = source.frame();
                let scale = math::scale_matrix(frame.volume.descriptor.physical_scale());
                assert!(frame.parameters.model_matrix().abs_diff_eq(scale, 1e-6));
                assert_eq!(frame.volume_generation, frame.lookup_texture_generation);
                frames += 1;
            }
        })
    };
    for i in 0..200 {
        let part = if i % 2 == 0 { BodyPart::Chest } else { BodyPart::Head };
        scene.set_part(part).unwrap();
    }
    done.store(true, std::sync::atomic::Ordering::Relaxed);
    reader.join().unwrap();

    let frame = scene.frame_source().frame();
    assert_eq!(frame.volume_generation, 201);
    assert_eq!(*frame.volume, *scene.volume());
}

#[test]
fn test_non_positive_quality_from_json_is_rejected() {
    let options = Options::from_json(r#"{"render_quality": 0}"#).unwrap();
    let result = VolumeScene::new(
        options,
        datasets(),
        PresetTable::default(),
        resources(),
        Camera::default(),
    );
    assert!(matches!(result, Err(VolrenError::Format(_))));
}

#[test]
fn test_options_from_json_drive_scene() {
    let options = Options::from_json(r#"{"body_part": "head", "shift": 25.0, "method": "surface"}"#).unwrap();
    let scene = VolumeScene::new(
        options,
        datasets(),
        PresetTable::default(),
        resources(),
        Camera::default(),
    )
    .unwrap();
    assert_eq!(scene.options().body_part, BodyPart::Head);
    assert_eq!(scene.uniforms().method, 0);
    let shifted = resample(&scene.transfer_function().clone().with_shift(25.0));
    assert_eq!(*scene.lookup_texture(), shifted);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_scene_shift_matches_direct_resample(shift in -800.0f32..800.0) {
        let mut scene = scene();
        scene.set_shift(shift).unwrap();
        let expected = resample(&scene.transfer_function().clone().with_shift(shift));
        prop_assert_eq!(scene.lookup_texture(), &expected);
        let frame = scene.frame_source().frame();
        prop_assert_eq!(frame.lookup_texture.as_ref(), &expected);
    }
}
