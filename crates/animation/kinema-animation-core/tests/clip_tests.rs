use kinema_animation_core::{
    sample_pose, sample_track, simulate_physics, ClipStore, ExportFormat, Exporter, JsonRigCodec,
    KeyConflict, RigCodec, SettleModel,
};
use kinema_api_core::{CancellationToken, Transform};
use kinema_test_fixtures::{clip_from_json, three_bone_skeleton, walk_clip, WALK_CLIP_JSON};

#[test]
fn create_animation_frame_math() {
    let mut store = ClipStore::new();
    let walk = store.create_animation("Walk", 2.0).unwrap();
    assert_eq!(walk.frame_rate, 30.0);
    assert_eq!(walk.total_frames, 60);
}

#[test]
fn insert_between_existing_keys() {
    let mut store = ClipStore::new();
    let id = store.create_animation("Walk", 4.0).unwrap().id.unwrap();
    store
        .add_keyframe(id, "Spine", 1.0, Transform::IDENTITY, KeyConflict::Overwrite)
        .unwrap();
    store
        .add_keyframe(id, "Spine", 3.0, Transform::IDENTITY, KeyConflict::Overwrite)
        .unwrap();
    store
        .add_keyframe(id, "Spine", 2.0, Transform::IDENTITY, KeyConflict::Overwrite)
        .unwrap();

    let anim = store.get_animation(id).unwrap();
    let times: Vec<f32> = anim
        .track("Spine")
        .unwrap()
        .keys
        .iter()
        .map(|k| k.time)
        .collect();
    assert_eq!(times, vec![1.0, 2.0, 3.0]);
    assert!(anim.validate_basic().is_ok());
}

#[test]
fn walk_fixture_samples_linearly() {
    let clip = walk_clip();
    let track = clip.track("Root").unwrap();
    let mid = sample_track(track, 1.0);
    assert!((mid.translation[2] - 1.0).abs() < 1e-5);

    // Clamped outside the key range.
    assert_eq!(sample_track(track, -1.0).translation[2], 0.0);
    assert_eq!(sample_track(track, 99.0).translation[2], 2.0);

    let pose = sample_pose(&clip, 0.5);
    assert!(pose.contains_key("Root"));
}

#[test]
fn fixture_json_round_trips() {
    let clip = clip_from_json(WALK_CLIP_JSON).unwrap();
    assert_eq!(clip.name, "Walk");
    assert_eq!(clip.total_frames, 60);
}

#[test]
fn physics_bake_loads_into_store_and_samples() {
    let skeleton = three_bone_skeleton();
    let baked = simulate_physics(
        &skeleton,
        30,
        &SettleModel { drop_per_frame: 0.1 },
        &CancellationToken::new(),
    )
    .unwrap();

    let mut store = ClipStore::new();
    let id = store.load_animation(baked);
    let anim = store.animation(id).unwrap();
    assert_eq!(anim.tracks.len(), 3);

    // Spine starts at y=1 and settles onto the ground.
    let spine = anim.track("Spine").unwrap();
    assert!((spine.keys[0].transform.translation[1] - 1.0).abs() < 1e-6);
    assert_eq!(spine.keys.last().unwrap().transform.translation[1], 0.0);
}

#[test]
fn export_writes_under_naming_convention() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path().join("exports"));
    let skeleton = three_bone_skeleton();
    let clip = walk_clip();

    let path = exporter
        .export(&clip, &skeleton, ExportFormat::Hkx, &JsonRigCodec, 1700000000000)
        .unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Walk_1700000000000.hkx"
    );
    assert!(path.exists());
}

#[test]
fn export_is_byte_identical_for_fixed_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path());
    let skeleton = three_bone_skeleton();
    let clip = walk_clip();

    let a = exporter
        .export(&clip, &skeleton, ExportFormat::Fbx, &JsonRigCodec, 42)
        .unwrap();
    let first = std::fs::read(&a).unwrap();
    let b = exporter
        .export(&clip, &skeleton, ExportFormat::Fbx, &JsonRigCodec, 42)
        .unwrap();
    let second = std::fs::read(&b).unwrap();
    assert_eq!(a, b);
    assert_eq!(first, second);
}

#[test]
fn codec_decode_recovers_encoded_skeleton() {
    let skeleton = three_bone_skeleton();
    let clip = walk_clip();
    let bytes = JsonRigCodec.encode(&clip, &skeleton).unwrap();
    // The export document embeds the skeleton; a decoder for the interchange
    // shape is a host concern, but the bytes must stay parseable JSON.
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["animation"]["name"], "Walk");
    assert_eq!(doc["skeleton"]["root"], "Root");
}
