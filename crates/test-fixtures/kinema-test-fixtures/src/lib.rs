//! Shared fixtures for the Kinema crates' integration tests.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

use kinema_animation_core::AnimationData;
use kinema_api_core::{AnimId, Transform};
use kinema_behavior_core::{
    add_state, add_transition, create_behavior_graph, AnimationState, BehaviorGraph, CompareOp,
    Condition, ParamValue,
};
use kinema_rig_core::{build_skeleton, Bone, Mesh, Skeleton};

/// Canonical two-key walk clip in the JSON interchange shape.
pub const WALK_CLIP_JSON: &str = r#"{
  "name": "Walk",
  "duration": 2.0,
  "frame_rate": 30.0,
  "total_frames": 60,
  "tracks": [
    {
      "bone": "Root",
      "keys": [
        {
          "time": 0.0,
          "transform": {
            "translation": [0.0, 0.0, 0.0],
            "rotation": [0.0, 0.0, 0.0, 1.0],
            "scale": [1.0, 1.0, 1.0]
          },
          "easing": "linear"
        },
        {
          "time": 2.0,
          "transform": {
            "translation": [0.0, 0.0, 2.0],
            "rotation": [0.0, 0.0, 0.0, 1.0],
            "scale": [1.0, 1.0, 1.0]
          },
          "easing": "linear"
        }
      ]
    }
  ]
}"#;

static WALK_CLIP: Lazy<AnimationData> = Lazy::new(|| {
    serde_json::from_str(WALK_CLIP_JSON).expect("walk clip fixture should parse")
});

/// Parse a clip from its JSON interchange form.
pub fn clip_from_json(text: &str) -> Result<AnimationData> {
    serde_json::from_str(text).context("failed to parse clip fixture")
}

/// The canned walk clip (fresh copy).
pub fn walk_clip() -> AnimationData {
    WALK_CLIP.clone()
}

/// Root -> Spine -> Chest.
pub fn three_bone_skeleton() -> Skeleton {
    let mut root = Bone::new("Root", "Root");
    root.children = vec!["Spine".into()];
    let mut spine = Bone::new("Spine", "Spine");
    spine.parent = Some("Root".into());
    spine.children = vec!["Chest".into()];
    spine.local = Transform::from_translation([0.0, 1.0, 0.0]);
    let mut chest = Bone::new("Chest", "Chest");
    chest.parent = Some("Spine".into());
    chest.local = Transform::from_translation([0.0, 1.0, 0.0]);
    build_skeleton("Hero", vec![root, spine, chest], None, 0)
        .expect("fixture skeleton should be valid")
}

/// `count` vertices spaced one unit apart along Y.
pub fn strip_mesh(count: usize) -> Mesh {
    let positions = (0..count).map(|i| [0.0, i as f32, 0.0]).collect();
    Mesh::from_positions("strip", positions)
}

/// Single-bone clip holding `x` on Root's translation for `duration` seconds.
pub fn constant_clip(name: &str, duration: f32, x: f32) -> AnimationData {
    let mut anim = AnimationData::new(name, duration);
    let track = anim.track_mut("Root");
    for time in [0.0, duration] {
        track.keys.push(kinema_animation_core::Keyframe {
            time,
            transform: Transform::from_translation([x, 0.0, 0.0]),
            easing: kinema_animation_core::Easing::Linear,
        });
    }
    anim
}

/// Idle/Walk graph transitioning on `speed > 0.5`, with a `jump` trigger
/// looping Walk back into itself.
pub fn two_state_graph(idle: AnimId, walk: AnimId) -> BehaviorGraph {
    let mut graph = create_behavior_graph("Hero");
    add_state(&mut graph, AnimationState { id: "Idle".into(), clip: idle });
    add_state(&mut graph, AnimationState { id: "Walk".into(), clip: walk });
    add_transition(
        &mut graph,
        "Idle",
        "Walk",
        Condition {
            parameter: "speed".into(),
            op: CompareOp::Greater,
            value: ParamValue::Float(0.5),
        },
    )
    .expect("fixture transition endpoints exist");
    add_transition(
        &mut graph,
        "Walk",
        "Idle",
        Condition {
            parameter: "speed".into(),
            op: CompareOp::Less,
            value: ParamValue::Float(0.5),
        },
    )
    .expect("fixture transition endpoints exist");
    add_transition(
        &mut graph,
        "Walk",
        "Walk",
        Condition {
            parameter: "jump".into(),
            op: CompareOp::Equals,
            value: ParamValue::Bool(true),
        },
    )
    .expect("fixture transition endpoints exist");
    graph.parameters.insert("speed".into(), ParamValue::Float(0.0));
    graph.parameters.insert("jump".into(), ParamValue::Trigger(false));
    graph
}
