use kinema_animation_core::ClipStore;
use kinema_api_core::CoreError;
use kinema_behavior_core::{
    add_state, create_behavior_graph, AnimationState, GraphRuntime, GraphStore, ParamValue,
};
use kinema_test_fixtures::{constant_clip, two_state_graph};

/// Idle holds Root.x at 0, Walk holds it at 1, so the blend weight is
/// directly observable in the output pose.
fn runtime_with_clips() -> (GraphRuntime, ClipStore) {
    let mut clips = ClipStore::new();
    let idle = clips.load_animation(constant_clip("Idle", 10.0, 0.0));
    let walk = clips.load_animation(constant_clip("Walk", 10.0, 1.0));
    let graph = two_state_graph(idle, walk);
    (GraphRuntime::new(graph).unwrap(), clips)
}

#[test]
fn starts_in_default_state() {
    let (mut rt, clips) = runtime_with_clips();
    assert_eq!(rt.current_state(), "Idle");
    let pose = rt.update(0.1, &clips);
    assert_eq!(pose["Root"].translation[0], 0.0);
}

#[test]
fn graph_without_default_state_is_rejected() {
    let graph = create_behavior_graph("Hero");
    let err = GraphRuntime::new(graph).unwrap_err();
    assert!(matches!(err, CoreError::Format(_)));
}

#[test]
fn transition_fires_and_ramps_linearly() {
    let (mut rt, clips) = runtime_with_clips();
    rt.update(0.1, &clips);

    rt.set_param("speed", ParamValue::Float(1.0));
    // Fire tick: blend starts at weight 0 (pure source pose).
    let pose = rt.update(0.05, &clips);
    assert_eq!(rt.current_state(), "Walk");
    assert!(rt.is_blending());
    assert!(pose["Root"].translation[0].abs() < 1e-6);

    // 0.05 s into the 0.25 s blend: weight 0.2.
    let pose = rt.update(0.05, &clips);
    assert!((pose["Root"].translation[0] - 0.2).abs() < 1e-5);

    // Past the blend duration the destination pose wins outright.
    for _ in 0..5 {
        rt.update(0.1, &clips);
    }
    assert!(!rt.is_blending());
    let pose = rt.update(0.1, &clips);
    assert!((pose["Root"].translation[0] - 1.0).abs() < 1e-6);
}

#[test]
fn declaration_order_picks_first_satisfied() {
    let mut clips = ClipStore::new();
    let a = clips.load_animation(constant_clip("A", 5.0, 0.0));
    let b = clips.load_animation(constant_clip("B", 5.0, 1.0));
    let c = clips.load_animation(constant_clip("C", 5.0, 2.0));

    let mut graph = two_state_graph(a, b);
    add_state(&mut graph, AnimationState { id: "Other".into(), clip: c });
    // Second Idle transition with the same satisfied condition; the first
    // declared one (Idle -> Walk) must win.
    kinema_behavior_core::add_transition(
        &mut graph,
        "Idle",
        "Other",
        kinema_behavior_core::Condition {
            parameter: "speed".into(),
            op: kinema_behavior_core::CompareOp::Greater,
            value: ParamValue::Float(0.5),
        },
    )
    .unwrap();

    let mut rt = GraphRuntime::new(graph).unwrap();
    rt.set_param("speed", ParamValue::Float(1.0));
    rt.update(0.05, &clips);
    assert_eq!(rt.current_state(), "Walk");
}

#[test]
fn trigger_resets_after_consumption() {
    let (mut rt, clips) = runtime_with_clips();
    rt.set_param("speed", ParamValue::Float(1.0));
    // Enter Walk and let the blend finish.
    for _ in 0..10 {
        rt.update(0.1, &clips);
    }
    assert_eq!(rt.current_state(), "Walk");
    assert!(!rt.is_blending());

    rt.set_param("jump", ParamValue::Trigger(true));
    rt.update(0.05, &clips);
    // Walk -> Walk fired and consumed the trigger.
    assert!(rt.is_blending());
    assert_eq!(rt.param("jump"), Some(ParamValue::Trigger(false)));
}

#[test]
fn same_target_suppressed_while_blending() {
    let (mut rt, clips) = runtime_with_clips();
    rt.set_param("speed", ParamValue::Float(1.0));
    rt.update(0.05, &clips);
    assert_eq!(rt.current_state(), "Walk");
    assert!(rt.is_blending());

    // The Walk -> Walk trigger targets the in-flight state and
    // can_interrupt_self is false, so it must not fire mid-blend.
    rt.set_param("jump", ParamValue::Trigger(true));
    rt.update(0.05, &clips);
    assert_eq!(rt.param("jump"), Some(ParamValue::Trigger(true)));

    // Once the blend completes the queued trigger fires normally.
    for _ in 0..5 {
        rt.update(0.1, &clips);
    }
    assert_eq!(rt.param("jump"), Some(ParamValue::Trigger(false)));
}

#[test]
fn store_owned_graph_drives_a_runtime() {
    let mut clips = ClipStore::new();
    let idle = clips.load_animation(constant_clip("Idle", 10.0, 0.0));
    let walk = clips.load_animation(constant_clip("Walk", 10.0, 1.0));

    let mut graphs = GraphStore::new();
    let stored = graphs.load_graph(two_state_graph(idle, walk)).unwrap();
    let id = stored.id.expect("store assigns an id on load");

    let mut rt = GraphRuntime::new(graphs.get_graph(id).unwrap()).unwrap();
    rt.set_param("speed", ParamValue::Float(1.0));
    rt.update(0.05, &clips);
    assert_eq!(rt.current_state(), "Walk");
    // The runtime advanced on its own clone; the stored snapshot is unchanged.
    assert_eq!(graphs.get_graph(id).unwrap().default_state.as_deref(), Some("Idle"));
}

#[test]
fn runs_indefinitely_without_terminal_states() {
    let (mut rt, clips) = runtime_with_clips();
    for _ in 0..1000 {
        rt.update(0.016, &clips);
    }
    assert_eq!(rt.current_state(), "Idle");
}
