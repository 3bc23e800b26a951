//! Pure track/pose sampling.
//!
//! Sampling never mutates and holds no hidden state: identical
//! `(track, t)` inputs produce identical poses.

use hashbrown::HashMap;

use kinema_api_core::{blend_transforms, Transform};

use crate::data::{AnimationData, BoneTrack, Easing, Keyframe};

/// Sampled pose: bone id to local transform.
pub type Pose = HashMap<String, Transform>;

/// Find the bracketing pair (k0 with time <= t, k1 with time > t).
/// Returns equal indices at the boundaries so the caller clamps to the
/// nearest pose.
fn find_bracket(keys: &[Keyframe], t: f32) -> (usize, usize) {
    let n = keys.len();
    if n == 1 || t <= keys[0].time {
        return (0, 0);
    }
    if t >= keys[n - 1].time {
        return (n - 1, n - 1);
    }
    for i in 0..(n - 1) {
        if t >= keys[i].time && t < keys[i + 1].time {
            return (i, i + 1);
        }
    }
    (n - 1, n - 1)
}

/// Shape the local parameter by the departing key's easing tag.
#[inline]
fn shape(easing: Easing, lt: f32) -> f32 {
    match easing {
        Easing::Linear => lt,
        // Cubic smoothstep stands in for the authored bezier handles.
        Easing::Bezier => lt * lt * (3.0 - 2.0 * lt),
        Easing::EaseIn => lt * lt,
        Easing::EaseOut => 1.0 - (1.0 - lt) * (1.0 - lt),
        Easing::Step => 0.0,
    }
}

/// Sample one bone track at time `t` (seconds).
///
/// Before the first and after the last keyframe the boundary pose is
/// returned unchanged. `Step` holds k0's pose until t reaches k1's time.
/// Translation/scale interpolate linearly; rotation uses slerp.
pub fn sample_track(track: &BoneTrack, t: f32) -> Transform {
    let keys = &track.keys;
    match keys.len() {
        0 => Transform::IDENTITY,
        1 => keys[0].transform,
        _ => {
            let (i0, i1) = find_bracket(keys, t);
            if i0 == i1 {
                return keys[i0].transform;
            }
            let k0 = &keys[i0];
            let k1 = &keys[i1];
            if k0.easing == Easing::Step {
                return k0.transform;
            }
            let denom = (k1.time - k0.time).max(f32::EPSILON);
            let lt = ((t - k0.time) / denom).clamp(0.0, 1.0);
            blend_transforms(&k0.transform, &k1.transform, shape(k0.easing, lt))
        }
    }
}

/// Sample every track of a clip at time `t`.
pub fn sample_pose(anim: &AnimationData, t: f32) -> Pose {
    let mut pose = Pose::with_capacity(anim.tracks.len());
    for track in &anim.tracks {
        if track.keys.is_empty() {
            continue;
        }
        pose.insert(track.bone.clone(), sample_track(track, t));
    }
    pose
}
