//! Simplified physics integrator.
//!
//! The baseline model is an explicit settle: each bone's Y translation
//! decreases proportionally to the elapsed frame index, clamped at y >= 0.
//! Richer solvers (ragdoll chains, collision shapes) implement
//! `PhysicsModel` behind the same call sites.

use log::debug;

use kinema_api_core::{CancellationToken, CoreError, Transform};
use kinema_rig_core::{Bone, Skeleton};

use crate::data::{AnimationData, Easing, Keyframe, FRAME_RATE};

/// Per-bone, per-frame transform model.
pub trait PhysicsModel {
    fn step(&self, bone: &Bone, frame: u32) -> Transform;
}

/// Explicit settle: drop along Y proportional to the frame index.
#[derive(Clone, Copy, Debug)]
pub struct SettleModel {
    /// Units of Y lost per frame.
    pub drop_per_frame: f32,
}

impl Default for SettleModel {
    fn default() -> Self {
        SettleModel {
            drop_per_frame: 0.05,
        }
    }
}

impl PhysicsModel for SettleModel {
    fn step(&self, bone: &Bone, frame: u32) -> Transform {
        let mut out = bone.local;
        let y = out.translation[1] - self.drop_per_frame * frame as f32;
        out.translation[1] = y.max(0.0);
        out
    }
}

/// Bake `frame_count` frames of simulated motion into a clip with one track
/// per bone. Cancellation is checked once per simulated frame; an aborted
/// bake leaves no partial state behind.
pub fn simulate_physics(
    skeleton: &Skeleton,
    frame_count: u32,
    model: &dyn PhysicsModel,
    cancel: &CancellationToken,
) -> Result<AnimationData, CoreError> {
    let mut anim = AnimationData::new(
        format!("{}_physics", skeleton.name),
        frame_count as f32 / FRAME_RATE,
    );
    for frame in 0..frame_count {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        let time = frame as f32 / FRAME_RATE;
        for bone in &skeleton.bones {
            anim.track_mut(&bone.id).keys.push(Keyframe {
                time,
                transform: model.step(bone, frame),
                easing: Easing::Linear,
            });
        }
    }
    debug!(
        "simulated {} frames for '{}' ({} tracks)",
        frame_count,
        skeleton.name,
        anim.tracks.len()
    );
    Ok(anim)
}
