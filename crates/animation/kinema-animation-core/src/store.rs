//! Id-keyed clip storage and track mutation operations.

use hashbrown::HashMap;
use log::info;

use kinema_api_core::{AnimId, CoreError, IdAllocator, Transform};

use crate::data::{AnimationData, Easing, Keyframe};

const TIME_EPS: f32 = 1e-6;

/// Policy for a keyframe landing on an already-occupied timestamp.
///
/// `Overwrite` keeps tracks strictly increasing by replacing the existing
/// key's transform; `AllowDuplicate` is the explicit opt-in for duplicate-
/// time key stacking (hold poses).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum KeyConflict {
    #[default]
    Overwrite,
    AllowDuplicate,
}

/// Owns animation clips keyed by `AnimId`. Clone-on-read, snapshot commit;
/// no singleton state.
#[derive(Default, Debug)]
pub struct ClipStore {
    ids: IdAllocator,
    anims: HashMap<AnimId, AnimationData>,
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty clip at the fixed 30 fps frame rate.
    /// The duration must be a finite number of seconds > 0.
    pub fn create_animation(&mut self, name: &str, duration: f32) -> Result<AnimationData, CoreError> {
        let mut anim = AnimationData::new(name, duration);
        anim.validate_basic().map_err(CoreError::Format)?;
        let id = self.ids.alloc_anim();
        anim.id = Some(id);
        info!("created animation '{}' ({} frames)", anim.name, anim.total_frames);
        self.anims.insert(id, anim.clone());
        Ok(anim)
    }

    /// Take ownership of an existing clip (e.g. a physics bake).
    pub fn load_animation(&mut self, mut anim: AnimationData) -> AnimId {
        let id = self.ids.alloc_anim();
        anim.id = Some(id);
        self.anims.insert(id, anim);
        id
    }

    pub fn get_animation(&self, id: AnimId) -> Option<AnimationData> {
        self.anims.get(&id).cloned()
    }

    /// Borrowed read for hot paths (per-tick sampling). The reference is
    /// read-only; mutation still goes through the snapshot operations.
    pub fn animation(&self, id: AnimId) -> Option<&AnimationData> {
        self.anims.get(&id)
    }

    /// Insert a keyframe into the bone's sorted track.
    ///
    /// Insertion position is the first index whose existing time exceeds the
    /// new time. A timestamp collision follows `policy`: the default
    /// overwrites the existing key's transform instead of inserting a
    /// duplicate.
    pub fn add_keyframe(
        &mut self,
        anim: AnimId,
        bone: &str,
        time: f32,
        transform: Transform,
        policy: KeyConflict,
    ) -> Result<(), CoreError> {
        let data = self
            .anims
            .get_mut(&anim)
            .ok_or_else(|| CoreError::Reference(format!("unknown animation {anim:?}")))?;
        let track = data.track_mut(bone);

        if policy == KeyConflict::Overwrite {
            if let Some(existing) = track
                .keys
                .iter_mut()
                .find(|k| (k.time - time).abs() <= TIME_EPS)
            {
                existing.transform = transform;
                return Ok(());
            }
        }

        let idx = track
            .keys
            .iter()
            .position(|k| k.time > time)
            .unwrap_or(track.keys.len());
        track.keys.insert(
            idx,
            Keyframe {
                time,
                transform,
                easing: Easing::Linear,
            },
        );
        Ok(())
    }

    /// Retag every keyframe's easing per the fixed method mapping.
    pub fn interpolate_keyframes(
        &mut self,
        anim: AnimId,
        method: &str,
    ) -> Result<AnimationData, CoreError> {
        let data = self
            .anims
            .get_mut(&anim)
            .ok_or_else(|| CoreError::Reference(format!("unknown animation {anim:?}")))?;
        let easing = Easing::from_method(method);
        for track in &mut data.tracks {
            for key in &mut track.keys {
                key.easing = easing;
            }
        }
        Ok(data.clone())
    }

    pub fn remove_animation(&mut self, id: AnimId) -> bool {
        self.anims.remove(&id).is_some()
    }
}
