//! Canonical animation data model: per-bone keyframe tracks.

use serde::{Deserialize, Serialize};

use kinema_api_core::{AnimId, Transform};

/// Fixed authoring frame rate.
pub const FRAME_RATE: f32 = 30.0;

/// Easing tag attached to a keyframe; shapes the time parameter of the
/// segment departing from that key.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    Bezier,
    Step,
    EaseIn,
    EaseOut,
}

impl Easing {
    /// Fixed mapping from interpolation method names to easing tags.
    /// Unknown methods fall back to linear.
    pub fn from_method(method: &str) -> Easing {
        match method {
            "linear" => Easing::Linear,
            "bezier" | "catmull-rom" => Easing::Bezier,
            "step" => Easing::Step,
            "ease-in" | "ease-in-out" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            _ => Easing::Linear,
        }
    }
}

/// A timestamped pose sample on a bone track.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    /// Seconds from clip start.
    pub time: f32,
    pub transform: Transform,
    pub easing: Easing,
}

/// Ordered keyframe list for one bone. Key times are strictly increasing
/// unless duplicates were explicitly opted into at insertion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BoneTrack {
    pub bone: String,
    pub keys: Vec<Keyframe>,
}

/// An animation clip: per-bone tracks plus identity metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationData {
    /// Internal id assigned when loaded into a store.
    #[serde(skip)]
    pub id: Option<AnimId>,
    pub name: String,
    /// Seconds.
    pub duration: f32,
    pub frame_rate: f32,
    pub total_frames: u32,
    pub tracks: Vec<BoneTrack>,
    #[serde(default)]
    pub layers: Vec<String>,
}

impl AnimationData {
    /// Empty clip at the fixed frame rate;
    /// `total_frames = ceil(duration * frame_rate)`.
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        AnimationData {
            id: None,
            name: name.into(),
            duration,
            frame_rate: FRAME_RATE,
            total_frames: (duration * FRAME_RATE).ceil() as u32,
            tracks: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn track(&self, bone: &str) -> Option<&BoneTrack> {
        self.tracks.iter().find(|t| t.bone == bone)
    }

    /// Track for `bone`, created empty on first use.
    pub fn track_mut(&mut self, bone: &str) -> &mut BoneTrack {
        let idx = match self.tracks.iter().position(|t| t.bone == bone) {
            Some(idx) => idx,
            None => {
                self.tracks.push(BoneTrack {
                    bone: bone.to_string(),
                    keys: Vec::new(),
                });
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[idx]
    }

    /// Validate basic invariants (non-decreasing key times, finite stamps,
    /// positive duration).
    pub fn validate_basic(&self) -> Result<(), String> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err("AnimationData.duration must be a finite number of seconds > 0".into());
        }
        for track in &self.tracks {
            let mut last = f32::NEG_INFINITY;
            for key in &track.keys {
                if !key.time.is_finite() || key.time < 0.0 {
                    return Err(format!(
                        "keyframe time must be finite and >= 0 for bone '{}'",
                        track.bone
                    ));
                }
                if key.time < last {
                    return Err(format!(
                        "keyframe times must be non-decreasing for bone '{}'",
                        track.bone
                    ));
                }
                last = key.time;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_frames_rounds_up() {
        assert_eq!(AnimationData::new("Walk", 2.0).total_frames, 60);
        assert_eq!(AnimationData::new("Blink", 0.05).total_frames, 2);
    }

    #[test]
    fn method_mapping() {
        assert_eq!(Easing::from_method("linear"), Easing::Linear);
        assert_eq!(Easing::from_method("bezier"), Easing::Bezier);
        assert_eq!(Easing::from_method("catmull-rom"), Easing::Bezier);
        assert_eq!(Easing::from_method("step"), Easing::Step);
        assert_eq!(Easing::from_method("ease-in-out"), Easing::EaseIn);
        assert_eq!(Easing::from_method("anything-else"), Easing::Linear);
    }

    #[test]
    fn track_mut_creates_once() {
        let mut anim = AnimationData::new("Walk", 1.0);
        anim.track_mut("Spine");
        anim.track_mut("Spine");
        assert_eq!(anim.tracks.len(), 1);
    }
}
