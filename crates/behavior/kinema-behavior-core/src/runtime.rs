//! Per-tick graph evaluation.
//!
//! Tick contract: the host writes parameters first, then calls `update`.
//! Each tick the current state's outgoing transitions are evaluated in
//! declaration order and the first fully-satisfied one fires. Blending
//! produces a linear-weight ramp between the source and destination clip
//! poses over the transition's duration. The graph runs indefinitely; there
//! are no terminal states.

use hashbrown::HashMap;
use log::debug;

use kinema_animation_core::{sample_pose, ClipStore, Pose};
use kinema_api_core::{blend_transforms, CoreError};

use crate::graph::{BehaviorGraph, ParamValue, StateId, Transition};

#[derive(Debug)]
struct ActiveBlend {
    from: StateId,
    /// Source clip keeps playing while it is blended out.
    from_time: f32,
    to: StateId,
    elapsed: f32,
    duration: f32,
}

/// Mutable evaluation state over an immutable graph snapshot.
#[derive(Debug)]
pub struct GraphRuntime {
    graph: BehaviorGraph,
    params: HashMap<String, ParamValue>,
    current: StateId,
    clip_time: f32,
    blend: Option<ActiveBlend>,
}

impl GraphRuntime {
    /// Start at the graph's default state with the graph's parameter table.
    pub fn new(graph: BehaviorGraph) -> Result<Self, CoreError> {
        graph.validate().map_err(CoreError::Format)?;
        let current = graph
            .default_state
            .clone()
            .ok_or_else(|| CoreError::Format(format!("graph '{}' has no default state", graph.name)))?;
        let params = graph.parameters.clone();
        Ok(GraphRuntime {
            graph,
            params,
            current,
            clip_time: 0.0,
            blend: None,
        })
    }

    /// Host parameter feed; called once per tick before `update`.
    pub fn set_param(&mut self, name: &str, value: ParamValue) {
        self.params.insert(name.to_string(), value);
    }

    pub fn param(&self, name: &str) -> Option<ParamValue> {
        self.params.get(name).copied()
    }

    pub fn current_state(&self) -> &str {
        &self.current
    }

    pub fn is_blending(&self) -> bool {
        self.blend.is_some()
    }

    /// Reset triggers named by a fired transition's conditions.
    fn consume_triggers(&mut self, transition: &Transition) {
        for cond in &transition.conditions {
            if let Some(ParamValue::Trigger(_)) = self.params.get(&cond.parameter) {
                self.params
                    .insert(cond.parameter.clone(), ParamValue::Trigger(false));
            }
        }
    }

    fn evaluate_transitions(&mut self) {
        let fired = self
            .graph
            .transitions_from(&self.current)
            .find(|t| {
                if let Some(blend) = &self.blend {
                    // Re-entering the in-flight target needs an explicit
                    // opt-in while the blend is still running.
                    if t.to == blend.to && !t.can_interrupt_self {
                        return false;
                    }
                }
                t.conditions.iter().all(|c| c.is_satisfied(&self.params))
            })
            .cloned();

        if let Some(t) = fired {
            debug!("transition '{}' fired: {} -> {}", t.id, t.from, t.to);
            self.consume_triggers(&t);
            self.blend = Some(ActiveBlend {
                from: self.current.clone(),
                from_time: self.clip_time,
                to: t.to.clone(),
                elapsed: 0.0,
                duration: t.blend_duration,
            });
            self.current = t.to;
            self.clip_time = 0.0;
        }
    }

    fn state_pose(&self, state: &str, time: f32, clips: &ClipStore) -> Pose {
        self.graph
            .state(state)
            .and_then(|s| clips.animation(s.clip))
            .map(|anim| sample_pose(anim, time))
            .unwrap_or_default()
    }

    /// Advance by `dt` seconds and produce this tick's output pose.
    pub fn update(&mut self, dt: f32, clips: &ClipStore) -> Pose {
        self.clip_time += dt;
        if let Some(blend) = &mut self.blend {
            blend.elapsed += dt;
            blend.from_time += dt;
            if blend.elapsed >= blend.duration {
                self.blend = None;
            }
        }

        self.evaluate_transitions();

        match &self.blend {
            Some(blend) => {
                let weight = if blend.duration > 0.0 {
                    (blend.elapsed / blend.duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let from = self.state_pose(&blend.from, blend.from_time, clips);
                let to = self.state_pose(&self.current, self.clip_time, clips);
                blend_poses(&from, &to, weight)
            }
            None => self.state_pose(&self.current, self.clip_time, clips),
        }
    }
}

/// Weighted union of two poses: bones present in both are blended, bones
/// present in only one keep their sampled transform.
fn blend_poses(from: &Pose, to: &Pose, weight: f32) -> Pose {
    let mut out = Pose::with_capacity(from.len().max(to.len()));
    for (bone, a) in from {
        match to.get(bone) {
            Some(b) => {
                out.insert(bone.clone(), blend_transforms(a, b, weight));
            }
            None => {
                out.insert(bone.clone(), *a);
            }
        }
    }
    for (bone, b) in to {
        if !out.contains_key(bone) {
            out.insert(bone.clone(), *b);
        }
    }
    out
}
