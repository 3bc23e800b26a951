//! Behavior graph data model and building operations.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use kinema_api_core::{AnimId, CoreError, GraphId};

pub type StateId = String;

/// Blend duration used by `add_transition`.
pub const DEFAULT_BLEND_SECONDS: f32 = 0.25;

/// Runtime parameter value. Triggers reset to false once a firing transition
/// consumes them; floats and bools persist until externally mutated.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ParamValue {
    Float(f32),
    Bool(bool),
    Trigger(bool),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CompareOp {
    Equals,
    NotEquals,
    Greater,
    Less,
}

/// One predicate over the parameter table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    pub parameter: String,
    pub op: CompareOp,
    pub value: ParamValue,
}

impl Condition {
    /// Evaluate against the parameter table. A missing parameter never
    /// satisfies; a set trigger satisfies regardless of the compare value.
    pub fn is_satisfied(&self, params: &HashMap<String, ParamValue>) -> bool {
        let Some(current) = params.get(&self.parameter) else {
            return false;
        };
        match (current, &self.value) {
            (ParamValue::Trigger(fired), _) => *fired,
            (ParamValue::Float(a), ParamValue::Float(b)) => match self.op {
                CompareOp::Equals => (a - b).abs() <= f32::EPSILON,
                CompareOp::NotEquals => (a - b).abs() > f32::EPSILON,
                CompareOp::Greater => a > b,
                CompareOp::Less => a < b,
            },
            (ParamValue::Bool(a), ParamValue::Bool(b)) => match self.op {
                CompareOp::Equals => a == b,
                CompareOp::NotEquals => a != b,
                _ => false,
            },
            _ => false,
        }
    }
}

/// A state bound to an animation clip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationState {
    pub id: StateId,
    pub clip: AnimId,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transition {
    pub id: String,
    pub from: StateId,
    pub to: StateId,
    /// Evaluated in order; all must be satisfied for the transition to fire.
    pub conditions: Vec<Condition>,
    pub blend_duration: f32,
    pub can_interrupt_self: bool,
}

/// A finite state machine selecting and blending animation clips.
/// Populated via `add_state`/`add_transition`; never auto-mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BehaviorGraph {
    /// Internal id assigned when loaded into a store.
    #[serde(skip)]
    pub id: Option<GraphId>,
    pub name: String,
    pub states: Vec<AnimationState>,
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub parameters: HashMap<String, ParamValue>,
    /// Set when the first state is added.
    #[serde(default)]
    pub default_state: Option<StateId>,
}

impl BehaviorGraph {
    pub fn state(&self, id: &str) -> Option<&AnimationState> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Outgoing transitions of `state`, in declaration order.
    pub fn transitions_from<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.from == state)
    }

    /// Check that the default state and every transition endpoint name a
    /// state present in the graph.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(default) = &self.default_state {
            if self.state(default).is_none() {
                return Err(format!("default state '{default}' not present in graph"));
            }
        }
        for t in &self.transitions {
            if self.state(&t.from).is_none() {
                return Err(format!("transition '{}' names unknown fromState '{}'", t.id, t.from));
            }
            if self.state(&t.to).is_none() {
                return Err(format!("transition '{}' names unknown toState '{}'", t.id, t.to));
            }
        }
        Ok(())
    }
}

/// Empty graph named `<skeleton>_BehaviorGraph`.
pub fn create_behavior_graph(skeleton_name: &str) -> BehaviorGraph {
    BehaviorGraph {
        id: None,
        name: format!("{skeleton_name}_BehaviorGraph"),
        states: Vec::new(),
        transitions: Vec::new(),
        parameters: HashMap::new(),
        default_state: None,
    }
}

/// Append a state; the first state added becomes the default.
pub fn add_state(graph: &mut BehaviorGraph, state: AnimationState) {
    if graph.default_state.is_none() {
        graph.default_state = Some(state.id.clone());
    }
    graph.states.push(state);
}

/// Append a transition with a single condition, the default 0.25 s blend,
/// and `can_interrupt_self = false`. Both endpoints must already exist.
pub fn add_transition(
    graph: &mut BehaviorGraph,
    from: &str,
    to: &str,
    condition: Condition,
) -> Result<(), CoreError> {
    if graph.state(from).is_none() {
        return Err(CoreError::Reference(format!(
            "add_transition: unknown fromState '{from}'"
        )));
    }
    if graph.state(to).is_none() {
        return Err(CoreError::Reference(format!(
            "add_transition: unknown toState '{to}'"
        )));
    }
    graph.transitions.push(Transition {
        id: format!("t{}", graph.transitions.len()),
        from: from.to_string(),
        to: to.to_string(),
        conditions: vec![condition],
        blend_duration: DEFAULT_BLEND_SECONDS,
        can_interrupt_self: false,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(parameter: &str, value: f32) -> Condition {
        Condition {
            parameter: parameter.into(),
            op: CompareOp::Greater,
            value: ParamValue::Float(value),
        }
    }

    #[test]
    fn first_state_becomes_default() {
        let mut graph = create_behavior_graph("Hero");
        assert_eq!(graph.name, "Hero_BehaviorGraph");
        add_state(&mut graph, AnimationState { id: "Idle".into(), clip: AnimId(0) });
        add_state(&mut graph, AnimationState { id: "Walk".into(), clip: AnimId(1) });
        assert_eq!(graph.default_state.as_deref(), Some("Idle"));
    }

    #[test]
    fn transition_requires_known_endpoints() {
        let mut graph = create_behavior_graph("Hero");
        add_state(&mut graph, AnimationState { id: "Idle".into(), clip: AnimId(0) });
        let err = add_transition(&mut graph, "Idle", "Run", cond("speed", 0.5)).unwrap_err();
        assert!(matches!(err, CoreError::Reference(_)));
        let err = add_transition(&mut graph, "Run", "Idle", cond("speed", 0.5)).unwrap_err();
        assert!(matches!(err, CoreError::Reference(_)));
    }

    #[test]
    fn transition_defaults() {
        let mut graph = create_behavior_graph("Hero");
        add_state(&mut graph, AnimationState { id: "Idle".into(), clip: AnimId(0) });
        add_state(&mut graph, AnimationState { id: "Walk".into(), clip: AnimId(1) });
        add_transition(&mut graph, "Idle", "Walk", cond("speed", 0.5)).unwrap();
        let t = &graph.transitions[0];
        assert_eq!(t.blend_duration, DEFAULT_BLEND_SECONDS);
        assert!(!t.can_interrupt_self);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn condition_semantics() {
        let mut params = HashMap::new();
        params.insert("speed".to_string(), ParamValue::Float(1.0));
        params.insert("grounded".to_string(), ParamValue::Bool(true));
        params.insert("jump".to_string(), ParamValue::Trigger(false));

        assert!(cond("speed", 0.5).is_satisfied(&params));
        assert!(!cond("speed", 2.0).is_satisfied(&params));
        assert!(!cond("missing", 0.0).is_satisfied(&params));

        let grounded = Condition {
            parameter: "grounded".into(),
            op: CompareOp::Equals,
            value: ParamValue::Bool(true),
        };
        assert!(grounded.is_satisfied(&params));

        let jump = Condition {
            parameter: "jump".into(),
            op: CompareOp::Equals,
            value: ParamValue::Bool(true),
        };
        assert!(!jump.is_satisfied(&params));
        params.insert("jump".to_string(), ParamValue::Trigger(true));
        assert!(jump.is_satisfied(&params));
    }
}
