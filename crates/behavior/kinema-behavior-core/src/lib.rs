//! Kinema Behavior Core (engine-agnostic)
//!
//! A behavior graph is a finite state machine whose states are bound to
//! animation clips. The graph data model is built explicitly via
//! `add_state`/`add_transition` and never auto-mutated; `GraphStore` owns
//! finished graphs by id, and `GraphRuntime` evaluates a clone each tick,
//! blending clip poses across transitions.

pub mod graph;
pub mod runtime;
pub mod store;

pub use graph::{
    add_state, add_transition, create_behavior_graph, AnimationState, BehaviorGraph, CompareOp,
    Condition, ParamValue, StateId, Transition, DEFAULT_BLEND_SECONDS,
};
pub use runtime::GraphRuntime;
pub use store::GraphStore;
