//! Id-keyed ownership of behavior graphs.

use hashbrown::HashMap;
use log::info;

use kinema_api_core::{CoreError, GraphId, IdAllocator};

use crate::graph::BehaviorGraph;

/// Owns behavior graphs keyed by `GraphId`. Clone-on-read, snapshot commit;
/// a `GraphRuntime` works on its own clone and never aliases the store.
#[derive(Default, Debug)]
pub struct GraphStore {
    ids: IdAllocator,
    graphs: HashMap<GraphId, BehaviorGraph>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a built graph, returning the stored snapshot with
    /// its id. The graph must validate; a dangling transition endpoint or
    /// default state is a format error.
    pub fn load_graph(&mut self, mut graph: BehaviorGraph) -> Result<BehaviorGraph, CoreError> {
        graph.validate().map_err(CoreError::Format)?;
        let id = self.ids.alloc_graph();
        graph.id = Some(id);
        info!(
            "loaded behavior graph '{}' ({} states, {} transitions)",
            graph.name,
            graph.states.len(),
            graph.transitions.len()
        );
        self.graphs.insert(id, graph.clone());
        Ok(graph)
    }

    /// Clone-on-read accessor: external mutation cannot alias storage.
    pub fn get_graph(&self, id: GraphId) -> Option<BehaviorGraph> {
        self.graphs.get(&id).cloned()
    }

    /// Commit an externally edited graph snapshot back into the store.
    pub fn commit_graph(&mut self, graph: BehaviorGraph) -> Result<(), CoreError> {
        let id = graph
            .id
            .ok_or_else(|| CoreError::Reference("graph snapshot has no store id".into()))?;
        if !self.graphs.contains_key(&id) {
            return Err(CoreError::Reference(format!("unknown graph {id:?}")));
        }
        graph.validate().map_err(CoreError::Format)?;
        self.graphs.insert(id, graph);
        Ok(())
    }

    pub fn remove_graph(&mut self, id: GraphId) -> bool {
        self.graphs.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{add_state, create_behavior_graph, AnimationState, BehaviorGraph, Transition};
    use kinema_api_core::AnimId;

    fn idle_graph() -> BehaviorGraph {
        let mut graph = create_behavior_graph("Hero");
        add_state(&mut graph, AnimationState { id: "Idle".into(), clip: AnimId(0) });
        graph
    }

    #[test]
    fn load_assigns_id_and_reads_clone() {
        let mut store = GraphStore::new();
        let stored = store.load_graph(idle_graph()).unwrap();
        let id = stored.id.unwrap();
        assert_eq!(id, GraphId(0));

        let mut copy = store.get_graph(id).unwrap();
        copy.name = "Scratch".into();
        assert_eq!(store.get_graph(id).unwrap().name, "Hero_BehaviorGraph");
    }

    #[test]
    fn load_rejects_dangling_transition() {
        let mut graph = idle_graph();
        graph.transitions.push(Transition {
            id: "t0".into(),
            from: "Idle".into(),
            to: "Missing".into(),
            conditions: Vec::new(),
            blend_duration: 0.25,
            can_interrupt_self: false,
        });
        let err = GraphStore::new().load_graph(graph).unwrap_err();
        assert!(matches!(err, CoreError::Format(_)));
    }

    #[test]
    fn commit_requires_a_stored_id() {
        let mut store = GraphStore::new();
        let err = store.commit_graph(idle_graph()).unwrap_err();
        assert!(matches!(err, CoreError::Reference(_)));

        let mut stored = store.load_graph(idle_graph()).unwrap();
        stored.name = "Renamed".into();
        let id = stored.id.unwrap();
        store.commit_graph(stored).unwrap();
        assert_eq!(store.get_graph(id).unwrap().name, "Renamed");
    }

    #[test]
    fn remove_drops_the_graph() {
        let mut store = GraphStore::new();
        let id = store.load_graph(idle_graph()).unwrap().id.unwrap();
        assert!(store.remove_graph(id));
        assert!(store.get_graph(id).is_none());
        assert!(!store.remove_graph(id));
    }
}
