//! Identifiers and simple allocators for store-level entities.
//!
//! Bones and behavior-graph states are addressed by `String` ids supplied by
//! the decoder or the caller; these newtypes cover the id-keyed stores.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SkeletonId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub u32);

/// Monotonic allocator for the store-level ids.
/// Dense indices improve cache locality; IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_skeleton: u32,
    next_mesh: u32,
    next_anim: u32,
    next_graph: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_skeleton(&mut self) -> SkeletonId {
        let id = SkeletonId(self.next_skeleton);
        self.next_skeleton = self.next_skeleton.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_mesh(&mut self) -> MeshId {
        let id = MeshId(self.next_mesh);
        self.next_mesh = self.next_mesh.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_anim(&mut self) -> AnimId {
        let id = AnimId(self.next_anim);
        self.next_anim = self.next_anim.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_graph(&mut self) -> GraphId {
        let id = GraphId(self.next_graph);
        self.next_graph = self.next_graph.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_skeleton(), SkeletonId(0));
        assert_eq!(alloc.alloc_skeleton(), SkeletonId(1));
        assert_eq!(alloc.alloc_anim(), AnimId(0));
        assert_eq!(alloc.alloc_graph(), GraphId(0));
        assert_eq!(alloc.alloc_mesh(), MeshId(0));
        assert_eq!(alloc.alloc_mesh(), MeshId(1));
    }
}
