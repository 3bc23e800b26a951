//! Id-keyed ownership of skeletons and meshes.
//!
//! `RigStore` is an explicit store object passed into every operation; there
//! is no module-level singleton, so independent stores can coexist (tests,
//! multi-document editing). Reads hand out clones and mutations commit
//! snapshots, so callers can never alias internal state.

use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::HashMap;
use log::info;

use kinema_api_core::{CoreError, IdAllocator, MeshId, SkeletonId, Transform};

use crate::hierarchy::{self, HierarchyChange};
use crate::mesh::Mesh;
use crate::skeleton::{build_skeleton, Bone, Skeleton};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Default, Debug)]
pub struct RigStore {
    ids: IdAllocator,
    skeletons: HashMap<SkeletonId, Skeleton>,
    meshes: HashMap<MeshId, Mesh>,
}

impl RigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a skeleton from an already-decoded bone list and take
    /// ownership of it. Root selection requires a unique parentless bone or
    /// an explicit `root_hint`; ambiguity is a format error.
    pub fn load_skeleton(
        &mut self,
        name: &str,
        bones: Vec<Bone>,
        root_hint: Option<&str>,
    ) -> Result<Skeleton, CoreError> {
        let mut skeleton = build_skeleton(name, bones, root_hint, now_ms())?;
        let id = self.ids.alloc_skeleton();
        skeleton.id = Some(id);
        info!("loaded skeleton '{}' ({} bones)", skeleton.name, skeleton.bones.len());
        self.skeletons.insert(id, skeleton.clone());
        Ok(skeleton)
    }

    /// Take ownership of a mesh, returning the stored snapshot with its id.
    pub fn load_mesh(&mut self, mut mesh: Mesh) -> Mesh {
        let id = self.ids.alloc_mesh();
        mesh.id = Some(id);
        info!("loaded mesh '{}' ({} vertices)", mesh.name, mesh.vertex_count());
        self.meshes.insert(id, mesh.clone());
        mesh
    }

    /// Clone-on-read accessors: external mutation cannot alias storage.
    pub fn get_skeleton(&self, id: SkeletonId) -> Option<Skeleton> {
        self.skeletons.get(&id).cloned()
    }

    pub fn get_mesh(&self, id: MeshId) -> Option<Mesh> {
        self.meshes.get(&id).cloned()
    }

    /// Append a child bone under `parent`, positioned at offset
    /// `(0, parent.length, 0)` in parent-local space. The child's index in
    /// the parent's list is its current child count; identity is the id.
    pub fn create_bone(
        &mut self,
        skeleton: SkeletonId,
        parent: &str,
        name: &str,
    ) -> Result<Bone, CoreError> {
        let skel = self
            .skeletons
            .get_mut(&skeleton)
            .ok_or_else(|| CoreError::Reference(format!("unknown skeleton {skeleton:?}")))?;

        let parent_length = skel
            .bone(parent)
            .ok_or_else(|| CoreError::Reference(format!("create_bone: unknown parent '{parent}'")))?
            .length;

        // Bone ids must be unique within the skeleton; derive from the name.
        let mut id = name.to_string();
        let mut n = 1;
        while skel.contains(&id) {
            id = format!("{name}_{n}");
            n += 1;
        }

        let mut bone = Bone::new(id.clone(), name);
        bone.parent = Some(parent.to_string());
        bone.local = Transform::from_translation([0.0, parent_length, 0.0]);

        if let Some(parent_bone) = skel.bone_mut(parent) {
            parent_bone.children.push(id);
        }
        skel.bones.push(bone.clone());
        skel.modified_ms = now_ms();
        Ok(bone)
    }

    /// Apply an ordered batch of structural edits, all-or-nothing.
    /// The batch runs on a scratch clone and only a fully valid result is
    /// committed; any failure leaves the stored skeleton untouched.
    pub fn adjust_hierarchy(
        &mut self,
        skeleton: SkeletonId,
        changes: &[HierarchyChange],
    ) -> Result<Skeleton, CoreError> {
        let current = self
            .skeletons
            .get(&skeleton)
            .ok_or_else(|| CoreError::Reference(format!("unknown skeleton {skeleton:?}")))?;
        let updated = hierarchy::adjust_hierarchy(current, changes, now_ms())?;
        info!(
            "adjusted hierarchy of '{}' ({} changes)",
            updated.name,
            changes.len()
        );
        self.skeletons.insert(skeleton, updated.clone());
        Ok(updated)
    }

    /// Commit an externally edited mesh snapshot (e.g. after weight
    /// painting) back into the store.
    pub fn commit_mesh(&mut self, mesh: Mesh) -> Result<(), CoreError> {
        let id = mesh
            .id
            .ok_or_else(|| CoreError::Reference("mesh snapshot has no store id".into()))?;
        if !self.meshes.contains_key(&id) {
            return Err(CoreError::Reference(format!("unknown mesh {id:?}")));
        }
        self.meshes.insert(id, mesh);
        Ok(())
    }

    pub fn remove_skeleton(&mut self, id: SkeletonId) -> bool {
        self.skeletons.remove(&id).is_some()
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> bool {
        self.meshes.remove(&id).is_some()
    }
}
