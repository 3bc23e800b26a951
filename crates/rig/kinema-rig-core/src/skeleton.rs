//! Canonical bone/skeleton data model.
//!
//! A `Skeleton` is a rooted tree of bones. Bones carry `String` ids supplied
//! by the decoder or the caller; identity is the id, never the child index.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use kinema_api_core::{CoreError, SkeletonId, Transform};

pub type BoneId = String;

/// A node in the skeletal hierarchy with a local TRS transform.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    /// None for the root bone.
    #[serde(default)]
    pub parent: Option<BoneId>,
    /// Ordered child ids.
    #[serde(default)]
    pub children: Vec<BoneId>,
    pub local: Transform,
    pub length: f32,
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl Bone {
    /// A detached bone with identity transform and no constraints.
    pub fn new(id: impl Into<BoneId>, name: impl Into<String>) -> Self {
        Bone {
            id: id.into(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local: Transform::IDENTITY,
            length: 1.0,
            constraints: Vec::new(),
        }
    }
}

/// A rooted tree of bones plus identity metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Skeleton {
    /// Internal id assigned when loaded into a store.
    #[serde(skip)]
    pub id: Option<SkeletonId>,
    pub name: String,
    /// Ordered bone set; order is preserved but carries no identity.
    pub bones: Vec<Bone>,
    pub root: BoneId,
    pub created_ms: u64,
    pub modified_ms: u64,
}

impl Skeleton {
    pub fn bone(&self, id: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.id == id)
    }

    pub fn bone_mut(&mut self, id: &str) -> Option<&mut Bone> {
        self.bones.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bone(id).is_some()
    }

    /// Ids of all bones in the subtree rooted at `id`, including `id` itself.
    pub fn subtree(&self, id: &str) -> Vec<BoneId> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(cur) = stack.pop() {
            if let Some(bone) = self.bone(&cur) {
                stack.extend(bone.children.iter().cloned());
            }
            out.push(cur);
        }
        out
    }

    /// Validate structural invariants:
    /// - the root exists and has no parent,
    /// - every non-root parent id resolves to a bone in the skeleton,
    /// - each bone appears in exactly one parent's child list,
    /// - the graph reachable from the root is acyclic and covers all bones.
    pub fn validate(&self) -> Result<(), String> {
        let root = self
            .bone(&self.root)
            .ok_or_else(|| format!("root bone '{}' not present in skeleton", self.root))?;
        if root.parent.is_some() {
            return Err(format!("root bone '{}' has a parent", self.root));
        }

        for bone in &self.bones {
            if let Some(parent_id) = &bone.parent {
                let parent = self.bone(parent_id).ok_or_else(|| {
                    format!("bone '{}' names unknown parent '{}'", bone.id, parent_id)
                })?;
                if !parent.children.iter().any(|c| c == &bone.id) {
                    return Err(format!(
                        "bone '{}' missing from parent '{}' child list",
                        bone.id, parent_id
                    ));
                }
            } else if bone.id != self.root {
                return Err(format!("non-root bone '{}' has no parent", bone.id));
            }
            for child_id in &bone.children {
                let child = self
                    .bone(child_id)
                    .ok_or_else(|| format!("bone '{}' lists unknown child '{}'", bone.id, child_id))?;
                if child.parent.as_deref() != Some(bone.id.as_str()) {
                    return Err(format!(
                        "bone '{}' is listed as child of '{}' but does not point back",
                        child_id, bone.id
                    ));
                }
            }
        }

        // Walk from the root; every bone must be visited exactly once.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack = vec![self.root.as_str()];
        while let Some(cur) = stack.pop() {
            if !seen.insert(cur) {
                return Err(format!("bone '{cur}' reachable via more than one path"));
            }
            if let Some(bone) = self.bone(cur) {
                stack.extend(bone.children.iter().map(|c| c.as_str()));
            }
        }
        if seen.len() != self.bones.len() {
            return Err(format!(
                "{} of {} bones reachable from root '{}'",
                seen.len(),
                self.bones.len(),
                self.root
            ));
        }
        Ok(())
    }
}

/// Assemble a skeleton from an already-decoded bone list.
///
/// The unique parentless bone becomes the root. With zero or multiple
/// parentless bones the load fails with a format error unless `root_hint`
/// names one of the candidates; there is no silent "first found" fallback.
pub fn build_skeleton(
    name: &str,
    bones: Vec<Bone>,
    root_hint: Option<&str>,
    now_ms: u64,
) -> Result<Skeleton, CoreError> {
    let parentless: Vec<&str> = bones
        .iter()
        .filter(|b| b.parent.is_none())
        .map(|b| b.id.as_str())
        .collect();

    let root = match (parentless.as_slice(), root_hint) {
        ([only], _) => only.to_string(),
        (candidates, Some(hint)) if candidates.contains(&hint) => hint.to_string(),
        ([], None) => {
            return Err(CoreError::Format(format!(
                "skeleton '{name}' has no parentless bone and no root hint"
            )))
        }
        (candidates, None) => {
            return Err(CoreError::Format(format!(
                "skeleton '{name}' has {} parentless bones and no root hint",
                candidates.len()
            )))
        }
        (_, Some(hint)) => {
            return Err(CoreError::Format(format!(
                "root hint '{hint}' is not a parentless bone of skeleton '{name}'"
            )))
        }
    };

    // A multi-root decode resolved by hint keeps only the hinted tree.
    let keep: Vec<Bone> = if parentless.len() > 1 {
        let probe = Skeleton {
            id: None,
            name: name.to_string(),
            bones: bones.clone(),
            root: root.clone(),
            created_ms: now_ms,
            modified_ms: now_ms,
        };
        let reachable: HashSet<BoneId> = probe.subtree(&root).into_iter().collect();
        bones.into_iter().filter(|b| reachable.contains(&b.id)).collect()
    } else {
        bones
    };

    let skeleton = Skeleton {
        id: None,
        name: name.to_string(),
        bones: keep,
        root,
        created_ms: now_ms,
        modified_ms: now_ms,
    };
    skeleton.validate().map_err(CoreError::Format)?;
    Ok(skeleton)
}
