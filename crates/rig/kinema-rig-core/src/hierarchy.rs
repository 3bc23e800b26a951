//! Structural hierarchy edits.
//!
//! Edits are applied as an ordered batch on a scratch clone of the skeleton
//! and committed only when every change succeeds, so a failing batch leaves
//! the stored skeleton untouched.

use serde::{Deserialize, Serialize};

use kinema_api_core::CoreError;

use crate::skeleton::{BoneId, Skeleton};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Policy for deleting a bone that still has children.
///
/// The tree must stay fully connected after every structural mutation, so
/// the caller picks what happens to the orphaned subtree explicitly.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Reattach children to the deleted bone's former parent.
    ReparentChildren,
    /// Delete the whole subtree rooted at the bone.
    CascadeSubtree,
    /// Refuse the deletion while children exist.
    RejectIfChildren,
}

/// One structural edit in an `adjust_hierarchy` batch.
/// Bone creation is not a batch change; it goes through
/// `RigStore::create_bone`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum HierarchyChange {
    Rename {
        bone: BoneId,
        new_name: String,
    },
    Reparent {
        bone: BoneId,
        new_parent: BoneId,
    },
    Mirror {
        bone: BoneId,
        axis: Axis,
    },
    Delete {
        bone: BoneId,
        policy: DeletePolicy,
    },
}

/// Swap a standalone "L"/"R" token in a bone name, preserving separators.
/// "Arm_L" -> "Arm_R", "L.Hand" -> "R.Hand"; names without the token pass
/// through unchanged.
fn mirror_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut token = String::new();
    let flush = |token: &mut String, out: &mut String| {
        match token.as_str() {
            "L" => out.push('R'),
            "R" => out.push('L'),
            _ => out.push_str(token),
        }
        token.clear();
    };
    for ch in name.chars() {
        if ch == '_' || ch == '.' {
            flush(&mut token, &mut out);
            out.push(ch);
        } else {
            token.push(ch);
        }
    }
    flush(&mut token, &mut out);
    out
}

fn detach_from_parent(skeleton: &mut Skeleton, bone_id: &str) {
    let parent_id = skeleton.bone(bone_id).and_then(|b| b.parent.clone());
    if let Some(parent_id) = parent_id {
        if let Some(parent) = skeleton.bone_mut(&parent_id) {
            parent.children.retain(|c| c != bone_id);
        }
    }
}

fn apply_change(skeleton: &mut Skeleton, change: &HierarchyChange) -> Result<(), CoreError> {
    match change {
        HierarchyChange::Rename { bone, new_name } => {
            let bone = skeleton
                .bone_mut(bone)
                .ok_or_else(|| CoreError::Reference(format!("rename: unknown bone '{bone}'")))?;
            bone.name = new_name.clone();
            Ok(())
        }
        HierarchyChange::Reparent { bone, new_parent } => {
            if !skeleton.contains(bone) {
                return Err(CoreError::Reference(format!("reparent: unknown bone '{bone}'")));
            }
            if !skeleton.contains(new_parent) {
                return Err(CoreError::Reference(format!(
                    "reparent: unknown parent '{new_parent}'"
                )));
            }
            if bone == &skeleton.root {
                return Err(CoreError::Format(format!(
                    "reparent: cannot give the root bone '{bone}' a parent"
                )));
            }
            if skeleton.subtree(bone).iter().any(|id| id == new_parent) {
                return Err(CoreError::Format(format!(
                    "reparent: '{new_parent}' is inside the subtree of '{bone}'"
                )));
            }
            detach_from_parent(skeleton, bone);
            if let Some(parent) = skeleton.bone_mut(new_parent) {
                parent.children.push(bone.clone());
            }
            if let Some(b) = skeleton.bone_mut(bone) {
                b.parent = Some(new_parent.clone());
            }
            Ok(())
        }
        HierarchyChange::Mirror { bone, axis } => {
            let idx = axis.index();
            let bone = skeleton
                .bone_mut(bone)
                .ok_or_else(|| CoreError::Reference(format!("mirror: unknown bone '{bone}'")))?;
            bone.local.translation[idx] = -bone.local.translation[idx];
            bone.name = mirror_name(&bone.name);
            Ok(())
        }
        HierarchyChange::Delete { bone, policy } => {
            if bone == &skeleton.root {
                return Err(CoreError::Format("delete: cannot delete the root bone".into()));
            }
            let (parent_id, children) = {
                let b = skeleton
                    .bone(bone)
                    .ok_or_else(|| CoreError::Reference(format!("delete: unknown bone '{bone}'")))?;
                (b.parent.clone(), b.children.clone())
            };
            match policy {
                DeletePolicy::RejectIfChildren if !children.is_empty() => {
                    return Err(CoreError::Format(format!(
                        "delete: bone '{bone}' still has {} children",
                        children.len()
                    )))
                }
                DeletePolicy::CascadeSubtree => {
                    let doomed = skeleton.subtree(bone);
                    detach_from_parent(skeleton, bone);
                    skeleton.bones.retain(|b| !doomed.contains(&b.id));
                    return Ok(());
                }
                _ => {}
            }
            // ReparentChildren (or RejectIfChildren with no children):
            // children move to the deleted bone's former parent.
            detach_from_parent(skeleton, bone);
            for child_id in &children {
                if let Some(child) = skeleton.bone_mut(child_id) {
                    child.parent = parent_id.clone();
                }
            }
            if let Some(parent_id) = &parent_id {
                if let Some(parent) = skeleton.bone_mut(parent_id) {
                    parent.children.extend(children.iter().cloned());
                }
            }
            skeleton.bones.retain(|b| b.id != *bone);
            Ok(())
        }
    }
}

/// Apply an ordered batch of structural edits, all-or-nothing.
///
/// Works on a scratch clone; the result is validated before it is returned,
/// so a committed skeleton is always a fully-connected tree.
pub fn adjust_hierarchy(
    skeleton: &Skeleton,
    changes: &[HierarchyChange],
    now_ms: u64,
) -> Result<Skeleton, CoreError> {
    let mut scratch = skeleton.clone();
    for change in changes {
        apply_change(&mut scratch, change)?;
    }
    scratch.validate().map_err(CoreError::Format)?;
    scratch.modified_ms = now_ms;
    Ok(scratch)
}
