//! Rigging engine: auto-rig, weight painting, weight normalization.
//!
//! Auto-rig derives a minimal chain skeleton along the dominant axis of the
//! mesh bounding box and assigns vertex weights by inverse-distance
//! weighting. The whole pass is deterministic for identical inputs.

use std::time::{Duration, Instant};

use hashbrown::HashMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use kinema_api_core::{CancellationToken, CoreError, Transform, ValidationWarning};

use crate::mesh::{Mesh, VertexWeight};
use crate::skeleton::{Bone, Skeleton};

/// Tuning knobs for `auto_rig`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AutoRigConfig {
    /// Number of chain bones placed along the dominant axis.
    pub bone_count: usize,
    /// Weight entries below this are discarded before normalization.
    pub weight_threshold: f32,
    /// Cancellation is checked once per this many vertices.
    pub cancel_batch: usize,
}

impl Default for AutoRigConfig {
    fn default() -> Self {
        AutoRigConfig {
            bone_count: 4,
            weight_threshold: 0.01,
            cancel_batch: 64,
        }
    }
}

/// Result of an auto-rig pass. Warnings are quality findings, not failures.
#[derive(Debug)]
pub struct AutoRigResult {
    pub skeleton: Skeleton,
    pub mesh: Mesh,
    pub warnings: Vec<ValidationWarning>,
    pub duration: Duration,
}

/// Place a chain skeleton proportionally along the dominant bounding-box
/// axis. Returns the skeleton plus each bone's world-space position (used
/// for distance weighting).
fn derive_chain_skeleton(
    mesh: &Mesh,
    bone_count: usize,
    now_ms: u64,
) -> Result<(Skeleton, Vec<[f32; 3]>), CoreError> {
    if bone_count == 0 {
        return Err(CoreError::Format("auto-rig requires at least one bone".into()));
    }
    // Empty bounds are infinite; bone placement would be NaN.
    if mesh.positions.is_empty() {
        return Err(CoreError::Format(format!(
            "auto-rig of '{}': mesh has no vertices",
            mesh.name
        )));
    }
    let axis = mesh.bounds.dominant_axis();
    let extent = mesh.bounds.extent();
    let segment = extent[axis] / bone_count as f32;

    let mut center = [
        (mesh.bounds.min[0] + mesh.bounds.max[0]) * 0.5,
        (mesh.bounds.min[1] + mesh.bounds.max[1]) * 0.5,
        (mesh.bounds.min[2] + mesh.bounds.max[2]) * 0.5,
    ];
    center[axis] = mesh.bounds.min[axis];

    let mut bones = Vec::with_capacity(bone_count);
    let mut world = Vec::with_capacity(bone_count);
    for i in 0..bone_count {
        let mut pos = center;
        pos[axis] += segment * i as f32;
        world.push(pos);

        let mut bone = Bone::new(format!("bone_{i}"), format!("bone_{i}"));
        bone.length = segment;
        if i == 0 {
            bone.local = Transform::from_translation(pos);
        } else {
            let mut local = [0.0f32; 3];
            local[axis] = segment;
            bone.local = Transform::from_translation(local);
            bone.parent = Some(format!("bone_{}", i - 1));
        }
        if i + 1 < bone_count {
            bone.children = vec![format!("bone_{}", i + 1)];
        }
        bones.push(bone);
    }

    let skeleton = Skeleton {
        id: None,
        name: format!("{}_rig", mesh.name),
        bones,
        root: "bone_0".into(),
        created_ms: now_ms,
        modified_ms: now_ms,
    };
    Ok((skeleton, world))
}

#[inline]
fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// Derive a minimal skeleton from the mesh bounds and compute vertex weights
/// by inverse-distance weighting:
/// `w(v, b) = (Σd − d(v, b)) / (Σd · (|B| − 1))`, entries below the
/// configured threshold discarded, then normalized per vertex.
pub fn auto_rig(
    mesh: &Mesh,
    cfg: &AutoRigConfig,
    cancel: &CancellationToken,
    now_ms: u64,
) -> Result<AutoRigResult, CoreError> {
    let start = Instant::now();
    let (skeleton, bone_positions) = derive_chain_skeleton(mesh, cfg.bone_count, now_ms)?;
    let bone_ids: Vec<&str> = skeleton.bones.iter().map(|b| b.id.as_str()).collect();
    let n = bone_positions.len();

    let mut rigged = mesh.clone();
    rigged.weights.clear();

    let batch = cfg.cancel_batch.max(1);
    for (v, pos) in mesh.positions.iter().enumerate() {
        if v % batch == 0 && cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        let distances: Vec<f32> = bone_positions.iter().map(|b| distance(*pos, *b)).collect();
        let sum_d: f32 = distances.iter().sum();

        for (b, d) in distances.iter().enumerate() {
            let weight = if n == 1 {
                1.0
            } else if sum_d <= f32::EPSILON {
                // Degenerate mesh collapsed onto the chain: split evenly.
                1.0 / n as f32
            } else {
                (sum_d - d) / (sum_d * (n - 1) as f32)
            };
            if weight >= cfg.weight_threshold {
                rigged.weights.push(VertexWeight {
                    vertex: v as u32,
                    bone: bone_ids[b].to_string(),
                    weight,
                });
            }
        }
    }

    normalize_weights(&mut rigged);

    let mut warnings = Vec::new();
    let mut weighted = vec![false; mesh.positions.len()];
    let mut referenced = vec![false; n];
    for entry in &rigged.weights {
        weighted[entry.vertex as usize] = true;
        if let Some(idx) = bone_ids.iter().position(|id| *id == entry.bone) {
            referenced[idx] = true;
        }
    }
    for (v, covered) in weighted.iter().enumerate() {
        if !covered {
            warnings.push(ValidationWarning::UnweightedVertex { vertex: v as u32 });
        }
    }
    for (idx, used) in referenced.iter().enumerate() {
        if !used {
            warnings.push(ValidationWarning::UnreferencedBone {
                bone: bone_ids[idx].to_string(),
            });
        }
    }
    if !warnings.is_empty() {
        warn!(
            "auto_rig of '{}' finished with {} quality warnings",
            mesh.name,
            warnings.len()
        );
    }
    debug!(
        "auto_rig of '{}': {} bones, {} weight entries",
        mesh.name,
        n,
        rigged.weights.len()
    );

    Ok(AutoRigResult {
        skeleton,
        mesh: rigged,
        warnings,
        duration: start.elapsed(),
    })
}

/// Replace the weights of `bone` for the listed vertices.
/// Full replace per (vertex, bone) pair: any existing entry is removed and a
/// new one inserted only when the painted weight is positive.
pub fn paint_weights(mesh: &mut Mesh, bone: &str, pairs: &[(u32, f32)]) {
    for (vertex, weight) in pairs {
        mesh.weights
            .retain(|w| !(w.vertex == *vertex && w.bone == bone));
        if *weight > 0.0 {
            mesh.weights.push(VertexWeight {
                vertex: *vertex,
                bone: bone.to_string(),
                weight: *weight,
            });
        }
    }
}

/// Normalize weight entries so each vertex's entries sum to 1.
/// Vertices whose entries sum to zero are left unchanged.
pub fn normalize_weights(mesh: &mut Mesh) {
    let mut sums: HashMap<u32, f32> = HashMap::new();
    for entry in &mesh.weights {
        *sums.entry(entry.vertex).or_insert(0.0) += entry.weight;
    }
    for entry in &mut mesh.weights {
        if let Some(sum) = sums.get(&entry.vertex) {
            if *sum > 0.0 {
                entry.weight /= sum;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_mesh() -> Mesh {
        // Eight vertices along Y, the dominant axis.
        let positions = (0..8).map(|i| [0.0, i as f32, 0.0]).collect();
        Mesh::from_positions("strip", positions)
    }

    #[test]
    fn normalize_divides_by_vertex_sum() {
        let mut mesh = strip_mesh();
        mesh.weights = vec![
            VertexWeight { vertex: 0, bone: "a".into(), weight: 2.0 },
            VertexWeight { vertex: 0, bone: "b".into(), weight: 6.0 },
        ];
        normalize_weights(&mut mesh);
        assert!((mesh.weights[0].weight - 0.25).abs() < 1e-6);
        assert!((mesh.weights[1].weight - 0.75).abs() < 1e-6);
    }

    #[test]
    fn normalize_skips_zero_sum_vertices() {
        let mut mesh = strip_mesh();
        mesh.weights = vec![VertexWeight { vertex: 1, bone: "a".into(), weight: 0.0 }];
        normalize_weights(&mut mesh);
        assert_eq!(mesh.weights[0].weight, 0.0);
    }

    #[test]
    fn paint_replaces_rather_than_accumulates() {
        let mut mesh = strip_mesh();
        paint_weights(&mut mesh, "a", &[(0, 0.4)]);
        paint_weights(&mut mesh, "a", &[(0, 0.9)]);
        let entries: Vec<_> = mesh.weights.iter().filter(|w| w.vertex == 0).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].weight, 0.9);
    }

    #[test]
    fn paint_zero_weight_removes_entry() {
        let mut mesh = strip_mesh();
        paint_weights(&mut mesh, "a", &[(0, 0.4)]);
        paint_weights(&mut mesh, "a", &[(0, 0.0)]);
        assert!(mesh.weights.is_empty());
    }

    #[test]
    fn auto_rig_is_deterministic_and_normalized() {
        let mesh = strip_mesh();
        let cancel = CancellationToken::new();
        let a = auto_rig(&mesh, &AutoRigConfig::default(), &cancel, 0).unwrap();
        let b = auto_rig(&mesh, &AutoRigConfig::default(), &cancel, 0).unwrap();
        assert_eq!(a.mesh.weights, b.mesh.weights);
        assert!(a.skeleton.validate().is_ok());

        let mut sums: HashMap<u32, f32> = HashMap::new();
        for w in &a.mesh.weights {
            *sums.entry(w.vertex).or_insert(0.0) += w.weight;
        }
        for sum in sums.values() {
            assert!((sum - 1.0).abs() <= 1e-6);
        }
    }

    #[test]
    fn auto_rig_rejects_empty_mesh() {
        let mesh = Mesh::from_positions("hollow", Vec::new());
        let cancel = CancellationToken::new();
        let err = auto_rig(&mesh, &AutoRigConfig::default(), &cancel, 0).unwrap_err();
        assert!(matches!(err, CoreError::Format(_)));
    }

    #[test]
    fn auto_rig_respects_cancellation() {
        let mesh = strip_mesh();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = auto_rig(&mesh, &AutoRigConfig::default(), &cancel, 0).unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }
}
