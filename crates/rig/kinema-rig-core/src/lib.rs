//! Kinema Rig Core (engine-agnostic)
//!
//! Owns the bone/skeleton data model and store, the mesh model, the rigging
//! engine (auto-rig, weight painting, normalization), and the structural
//! hierarchy edits. Decoding real skeleton/mesh file formats is a codec
//! concern outside this crate; it consumes already-decoded bone lists.

pub mod hierarchy;
pub mod mesh;
pub mod rigging;
pub mod skeleton;
pub mod store;

pub use hierarchy::{Axis, DeletePolicy, HierarchyChange};
pub use mesh::{Aabb, Mesh, VertexWeight};
pub use rigging::{auto_rig, normalize_weights, paint_weights, AutoRigConfig, AutoRigResult};
pub use skeleton::{build_skeleton, Bone, BoneId, Skeleton};
pub use store::RigStore;
