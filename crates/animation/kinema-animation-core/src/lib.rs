//! Kinema Animation Core (engine-agnostic)
//!
//! Owns the keyframe track data model and store, pure track/pose sampling,
//! the simplified physics integrator, and export serialization behind a
//! pluggable codec boundary.

pub mod codec;
pub mod data;
pub mod export;
pub mod physics;
pub mod sampling;
pub mod store;

pub use codec::{DecodedRig, JsonRigCodec, RigCodec};
pub use data::{AnimationData, BoneTrack, Easing, Keyframe, FRAME_RATE};
pub use export::{ExportFormat, Exporter};
pub use physics::{simulate_physics, PhysicsModel, SettleModel};
pub use sampling::{sample_pose, sample_track, Pose};
pub use store::{ClipStore, KeyConflict};
