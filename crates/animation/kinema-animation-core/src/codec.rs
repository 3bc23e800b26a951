//! Pluggable codec boundary.
//!
//! The core never depends on concrete file formats: a collaborating decoder
//! turns raw skeleton/mesh/animation bytes into `DecodedRig`, and encoders
//! turn an (animation, skeleton) pair into an interchange byte buffer. The
//! JSON codec is the deterministic reference implementation used by tests.

use serde::{Deserialize, Serialize};

use kinema_api_core::CoreError;
use kinema_rig_core::{Bone, Mesh, Skeleton};

use crate::data::{AnimationData, BoneTrack};

/// Decoded payload handed to the core by a format decoder.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DecodedRig {
    pub bones: Vec<Bone>,
    #[serde(default)]
    pub mesh: Option<Mesh>,
    #[serde(default)]
    pub tracks: Vec<BoneTrack>,
}

/// Narrow decode/encode interface behind which NIF/HKX/FBX live.
pub trait RigCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedRig, CoreError>;
    fn encode(&self, anim: &AnimationData, skeleton: &Skeleton) -> Result<Vec<u8>, CoreError>;
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    animation: &'a AnimationData,
    skeleton: &'a Skeleton,
}

/// Deterministic JSON codec: struct field order is fixed and all sequences
/// are ordered, so identical inputs produce byte-identical output.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRigCodec;

impl RigCodec for JsonRigCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedRig, CoreError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Format(format!("rig decode failed: {e}")))
    }

    fn encode(&self, anim: &AnimationData, skeleton: &Skeleton) -> Result<Vec<u8>, CoreError> {
        let doc = ExportDocument {
            animation: anim,
            skeleton,
        };
        serde_json::to_vec(&doc).map_err(|e| CoreError::Format(format!("rig encode failed: {e}")))
    }
}
