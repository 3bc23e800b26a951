//! Transform: the TRS value carried by bones and keyframes.
//! All numeric components are f32 arrays; quaternions are (x, y, z, w).

use serde::{Deserialize, Serialize};

/// Local-space translation/rotation/scale.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    /// Quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Translation-only transform with identity rotation and unit scale.
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Transform {
            translation,
            ..Transform::IDENTITY
        }
    }

    pub fn new(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Self {
        Transform {
            translation,
            rotation,
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}
