//! Mesh model consumed by the rigging engine.
//!
//! Vertex streams are index-aligned: positions, normals, and tangents share
//! the same vertex index space as the weight entries.

use serde::{Deserialize, Serialize};

use kinema_api_core::MeshId;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: [f32::INFINITY; 3],
        max: [f32::NEG_INFINITY; 3],
    };

    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let mut aabb = Aabb::EMPTY;
        for p in points {
            for i in 0..3 {
                aabb.min[i] = aabb.min[i].min(p[i]);
                aabb.max[i] = aabb.max[i].max(p[i]);
            }
        }
        aabb
    }

    #[inline]
    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Index of the longest axis (0 = X, 1 = Y, 2 = Z).
    pub fn dominant_axis(&self) -> usize {
        let e = self.extent();
        let mut axis = 0;
        for i in 1..3 {
            if e[i] > e[axis] {
                axis = i;
            }
        }
        axis
    }
}

/// One vertex-to-bone weight entry, weight in [0, 1] after normalization.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VertexWeight {
    pub vertex: u32,
    pub bone: String,
    pub weight: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Mesh {
    /// Internal id assigned when loaded into a store.
    #[serde(skip)]
    pub id: Option<MeshId>,
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub tangents: Vec<[f32; 3]>,
    /// Triangle index list.
    #[serde(default)]
    pub indices: Vec<u32>,
    pub bounds: Aabb,
    #[serde(default)]
    pub weights: Vec<VertexWeight>,
}

impl Mesh {
    /// Mesh from positions only; bounds are derived.
    pub fn from_positions(name: impl Into<String>, positions: Vec<[f32; 3]>) -> Self {
        let bounds = Aabb::from_points(&positions);
        Mesh {
            id: None,
            name: name.into(),
            positions,
            normals: Vec::new(),
            tangents: Vec::new(),
            indices: Vec::new(),
            bounds,
            weights: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
