//! kinema-api-core: shared value layer for the Kinema animation crates.
//!
//! Defines the `Transform` value type, blend math (lerp/slerp), the error
//! taxonomy shared by every store, id newtypes with a monotonic allocator,
//! and the cooperative cancellation token used by long CPU-bound passes.

pub mod blend;
pub mod cancel;
pub mod error;
pub mod ids;
pub mod transform;

pub use blend::{blend_transforms, lerp_f32, lerp_vec3, normalize_quat, slerp};
pub use cancel::CancellationToken;
pub use error::{CoreError, ValidationWarning};
pub use ids::{AnimId, GraphId, IdAllocator, MeshId, SkeletonId};
pub use transform::Transform;
