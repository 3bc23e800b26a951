//! Error taxonomy shared by the Kinema stores.
//!
//! Structural failures are fatal and propagate as `CoreError`; rig-quality
//! findings are data, carried in a `Vec<ValidationWarning>` alongside an
//! otherwise-successful result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Ambiguous or malformed decoded hierarchy (e.g. zero or multiple roots).
    #[error("format error: {0}")]
    Format(String),

    /// An operation named an unknown bone/state/animation id.
    #[error("unknown reference: {0}")]
    Reference(String),

    /// Export directory or file failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A cooperative cancellation signal was observed mid-operation.
    #[error("operation cancelled")]
    Cancelled,
}

/// Non-fatal rig quality findings. Returned in a warnings list, never thrown.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A mesh vertex ended up with no bone weight at all.
    UnweightedVertex { vertex: u32 },
    /// A bone is referenced by no vertex weight entry.
    UnreferencedBone { bone: String },
}
