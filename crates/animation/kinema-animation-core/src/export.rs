//! Export serialization.
//!
//! The serializer owns only the naming/placement convention
//! (`<exportsDir>/<animationName>_<timestampMillis>.<ext>`) and the
//! create-dir-then-write sequencing; byte layout belongs to the codec.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use kinema_rig_core::Skeleton;

use kinema_api_core::CoreError;

use crate::codec::RigCodec;
use crate::data::AnimationData;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Hkx,
    Fbx,
}

impl ExportFormat {
    #[inline]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Hkx => "hkx",
            ExportFormat::Fbx => "fbx",
        }
    }
}

/// Writes encoded (animation, skeleton) pairs under an exports directory.
#[derive(Clone, Debug)]
pub struct Exporter {
    exports_dir: PathBuf,
}

impl Exporter {
    pub fn new(exports_dir: impl Into<PathBuf>) -> Self {
        Exporter {
            exports_dir: exports_dir.into(),
        }
    }

    pub fn exports_dir(&self) -> &Path {
        &self.exports_dir
    }

    /// Encode and write one clip. The directory is created if absent; I/O
    /// failures propagate after the mkdir attempt, never silently.
    /// Identical (animation, skeleton, timestamp) inputs produce
    /// byte-identical files.
    pub fn export(
        &self,
        anim: &AnimationData,
        skeleton: &Skeleton,
        format: ExportFormat,
        codec: &dyn RigCodec,
        timestamp_ms: u64,
    ) -> Result<PathBuf, CoreError> {
        let bytes = codec.encode(anim, skeleton)?;
        fs::create_dir_all(&self.exports_dir)?;
        let path = self
            .exports_dir
            .join(format!("{}_{}.{}", anim.name, timestamp_ms, format.extension()));
        fs::write(&path, &bytes)?;
        info!("exported '{}' to {}", anim.name, path.display());
        Ok(path)
    }
}
