//! SyncGroup and TargetInfo - Units of work and catalog output

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named top-level partition synchronized as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncGroup {
    /// Version tag, e.g. "10.5"
    pub tag: String,

    /// Folder on the origin side
    pub source: PathBuf,

    /// Folder in the local mirror
    pub destination: PathBuf,
}

impl SyncGroup {
    /// Resolve a tag against the origin and mirror roots
    pub fn resolve(tag: &str, origin_root: &Path, mirror_root: &Path) -> Self {
        Self {
            tag: tag.to_string(),
            source: origin_root.join(tag),
            destination: mirror_root.join(tag),
        }
    }
}

/// One catalog entry: a leaf artifact found in the mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Tag of the group the artifact belongs to
    pub group: String,

    /// File stem of the artifact
    pub name: String,

    /// Absolute path inside the mirror
    pub path: PathBuf,
}
