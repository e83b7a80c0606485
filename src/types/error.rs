//! Error types for pbmirror

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for mirror operations
///
/// The variants follow the propagation levels of a run: `FileSync` stays
/// inside one walk, `SubtreeSync` ends one group, `FatalResource` ends the
/// orchestrator step.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single file or directory could not be synchronized
    #[error("Could not {op} {path}: {source}")]
    FileSync {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: IoError,
    },

    /// The walk of a group's source or destination tree failed
    #[error("Synchronization of {path} aborted: {reason}")]
    SubtreeSync { path: PathBuf, reason: String },

    /// Destination volume unusable (full, unavailable, root not creatable)
    #[error("Fatal resource failure at {path}: {source}")]
    FatalResource {
        path: PathBuf,
        #[source]
        source: IoError,
    },
}

impl MirrorError {
    /// Classify an IO error raised while operating on a single path.
    ///
    /// Disk-full and quota errors cannot be skipped past, so they become
    /// `FatalResource` instead of `FileSync`.
    pub fn from_item_io(path: &Path, op: &'static str, error: IoError) -> Self {
        if is_storage_full(&error) {
            MirrorError::FatalResource {
                path: path.to_path_buf(),
                source: error,
            }
        } else {
            MirrorError::FileSync {
                path: path.to_path_buf(),
                op,
                source: error,
            }
        }
    }

    /// Check if the run can continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MirrorError::FileSync { .. } | MirrorError::SubtreeSync { .. }
        )
    }

    /// Check if this error aborts the orchestrator step
    pub fn is_fatal(&self) -> bool {
        matches!(self, MirrorError::FatalResource { .. })
    }

    /// Check if this error ends the synchronization of one group only
    pub fn is_group_level(&self) -> bool {
        matches!(self, MirrorError::SubtreeSync { .. })
    }

    /// Check if this error is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, MirrorError::Config(_))
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            MirrorError::FileSync { path, .. }
            | MirrorError::SubtreeSync { path, .. }
            | MirrorError::FatalResource { path, .. } => Some(path),
            MirrorError::Io(_) | MirrorError::Config(_) => None,
        }
    }
}

#[cfg(unix)]
const ENOSPC: i32 = 28;

#[cfg(target_os = "linux")]
const EDQUOT_LINUX: i32 = 122;

fn is_storage_full(error: &IoError) -> bool {
    // Raw codes are only meaningful per platform: 28 is ERROR_OUT_OF_PAPER on Windows.
    #[cfg(unix)]
    if error.raw_os_error() == Some(ENOSPC) {
        return true;
    }
    #[cfg(target_os = "linux")]
    if error.raw_os_error() == Some(EDQUOT_LINUX) {
        return true;
    }
    error.kind() == ErrorKind::StorageFull
}
