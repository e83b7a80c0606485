//! Core type definitions for pbmirror

mod action;
mod entry;
mod error;
mod group;
mod observer;
mod outcome;
mod tree;

pub use action::{FileAction, RemovalReason};
pub use entry::{DirEntry, EntryKind, FileEntry};
pub use error::MirrorError;
pub use group::{SyncGroup, TargetInfo};
pub use observer::{
    LogCallback, Observer, ProgressCallback, ProgressThrottle, ProgressUpdate, Severity,
    PROGRESS_INTERVAL,
};
pub use outcome::{SyncOutcome, SyncStats};
pub use tree::TreeSnapshot;
