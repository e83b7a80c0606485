//! TreeSnapshot - Materialized listing of a directory tree

use super::{DirEntry, EntryKind, FileEntry};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Listing of everything under a root, captured before any mutation.
///
/// Entries keep walk order: a directory always precedes its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot {
    pub root_path: PathBuf,

    pub files: Vec<FileEntry>,
    pub dirs: Vec<DirEntry>,

    /// Relative paths of entries that are neither files nor directories
    pub others: Vec<PathBuf>,

    /// Entries left out because they could not be read
    pub skipped: usize,

    pub total_size: u64,
    pub scan_duration: Duration,
}

impl TreeSnapshot {
    /// Create a new empty snapshot
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            files: Vec::new(),
            dirs: Vec::new(),
            others: Vec::new(),
            skipped: 0,
            total_size: 0,
            scan_duration: Duration::from_secs(0),
        }
    }

    /// Add a file entry and update the aggregate size
    pub fn push_file(&mut self, entry: FileEntry) {
        self.total_size += entry.size;
        self.files.push(entry);
    }

    pub fn push_dir(&mut self, entry: DirEntry) {
        self.dirs.push(entry);
    }

    pub fn push_other(&mut self, relative: PathBuf) {
        self.others.push(relative);
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.scan_duration = duration;
    }

    /// Number of entries of every kind
    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry as (relative path, kind)
    pub fn entries(&self) -> impl Iterator<Item = (&Path, EntryKind)> {
        self.dirs
            .iter()
            .map(|d| (d.relative.as_path(), EntryKind::Directory))
            .chain(
                self.files
                    .iter()
                    .map(|f| (f.relative.as_path(), EntryKind::File)),
            )
            .chain(self.others.iter().map(|o| (o.as_path(), EntryKind::Other)))
    }
}
