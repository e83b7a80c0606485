//! FileEntry / DirEntry - Entries seen while walking a tree

use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Type of a filesystem entry, with symlinks resolved to their target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,

    /// Directory container
    Directory,

    /// Anything else (pipes, sockets, devices, dangling links)
    Other,
}

impl EntryKind {
    /// Classify a file type that is known not to be a symlink
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    /// Probe `path`, following symlinks.
    ///
    /// Returns `Ok(None)` only when the path does not exist, including when
    /// one of its ancestors is a regular file. A dangling link exists but has
    /// no target, so it is reported as `Other`.
    pub fn probe(path: &Path) -> io::Result<Option<Self>> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(Self::from_file_type(meta.file_type()))),
            Err(e) if is_absent(&e) => match fs::symlink_metadata(path) {
                Ok(_) => Ok(Some(EntryKind::Other)),
                Err(e) if is_absent(&e) => Ok(None),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}

fn is_absent(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// A regular file seen during a walk
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Absolute (root-joined) path
    pub path: PathBuf,

    /// Path relative to the walk root
    pub relative: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,
}

impl FileEntry {
    pub fn new(path: PathBuf, relative: PathBuf, size: u64, mtime: SystemTime) -> Self {
        Self {
            path,
            relative,
            size,
            mtime,
        }
    }
}

/// A directory seen during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub relative: PathBuf,
}

impl DirEntry {
    pub fn new(path: PathBuf, relative: PathBuf) -> Self {
        Self { path, relative }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_probe_under_a_file_is_absent() {
        let temp = TempDir::new().expect("create temp dir");
        let file = temp.path().join("p");
        fs::write(&file, b"x").expect("write file");

        assert_eq!(EntryKind::probe(&file.join("nested")).expect("probe"), None);
        assert_eq!(EntryKind::probe(&file).expect("probe"), Some(EntryKind::File));
    }

    #[test]
    fn test_new_file_entry() {
        let mtime = UNIX_EPOCH + Duration::from_secs(1000);
        let entry = FileEntry::new(
            PathBuf::from("/mirror/6.5/app.pbl"),
            PathBuf::from("app.pbl"),
            1024,
            mtime,
        );

        assert_eq!(entry.relative, PathBuf::from("app.pbl"));
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.mtime, mtime);
    }

    #[test]
    fn test_probe_missing_path() {
        let temp = TempDir::new().expect("create temp dir");
        let kind = EntryKind::probe(&temp.path().join("nope")).expect("probe should not fail");
        assert_eq!(kind, None);
    }

    #[test]
    fn test_probe_file_and_directory() {
        let temp = TempDir::new().expect("create temp dir");
        let file = temp.path().join("a.txt");
        fs::write(&file, b"a").expect("write file");

        assert_eq!(
            EntryKind::probe(&file).expect("probe file"),
            Some(EntryKind::File)
        );
        assert_eq!(
            EntryKind::probe(temp.path()).expect("probe dir"),
            Some(EntryKind::Directory)
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_probe_follows_and_flags_dangling_links() {
        let temp = TempDir::new().expect("create temp dir");
        let dir = temp.path().join("real_dir");
        fs::create_dir(&dir).expect("create dir");

        let link = temp.path().join("dir_link");
        std::os::unix::fs::symlink(&dir, &link).expect("create link");
        assert_eq!(
            EntryKind::probe(&link).expect("probe link"),
            Some(EntryKind::Directory)
        );

        let dangling = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("missing"), &dangling)
            .expect("create dangling link");
        assert_eq!(
            EntryKind::probe(&dangling).expect("probe dangling"),
            Some(EntryKind::Other)
        );
    }
}
