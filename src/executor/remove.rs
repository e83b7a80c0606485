//! Removal of stale destination entries

use crate::types::MirrorError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Remove any filesystem entry at `path`.
///
/// Directories are removed recursively; files and symlinks are removed as
/// files, so a link is never followed into its target. A path that is
/// already gone counts as removed.
pub fn remove_path_any(path: &Path) -> Result<(), MirrorError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(MirrorError::from_item_io(path, "inspect", e)),
    };

    let result = if metadata.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MirrorError::from_item_io(path, "remove", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_file() {
        let temp = TempDir::new().expect("create temp dir");
        let file = temp.path().join("a.pbl");
        fs::write(&file, b"a").expect("write file");

        remove_path_any(&file).expect("remove file");
        assert!(!file.exists());
    }

    #[test]
    fn test_remove_directory_recursively() {
        let temp = TempDir::new().expect("create temp dir");
        let dir = temp.path().join("lib");
        fs::create_dir_all(dir.join("nested")).expect("create dirs");
        fs::write(dir.join("nested/b.pbl"), b"b").expect("write file");

        remove_path_any(&dir).expect("remove dir");
        assert!(!dir.exists());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let temp = TempDir::new().expect("create temp dir");
        remove_path_any(&temp.path().join("never")).expect("missing path is fine");
    }

    #[test]
    #[cfg(unix)]
    fn test_remove_symlink_keeps_target() {
        let temp = TempDir::new().expect("create temp dir");
        let target = temp.path().join("target");
        fs::create_dir(&target).expect("create target");
        fs::write(target.join("keep.pbl"), b"k").expect("write file");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("create link");

        remove_path_any(&link).expect("remove link");
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.join("keep.pbl").exists());
    }
}
