//! Sequential snapshot walker

use crate::types::{DirEntry, EntryKind, FileEntry, MirrorError, Observer, TreeSnapshot};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Walk `root_path` and materialize every entry beneath it.
///
/// The root itself is not part of the snapshot. Symlinks are not followed
/// but are classified by their target.
///
/// # Errors
/// * Entries below the root that cannot be read because of permissions are
///   logged through `observer` and skipped
/// * Any failure reading the root, or any other walk error, returns
///   `MirrorError::SubtreeSync`
pub fn scan_tree(root_path: &Path, observer: &Observer) -> Result<TreeSnapshot, MirrorError> {
    let start_time = Instant::now();
    let mut snapshot = TreeSnapshot::new(root_path.to_path_buf());

    // The root must be readable; failures below it are handled per entry.
    if let Err(e) = std::fs::read_dir(root_path) {
        return Err(MirrorError::SubtreeSync {
            path: root_path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    let walker = ignore::WalkBuilder::new(root_path)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                let permission = e
                    .io_error()
                    .is_some_and(|io| io.kind() == ErrorKind::PermissionDenied);
                if permission {
                    observer.warn(&format!(
                        "Skipping unreadable entry under {}: {}",
                        root_path.display(),
                        e
                    ));
                    snapshot.record_skip();
                    continue;
                }
                return Err(MirrorError::SubtreeSync {
                    path: root_path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let relative = match entry.path().strip_prefix(root_path) {
            Ok(p) => p.to_path_buf(),
            Err(_) => {
                snapshot.record_skip();
                continue;
            }
        };

        let kind = match entry.file_type() {
            Some(ft) if ft.is_symlink() => match EntryKind::probe(entry.path()) {
                Ok(Some(kind)) => kind,
                Ok(None) | Err(_) => EntryKind::Other,
            },
            Some(ft) => EntryKind::from_file_type(ft),
            None => EntryKind::Other,
        };

        match kind {
            EntryKind::Directory => {
                snapshot.push_dir(DirEntry::new(entry.path().to_path_buf(), relative));
            }
            EntryKind::File => match read_file_entry(entry.path(), relative) {
                Ok(file_entry) => snapshot.push_file(file_entry),
                Err(e) => {
                    observer.warn(&format!(
                        "Failed to read metadata for {}: {}",
                        entry.path().display(),
                        e
                    ));
                    snapshot.record_skip();
                }
            },
            EntryKind::Other => snapshot.push_other(relative),
        }
    }

    snapshot.set_scan_duration(start_time.elapsed());
    tracing::debug!(
        root = %root_path.display(),
        files = snapshot.files.len(),
        dirs = snapshot.dirs.len(),
        skipped = snapshot.skipped,
        "snapshot complete"
    );

    Ok(snapshot)
}

/// Read size and mtime, following symlinks
fn read_file_entry(path: &Path, relative: PathBuf) -> std::io::Result<FileEntry> {
    let metadata = std::fs::metadata(path)?;
    let mtime = metadata.modified()?;
    Ok(FileEntry::new(
        path.to_path_buf(),
        relative,
        metadata.len(),
        mtime,
    ))
}
