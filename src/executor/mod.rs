//! Tree synchronization: reconciliation pass followed by materialization pass

pub mod copy;
pub mod pool;
pub mod remove;

use crate::diff::{compare_mtime, plan_removals};
use crate::scanner::scan_tree;
use crate::types::{
    EntryKind, FileAction, FileEntry, MirrorError, Observer, ProgressThrottle, ProgressUpdate,
    SyncOutcome, SyncStats,
};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;
use std::time::Instant;

pub use copy::copy_file_atomic;
pub use pool::sync_groups_parallel;
pub use remove::remove_path_any;

/// Make `destination` an up-to-date mirror of `source`.
///
/// Runs two strictly ordered passes:
///
/// 1. **Reconciliation**: snapshot the destination, then remove every entry
///    whose source analog is missing or has another type, deepest path first.
/// 2. **Materialization**: snapshot the source, create every directory, and
///    copy every file whose destination is missing or strictly older.
///
/// Item-level failures are logged through `observer`, counted in
/// `SyncStats::failures`, and skipped.
///
/// # Returns
/// * `Ok(SyncOutcome::SourceMissing)` - `source` does not exist; nothing was touched
/// * `Ok(SyncOutcome::Synced(stats))` - both passes completed
///
/// # Errors
/// * `MirrorError::SubtreeSync` - a walk of `source` or `destination` failed
/// * `MirrorError::FatalResource` - the destination root could not be
///   prepared, or the volume is full
pub fn sync_tree(
    source: &Path,
    destination: &Path,
    observer: &Observer,
) -> Result<SyncOutcome, MirrorError> {
    let started = Instant::now();

    match EntryKind::probe(source) {
        Ok(None) => return Ok(SyncOutcome::SourceMissing),
        Ok(Some(EntryKind::Directory)) => {}
        Ok(Some(_)) => {
            return Err(MirrorError::SubtreeSync {
                path: source.to_path_buf(),
                reason: "source is not a directory".to_string(),
            })
        }
        Err(e) => {
            return Err(MirrorError::SubtreeSync {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }

    prepare_destination(destination)?;

    let mut stats = SyncStats::default();
    reconcile(source, destination, observer, &mut stats)?;
    materialize(source, destination, observer, &mut stats)?;

    stats.elapsed = started.elapsed();
    tracing::debug!(
        source = %source.display(),
        copied = stats.files_copied,
        updated = stats.files_updated,
        skipped = stats.files_skipped,
        removed = stats.entries_removed,
        failures = stats.failures,
        "tree synchronized"
    );
    Ok(SyncOutcome::Synced(stats))
}

/// Ensure the destination root is a directory, replacing a file if needed
fn prepare_destination(destination: &Path) -> Result<(), MirrorError> {
    let fatal = |source: Error| MirrorError::FatalResource {
        path: destination.to_path_buf(),
        source,
    };

    match fs::symlink_metadata(destination) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(meta) if meta.file_type().is_symlink() && destination.is_dir() => return Ok(()),
        Ok(_) => fs::remove_file(destination).map_err(fatal)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(fatal(e)),
    }

    fs::create_dir_all(destination).map_err(fatal)
}

fn reconcile(
    source: &Path,
    destination: &Path,
    observer: &Observer,
    stats: &mut SyncStats,
) -> Result<(), MirrorError> {
    let dest_tree = scan_tree(destination, observer)?;
    let plan = plan_removals(&dest_tree, source);

    for error in plan.undecided {
        report_item(observer, stats, error)?;
    }

    for removal in &plan.removals {
        match remove_path_any(&removal.path) {
            Ok(()) => {
                stats.entries_removed += 1;
                tracing::debug!(path = %removal.path.display(), reason = ?removal.reason, "removed");
            }
            Err(e) => report_item(observer, stats, e)?,
        }
    }

    Ok(())
}

fn materialize(
    source: &Path,
    destination: &Path,
    observer: &Observer,
    stats: &mut SyncStats,
) -> Result<(), MirrorError> {
    let src_tree = scan_tree(source, observer)?;

    for dir in &src_tree.dirs {
        let dest_dir = destination.join(&dir.relative);
        if dest_dir.is_dir() {
            continue;
        }
        match fs::create_dir_all(&dest_dir) {
            Ok(()) => stats.dirs_created += 1,
            Err(e) => {
                report_item(
                    observer,
                    stats,
                    MirrorError::from_item_io(&dest_dir, "create directory", e),
                )?;
            }
        }
    }

    let label = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    let total = src_tree.files.len() as u64;
    let mut throttle = ProgressThrottle::default();

    for (idx, entry) in src_tree.files.iter().enumerate() {
        if let Err(e) = sync_file(entry, destination, stats) {
            report_item(observer, stats, e)?;
        }

        if throttle.ready() {
            observer.progress(&ProgressUpdate {
                current: idx as u64 + 1,
                total,
                label: label.clone(),
                throughput_mbps: throttle.throughput_mbps(stats.bytes_copied),
            });
        }
    }

    if total > 0 {
        observer.progress(&ProgressUpdate {
            current: total,
            total,
            label,
            throughput_mbps: throttle.throughput_mbps(stats.bytes_copied),
        });
    }

    Ok(())
}

/// Apply the freshness rule to one source file
fn sync_file(entry: &FileEntry, destination: &Path, stats: &mut SyncStats) -> Result<(), MirrorError> {
    let dest_path = destination.join(&entry.relative);

    let dest_mtime = match fs::metadata(&dest_path) {
        Ok(meta) if meta.is_dir() => {
            return Err(MirrorError::from_item_io(
                &dest_path,
                "replace",
                Error::new(ErrorKind::AlreadyExists, "a directory occupies the path"),
            ))
        }
        Ok(meta) => Some(
            meta.modified()
                .map_err(|e| MirrorError::from_item_io(&dest_path, "read mtime of", e))?,
        ),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(MirrorError::from_item_io(&dest_path, "inspect", e)),
    };

    let action = compare_mtime(entry.mtime, dest_mtime);
    if !action.is_transfer() {
        stats.files_skipped += 1;
        return Ok(());
    }

    let bytes = copy_file_atomic(&entry.path, &dest_path)?;
    stats.bytes_copied += bytes;
    match action {
        FileAction::CopyNew => stats.files_copied += 1,
        FileAction::Update => stats.files_updated += 1,
        FileAction::Skip => {}
    }
    tracing::debug!(
        action = action.action_name(),
        path = %dest_path.display(),
        bytes,
        "file synchronized"
    );
    Ok(())
}

/// Log and count a recoverable item failure; pass fatal ones up
fn report_item(
    observer: &Observer,
    stats: &mut SyncStats,
    error: MirrorError,
) -> Result<(), MirrorError> {
    if error.is_fatal() {
        return Err(error);
    }
    stats.failures += 1;
    observer.warn(&error.to_string());
    Ok(())
}
