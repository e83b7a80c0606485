//! Atomic file copy implementation

use crate::types::MirrorError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Write to a uniquely named `.<random>.part` file next to `dest`
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename over the destination
///
/// The temporary name is created exclusively, so it never replaces a
/// mirrored file, even one that itself ends in `.part`. Carrying the source
/// mtime over is what lets the next run skip the file. If any step fails
/// the temporary file is removed and the previous destination content stays
/// in place.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(MirrorError)` - `FileSync`, or `FatalResource` when the volume is full
///
/// # Example
/// ```no_run
/// use pbmirror::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("origin/app.pbl"), Path::new("mirror/app.pbl"))?;
/// # Ok::<(), pbmirror::types::MirrorError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, MirrorError> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| MirrorError::from_item_io(parent, "create directory", e))?;

    let mut part = Builder::new()
        .prefix(".")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| MirrorError::from_item_io(parent, "create temporary file in", e))?;

    // Dropping `part` on any error below deletes the temporary file.
    let total_bytes = write_part(src, &mut part)?;

    part.persist(dest)
        .map_err(|e| MirrorError::from_item_io(dest, "replace", e.error))?;
    Ok(total_bytes)
}

fn write_part(src: &Path, part: &mut NamedTempFile) -> Result<u64, MirrorError> {
    let part_path = part.path().to_path_buf();
    let mut src_file = File::open(src).map_err(|e| MirrorError::from_item_io(src, "read", e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| MirrorError::from_item_io(src, "read", e))?;

        if bytes_read == 0 {
            break;
        }

        part.as_file_mut()
            .write_all(&buffer[0..bytes_read])
            .map_err(|e| MirrorError::from_item_io(&part_path, "write", e))?;
        total_bytes += bytes_read as u64;
    }

    part.as_file()
        .sync_all()
        .map_err(|e| MirrorError::from_item_io(&part_path, "flush", e))?;

    let src_metadata =
        fs::metadata(src).map_err(|e| MirrorError::from_item_io(src, "read metadata of", e))?;

    fs::set_permissions(&part_path, src_metadata.permissions())
        .map_err(|e| MirrorError::from_item_io(&part_path, "set permissions on", e))?;

    let mtime = src_metadata
        .modified()
        .map_err(|e| MirrorError::from_item_io(src, "read mtime of", e))?;
    filetime::set_file_mtime(&part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(|e| MirrorError::from_item_io(&part_path, "set mtime on", e))?;

    Ok(total_bytes)
}
