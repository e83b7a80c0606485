//! Reconciliation plan: which destination entries must go

use crate::types::{EntryKind, MirrorError, RemovalReason, TreeSnapshot};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

/// A destination entry scheduled for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Absolute destination path
    pub path: PathBuf,
    /// Path relative to the destination root
    pub relative: PathBuf,
    pub kind: EntryKind,
    pub reason: RemovalReason,
}

/// Ordered removals plus the entries that could not be judged
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    /// Longest relative path first, so children go before their parents
    pub removals: Vec<Removal>,
    /// Entries kept because their source analog could not be probed
    pub undecided: Vec<MirrorError>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removals.len()
    }
}

/// Compare a destination snapshot against the live source tree.
///
/// A destination entry is removed when its source analog does not exist or
/// has a different kind. Only a definite "not found" counts as missing; any
/// other probe error keeps the entry and is reported in `undecided`.
///
/// # Example
/// ```
/// use pbmirror::diff::plan_removals;
/// use pbmirror::scanner::scan_tree;
/// use pbmirror::types::Observer;
///
/// let src = tempfile::tempdir().unwrap();
/// let dst = tempfile::tempdir().unwrap();
/// std::fs::write(dst.path().join("stale.pbl"), b"old").unwrap();
///
/// let snapshot = scan_tree(dst.path(), &Observer::new()).unwrap();
/// let plan = plan_removals(&snapshot, src.path());
/// assert_eq!(plan.len(), 1);
/// ```
pub fn plan_removals(dest_tree: &TreeSnapshot, source_root: &Path) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    for (relative, dest_kind) in dest_tree.entries() {
        let src_path = source_root.join(relative);
        let reason = match EntryKind::probe(&src_path) {
            Ok(None) => RemovalReason::Orphaned,
            Ok(Some(src_kind)) if src_kind != dest_kind => RemovalReason::TypeChanged,
            Ok(Some(_)) => continue,
            Err(e) => {
                plan.undecided.push(MirrorError::from_item_io(&src_path, "inspect", e));
                continue;
            }
        };

        plan.removals.push(Removal {
            path: dest_tree.root_path.join(relative),
            relative: relative.to_path_buf(),
            kind: dest_kind,
            reason,
        });
    }

    plan.removals.sort_by_key(|r| {
        (
            Reverse(r.relative.as_os_str().len()),
            Reverse(r.relative.clone()),
        )
    });
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_tree;
    use crate::types::Observer;
    use std::fs;
    use tempfile::TempDir;

    fn plan_for(src: &TempDir, dst: &TempDir) -> ReconcilePlan {
        let snapshot = scan_tree(dst.path(), &Observer::new()).expect("scan destination");
        plan_removals(&snapshot, src.path())
    }

    #[test]
    fn test_matching_trees_plan_nothing() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        for root in [src.path(), dst.path()] {
            fs::create_dir_all(root.join("lib")).expect("create lib");
            fs::write(root.join("lib/a.pbl"), b"a").expect("write a");
        }

        let plan = plan_for(&src, &dst);
        assert!(plan.is_empty());
        assert!(plan.undecided.is_empty());
    }

    #[test]
    fn test_orphaned_file_is_removed() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        fs::write(dst.path().join("gone.pbl"), b"x").expect("write orphan");

        let plan = plan_for(&src, &dst);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.removals[0].relative, PathBuf::from("gone.pbl"));
        assert_eq!(plan.removals[0].reason, RemovalReason::Orphaned);
        assert_eq!(plan.removals[0].path, dst.path().join("gone.pbl"));
    }

    #[test]
    fn test_type_change_is_removed() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        fs::create_dir(src.path().join("p")).expect("create src dir");
        fs::write(dst.path().join("p"), b"file where dir expected").expect("write dst file");

        let plan = plan_for(&src, &dst);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.removals[0].reason, RemovalReason::TypeChanged);
        assert_eq!(plan.removals[0].kind, EntryKind::File);
    }

    #[test]
    fn test_removals_are_deepest_first() {
        let src = TempDir::new().expect("create src");
        let dst = TempDir::new().expect("create dst");
        fs::create_dir_all(dst.path().join("old/nested/deeper")).expect("create dirs");
        fs::write(dst.path().join("old/nested/deeper/f.pbl"), b"f").expect("write f");
        fs::write(dst.path().join("old/g.pbl"), b"g").expect("write g");

        let plan = plan_for(&src, &dst);
        let order: Vec<_> = plan.removals.iter().map(|r| r.relative.clone()).collect();
        assert_eq!(order.len(), 5);
        assert_eq!(order.last(), Some(&PathBuf::from("old")));

        for window in order.windows(2) {
            assert!(window[0].as_os_str().len() >= window[1].as_os_str().len());
        }
        let pos = |p: &str| order.iter().position(|o| o == Path::new(p)).unwrap();
        assert!(pos("old/nested/deeper/f.pbl") < pos("old/nested/deeper"));
        assert!(pos("old/nested/deeper") < pos("old/nested"));
        assert!(pos("old/nested") < pos("old"));
    }
}
