//! Leaf indexing: catalog artifact files in a synchronized tree

use crate::types::TargetInfo;
use std::path::{Path, PathBuf};

/// Catalog of files with one extension under a root.
///
/// Each call to [`LeafIndexer::iter`] performs a fresh walk; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct LeafIndexer {
    root: PathBuf,
    group: String,
    extension: String,
}

impl LeafIndexer {
    /// `extension` may be given with or without the leading dot and is
    /// matched case-insensitively.
    pub fn new(root: impl Into<PathBuf>, group: impl Into<String>, extension: &str) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root,
            group: group.into(),
            extension: normalize_extension(extension),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the root. A missing root yields nothing.
    pub fn iter(&self) -> Leaves {
        let walk = self.root.is_dir().then(|| {
            ignore::WalkBuilder::new(&self.root)
                .standard_filters(false)
                .follow_links(false)
                .build()
        });
        Leaves {
            walk,
            group: self.group.clone(),
            extension: self.extension.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a LeafIndexer {
    type Item = TargetInfo;
    type IntoIter = Leaves;

    fn into_iter(self) -> Leaves {
        self.iter()
    }
}

/// Iterator returned by [`LeafIndexer::iter`]
pub struct Leaves {
    walk: Option<ignore::Walk>,
    group: String,
    extension: String,
}

impl Iterator for Leaves {
    type Item = TargetInfo;

    fn next(&mut self) -> Option<TargetInfo> {
        let walk = self.walk.as_mut()?;
        for result in walk {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping entry while indexing: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let is_file = match entry.file_type() {
                Some(ft) if ft.is_symlink() => path.is_file(),
                Some(ft) => ft.is_file(),
                None => false,
            };
            if !is_file || !has_extension(path, &self.extension) {
                continue;
            }

            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Some(TargetInfo {
                group: self.group.clone(),
                name,
                path: path.to_path_buf(),
            });
        }
        None
    }
}

/// Catalog every `extension` file under `root` for `group`
pub fn index_leaves(root: &Path, group: &str, extension: &str) -> Leaves {
    LeafIndexer::new(root, group, extension).iter()
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().to_lowercase() == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(root: &Path, ext: &str) -> Vec<String> {
        let mut names: Vec<_> = index_leaves(root, "g", ext).map(|t| t.name).collect();
        names.sort();
        names
    }

    #[test]
    fn test_index_selects_by_extension() {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path();
        fs::write(root.join("a.pbl"), b"a").expect("write a");
        fs::write(root.join("b.txt"), b"b").expect("write b");
        fs::create_dir(root.join("c")).expect("create c");
        fs::write(root.join("c/d.pbl"), b"d").expect("write d");

        let mut entries: Vec<_> = index_leaves(root, "g", ".pbl").collect();
        entries.sort_by(|x, y| x.name.cmp(&y.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].group, "g");
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries[0].path, root.join("a.pbl"));
        assert_eq!(entries[1].name, "d");
        assert_eq!(entries[1].path, root.join("c/d.pbl"));
        assert!(entries.iter().all(|e| e.path.is_absolute()));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join("UPPER.PBL"), b"u").expect("write upper");
        fs::write(temp.path().join("mixed.Pbl"), b"m").expect("write mixed");

        assert_eq!(names(temp.path(), ".pbl"), vec!["UPPER", "mixed"]);
        assert_eq!(names(temp.path(), "PBL"), vec!["UPPER", "mixed"]);
    }

    #[test]
    fn test_directories_with_extension_are_ignored() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir(temp.path().join("folder.pbl")).expect("create dir");

        assert!(names(temp.path(), ".pbl").is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().expect("create temp dir");
        assert_eq!(index_leaves(&temp.path().join("none"), "g", ".pbl").count(), 0);
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let indexer = LeafIndexer::new("mirror/9.0", "9.0", ".pbl");
        let cwd = std::env::current_dir().expect("current dir");

        assert!(indexer.root().is_absolute());
        assert_eq!(indexer.root(), cwd.join("mirror/9.0"));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join("one.pbl"), b"1").expect("write one");

        let indexer = LeafIndexer::new(temp.path(), "7.0", "pbl");
        assert_eq!(indexer.iter().count(), 1);

        fs::write(temp.path().join("two.pbl"), b"2").expect("write two");
        assert_eq!(indexer.iter().count(), 2);
        assert_eq!((&indexer).into_iter().count(), 2);
    }
}
