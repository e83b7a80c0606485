//! Configuration management

mod cli;

pub use cli::{Cli, Command};

use crate::types::{MirrorError, SyncGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Version folders mirrored when none are configured
pub const DEFAULT_GROUP_TAGS: [&str; 6] = ["6.5", "7.0", "8.0", "9.0", "10.5", "12.5"];

/// Artifact extension cataloged when none is configured
pub const DEFAULT_EXTENSION: &str = ".pbl";

/// Global configuration for a mirror run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root holding one folder per group on the origin side
    pub origin_root: PathBuf,

    /// Root of the local mirror
    pub mirror_root: PathBuf,

    /// Group (version) tags, processed in this order
    pub group_tags: Vec<String>,

    /// Extension of the leaf artifacts to catalog
    pub extension: String,

    /// Groups synchronized concurrently (1 = sequential)
    pub threads: usize,

    /// Append warnings and errors to this file as JSON lines
    pub failure_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin_root: PathBuf::new(),
            mirror_root: PathBuf::new(),
            group_tags: DEFAULT_GROUP_TAGS.iter().map(|t| t.to_string()).collect(),
            extension: DEFAULT_EXTENSION.to_string(),
            threads: 1,
            failure_log: None,
        }
    }
}

impl Config {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, MirrorError> {
        toml::from_str(text).map_err(|e| MirrorError::Config(format!("Invalid config file: {}", e)))
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, MirrorError> {
        let text = fs::read_to_string(path).map_err(|e| {
            MirrorError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.origin_root.as_os_str().is_empty() {
            return Err(MirrorError::Config("Origin root is not set".to_string()));
        }
        if self.mirror_root.as_os_str().is_empty() {
            return Err(MirrorError::Config("Mirror root is not set".to_string()));
        }
        if self.origin_root == self.mirror_root {
            return Err(MirrorError::Config(
                "Origin and mirror roots cannot be the same".to_string(),
            ));
        }
        if self.group_tags.is_empty() {
            return Err(MirrorError::Config("No group tags configured".to_string()));
        }

        let mut seen = HashSet::new();
        for tag in &self.group_tags {
            validate_tag(tag)?;
            if !seen.insert(tag.as_str()) {
                return Err(MirrorError::Config(format!("Duplicate group tag: {:?}", tag)));
            }
        }

        if self.extension.trim_start_matches('.').is_empty() {
            return Err(MirrorError::Config("Extension filter is empty".to_string()));
        }

        Ok(())
    }

    /// Resolve every tag into a `SyncGroup`, in configured order
    pub fn groups(&self) -> Vec<SyncGroup> {
        self.group_tags
            .iter()
            .map(|tag| SyncGroup::resolve(tag, &self.origin_root, &self.mirror_root))
            .collect()
    }
}

/// A tag becomes one path component under both roots
fn validate_tag(tag: &str) -> Result<(), MirrorError> {
    let invalid = tag.is_empty()
        || tag == "."
        || tag == ".."
        || tag.contains(['/', '\\'])
        || Path::new(tag).is_absolute();
    if invalid {
        return Err(MirrorError::Config(format!(
            "Group tag {:?} must be a single folder name",
            tag
        )));
    }
    Ok(())
}
