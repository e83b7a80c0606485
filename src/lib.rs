//! # pbmirror - Versioned library mirror
//!
//! Keeps a local mirror of per-version folders on a remote origin, then
//! catalogs the library artifacts found in each mirrored version.
//!
//! The engine is two-pass: reconciliation removes what the origin no longer
//! has, materialization copies what is new or newer. Copies are atomic and
//! keep the origin's modification time, so a rerun against an unchanged
//! origin copies nothing.

pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod index;
pub mod logging;
pub mod scanner;
pub mod types;
pub mod ui;

pub use config::Config;
pub use executor::sync_tree;
pub use index::{index_leaves, LeafIndexer};
pub use types::{MirrorError, Observer, Severity, SyncOutcome, SyncStats, TargetInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
