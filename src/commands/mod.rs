//! Run-level commands composed from the sync engine and the indexer

pub mod failure_log;
pub mod scan;

pub use failure_log::FailureLog;
pub use scan::{index_all, scan, sync_all, GroupReport, GroupStatus, ScanReport};
