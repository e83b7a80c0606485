//! SyncOutcome / SyncStats - Result of synchronizing one group

use std::time::Duration;

/// Counters collected by one `sync_tree` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files that did not exist in the destination
    pub files_copied: usize,
    /// Files overwritten because the source was newer
    pub files_updated: usize,
    /// Files left alone because the destination was fresh
    pub files_skipped: usize,
    pub dirs_created: usize,
    /// Stale or type-conflicting destination entries removed
    pub entries_removed: usize,
    /// Item-level failures that were logged and skipped
    pub failures: usize,
    pub bytes_copied: u64,
    pub elapsed: Duration,
}

impl SyncStats {
    /// Number of file writes performed
    pub fn transfers(&self) -> usize {
        self.files_copied + self.files_updated
    }

    /// True when the run did not touch the destination
    pub fn is_noop(&self) -> bool {
        self.transfers() == 0 && self.dirs_created == 0 && self.entries_removed == 0
    }
}

/// Outcome of a group synchronization that did not error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Both passes ran to completion
    Synced(SyncStats),

    /// Source root does not exist; nothing was touched
    SourceMissing,
}

impl SyncOutcome {
    pub fn stats(&self) -> Option<&SyncStats> {
        match self {
            SyncOutcome::Synced(stats) => Some(stats),
            SyncOutcome::SourceMissing => None,
        }
    }

    pub fn is_source_missing(&self) -> bool {
        matches!(self, SyncOutcome::SourceMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_noop() {
        let stats = SyncStats::default();
        assert_eq!(stats.transfers(), 0);
        assert!(stats.is_noop());
    }

    #[test]
    fn test_transfers_counts_copies_and_updates() {
        let stats = SyncStats {
            files_copied: 2,
            files_updated: 3,
            files_skipped: 10,
            ..Default::default()
        };
        assert_eq!(stats.transfers(), 5);
        assert!(!stats.is_noop());
    }

    #[test]
    fn test_removals_are_not_noop() {
        let stats = SyncStats {
            entries_removed: 1,
            ..Default::default()
        };
        assert!(!stats.is_noop());
    }

    #[test]
    fn test_outcome_accessors() {
        let synced = SyncOutcome::Synced(SyncStats::default());
        assert!(synced.stats().is_some());
        assert!(!synced.is_source_missing());

        let missing = SyncOutcome::SourceMissing;
        assert!(missing.stats().is_none());
        assert!(missing.is_source_missing());
    }
}
