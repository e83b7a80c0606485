//! Orchestrating scan: sync every group, then catalog what was synced

use crate::commands::failure_log::FailureLog;
use crate::executor::{sync_groups_parallel, sync_tree};
use crate::index::index_leaves;
use crate::types::{
    MirrorError, Observer, Severity, SyncGroup, SyncOutcome, SyncStats, TargetInfo,
};
use crate::Config;
use indicatif::HumanBytes;
use std::fs;

/// How one group's synchronization ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStatus {
    Synced(SyncStats),
    SourceMissing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub group: SyncGroup,
    pub status: GroupStatus,
}

impl GroupReport {
    pub fn is_synced(&self) -> bool {
        matches!(self.status, GroupStatus::Synced(_))
    }
}

/// Output of [`scan`]
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// One report per configured group, in configured order
    pub groups: Vec<GroupReport>,
    /// Artifacts of every synced group, grouped in configured order
    pub catalog: Vec<TargetInfo>,
}

impl ScanReport {
    pub fn failed_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups
            .iter()
            .filter(|g| matches!(g.status, GroupStatus::Failed(_)))
    }
}

/// Synchronize every configured group into the mirror.
///
/// Missing sources and failed walks are logged and recorded in the returned
/// reports; neither stops the remaining groups.
///
/// # Errors
/// `MirrorError::FatalResource` when the mirror root cannot be created or the
/// destination volume fails; `MirrorError::Io` when the failure log cannot
/// be opened.
pub fn sync_all(config: &Config, observer: &Observer) -> Result<Vec<GroupReport>, MirrorError> {
    let observer = attach_failure_log(config, observer)?;

    observer.info(&format!(
        "Initializing mirror: {}",
        config.mirror_root.display()
    ));
    fs::create_dir_all(&config.mirror_root).map_err(|e| MirrorError::FatalResource {
        path: config.mirror_root.clone(),
        source: e,
    })?;

    if !config.origin_root.is_dir() {
        observer.warn(&format!(
            "Origin root is not reachable: {}",
            config.origin_root.display()
        ));
    }

    let groups = config.groups();
    if config.threads > 1 && groups.len() > 1 {
        let jobs: Vec<_> = groups
            .iter()
            .map(|g| {
                let scoped = observer.scoped(&g.tag);
                scoped.info(&format!("Syncing {}", g.source.display()));
                (g.clone(), scoped)
            })
            .collect();
        let results = sync_groups_parallel(jobs, config.threads)?;

        groups
            .into_iter()
            .zip(results)
            .map(|(group, result)| {
                let scoped = observer.scoped(&group.tag);
                settle(group, result, &scoped)
            })
            .collect()
    } else {
        groups
            .into_iter()
            .map(|group| {
                let scoped = observer.scoped(&group.tag);
                scoped.info(&format!("Syncing {}", group.source.display()));
                let result = sync_tree(&group.source, &group.destination, &scoped);
                settle(group, result, &scoped)
            })
            .collect()
    }
}

/// Synchronize every group, then catalog the artifacts of the synced ones.
///
/// A group contributes catalog entries only when its synchronization
/// completed.
pub fn scan(config: &Config, observer: &Observer) -> Result<ScanReport, MirrorError> {
    let groups = sync_all(config, observer)?;

    observer.info("Scanning local mirror...");
    let mut catalog = Vec::new();
    for report in groups.iter().filter(|r| r.is_synced()) {
        let before = catalog.len();
        catalog.extend(index_leaves(
            &report.group.destination,
            &report.group.tag,
            &config.extension,
        ));
        tracing::debug!(
            group = %report.group.tag,
            artifacts = catalog.len() - before,
            "group indexed"
        );
    }

    Ok(ScanReport { groups, catalog })
}

/// Catalog the mirror as it is, without contacting the origin
pub fn index_all(config: &Config) -> Vec<TargetInfo> {
    config
        .groups()
        .iter()
        .flat_map(|g| index_leaves(&g.destination, &g.tag, &config.extension))
        .collect()
}

/// Turn a group result into a report, logging it; fatal errors pass through
fn settle(
    group: SyncGroup,
    result: Result<SyncOutcome, MirrorError>,
    observer: &Observer,
) -> Result<GroupReport, MirrorError> {
    let status = match result {
        Ok(SyncOutcome::Synced(stats)) => {
            observer.info(&format!(
                "Synced: {} copied, {} updated, {} removed, {} unchanged ({})",
                stats.files_copied,
                stats.files_updated,
                stats.entries_removed,
                stats.files_skipped,
                HumanBytes(stats.bytes_copied)
            ));
            if stats.failures > 0 {
                observer.warn(&format!(
                    "{} item(s) under {} could not be synchronized",
                    stats.failures,
                    group.source.display()
                ));
            }
            GroupStatus::Synced(stats)
        }
        Ok(SyncOutcome::SourceMissing) => {
            observer.warn(&format!(
                "Version folder missing on origin, skipped: {}",
                group.source.display()
            ));
            GroupStatus::SourceMissing
        }
        Err(e) if e.is_fatal() => {
            observer.error(&e.to_string());
            return Err(e);
        }
        Err(e) => {
            observer.error(&format!("Synchronization failed: {}", e));
            GroupStatus::Failed(e.to_string())
        }
    };

    Ok(GroupReport { group, status })
}

/// Mirror warnings and errors into the configured failure log
fn attach_failure_log(config: &Config, observer: &Observer) -> Result<Observer, MirrorError> {
    let Some(path) = &config.failure_log else {
        return Ok(observer.clone());
    };

    let log = FailureLog::open(path)?;
    let inner = observer.clone();
    Ok(observer.clone().with_log(move |severity, message| {
        inner.log(severity, message);
        if severity != Severity::Info {
            log.record(severity, message);
        }
    }))
}
