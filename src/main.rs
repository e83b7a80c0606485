use clap::Parser;
use console::style;
use pbmirror::commands::{self, GroupReport, GroupStatus};
use pbmirror::config::{Cli, Command};
use pbmirror::ui::ProgressReporter;
use pbmirror::{logging, Config, TargetInfo};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose).map_err(|e| anyhow::anyhow!(e))?;

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    let reporter = ProgressReporter::new();
    let observer = reporter.observer();

    match cli.command {
        Command::Sync => {
            let reports = commands::sync_all(&config, &observer)?;
            println!("{}", format_group_summary(&reports));
            let failed = reports
                .iter()
                .filter(|r| matches!(r.status, GroupStatus::Failed(_)))
                .count();
            ensure_no_failures(failed)?;
        }
        Command::Scan { json } => {
            let report = commands::scan(&config, &observer)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.catalog)?);
            } else {
                println!("{}", format_group_summary(&report.groups));
                println!("{}", format_catalog(&report.catalog));
            }
            ensure_no_failures(report.failed_groups().count())?;
        }
        Command::Index { json } => {
            let spinner = reporter.start_spinner("Scanning local mirror...");
            let catalog = commands::index_all(&config);
            spinner.finish_and_clear();
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                println!("{}", format_catalog(&catalog));
            }
        }
    }

    Ok(())
}

/// Failed versions still produce output, but the exit status reports them
fn ensure_no_failures(failed: usize) -> anyhow::Result<()> {
    if failed > 0 {
        anyhow::bail!("{} version(s) failed to synchronize", failed);
    }
    Ok(())
}

fn format_group_summary(reports: &[GroupReport]) -> String {
    let mut lines = Vec::with_capacity(reports.len() + 1);
    lines.push(style("Versions:").bold().to_string());
    for report in reports {
        let status = match &report.status {
            GroupStatus::Synced(stats) if stats.is_noop() => {
                style("up to date".to_string()).green().to_string()
            }
            GroupStatus::Synced(stats) => style(format!(
                "{} copied, {} updated, {} removed",
                stats.files_copied, stats.files_updated, stats.entries_removed
            ))
            .green()
            .to_string(),
            GroupStatus::SourceMissing => style("missing on origin".to_string()).yellow().to_string(),
            GroupStatus::Failed(reason) => style(format!("failed: {}", reason)).red().to_string(),
        };
        lines.push(format!("  {:<8} {}", report.group.tag, status));
    }
    lines.join("\n")
}

fn format_catalog(catalog: &[TargetInfo]) -> String {
    if catalog.is_empty() {
        return "Catalog:\n  (no artifacts found)".to_string();
    }

    let mut lines = Vec::with_capacity(catalog.len() + 2);
    lines.push(style("Catalog:").bold().to_string());
    for target in catalog {
        lines.push(format!(
            "  {:<8} {:<24} {}",
            target.group,
            target.name,
            target.path.display()
        ));
    }
    lines.push(format!("  ({} artifact(s))", catalog.len()));
    lines.join("\n")
}
