//! Progress reporting

use crate::types::{Observer, ProgressUpdate, Severity};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Terminal progress for a mirror run: one bar per group being synced.
///
/// Clones share the same bars.
#[derive(Clone)]
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Arc<Mutex<HashMap<String, ProgressBar>>>,
}

impl ProgressReporter {
    /// Create a reporter drawing to stderr
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Create a reporter that never draws
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Observer feeding this reporter; log lines are printed above the bars
    pub fn observer(&self) -> Observer {
        let progress = self.clone();
        let multi = self.multi.clone();
        Observer::new()
            .with_progress(move |update| progress.update(update))
            .with_log(move |severity, message| {
                multi.suspend(|| match severity {
                    Severity::Info => tracing::info!("{}", message),
                    Severity::Warn => tracing::warn!("{}", message),
                    Severity::Error => tracing::error!("{}", message),
                })
            })
    }

    /// Apply one progress update. The bar for a label finishes once
    /// `current` reaches `total`.
    pub fn update(&self, update: &ProgressUpdate) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };

        let bar = bars
            .entry(update.label.clone())
            .or_insert_with(|| self.multi.add(transfer_bar(&update.label, update.total)));
        bar.set_length(update.total);
        bar.set_position(update.current.min(update.total));
        bar.set_message(throughput_message(update.throughput_mbps));

        if update.current >= update.total {
            bar.finish();
            bars.remove(&update.label);
        }
    }

    /// Start a spinner for a phase without a known length
    pub fn start_spinner(&self, message: &str) -> ProgressBar {
        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        spinner.set_message(message.to_string());
        spinner
    }

    /// Labels whose bars are still running
    pub fn active_labels(&self) -> Vec<String> {
        match self.bars.lock() {
            Ok(bars) => {
                let mut labels: Vec<_> = bars.keys().cloned().collect();
                labels.sort();
                labels
            }
            Err(_) => Vec::new(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn transfer_bar(label: &str, total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{prefix:>6} {bar:30.cyan/blue} {pos}/{len} files | {msg}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar.set_prefix(label.to_string());
    bar
}

fn throughput_message(throughput_mbps: Option<f64>) -> String {
    match throughput_mbps {
        Some(mbps) => format!("{:.1} MB/s", mbps),
        None => "up to date".to_string(),
    }
}
