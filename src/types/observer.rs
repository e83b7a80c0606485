//! Observer - Progress and log callbacks invoked from the sync hot path

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Minimum time between two progress callbacks for the same walk
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// One progress notification
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub current: u64,
    pub total: u64,
    pub label: String,
    /// Copy throughput in MB/s, when any bytes were copied
    pub throughput_mbps: Option<f64>,
}

/// Callback for progress reporting
pub type ProgressCallback = dyn Fn(&ProgressUpdate) + Send + Sync;

/// Callback for recoverable conditions
pub type LogCallback = dyn Fn(Severity, &str) + Send + Sync;

/// Pair of optional callbacks handed to the engine.
///
/// Cloning is cheap; clones share the same callbacks. Without a log callback
/// messages go to `tracing`.
#[derive(Clone, Default)]
pub struct Observer {
    on_progress: Option<Arc<ProgressCallback>>,
    on_log: Option<Arc<LogCallback>>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressUpdate) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn with_log<F>(mut self, callback: F) -> Self
    where
        F: Fn(Severity, &str) + Send + Sync + 'static,
    {
        self.on_log = Some(Arc::new(callback));
        self
    }

    /// Derive an observer whose log messages carry a `[tag]` prefix
    pub fn scoped(&self, tag: &str) -> Self {
        let parent = self.clone();
        let prefix = format!("[{}] ", tag);
        Self {
            on_progress: self.on_progress.clone(),
            on_log: Some(Arc::new(move |severity, message: &str| {
                parent.log(severity, &format!("{}{}", prefix, message));
            })),
        }
    }

    pub fn progress(&self, update: &ProgressUpdate) {
        if let Some(callback) = &self.on_progress {
            callback(update);
        }
    }

    pub fn log(&self, severity: Severity, message: &str) {
        match &self.on_log {
            Some(callback) => callback(severity, message),
            None => match severity {
                Severity::Info => tracing::info!("{}", message),
                Severity::Warn => tracing::warn!("{}", message),
                Severity::Error => tracing::error!("{}", message),
            },
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Severity::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("on_progress", &self.on_progress.is_some())
            .field("on_log", &self.on_log.is_some())
            .finish()
    }
}

/// Rate limiter for progress callbacks
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    started: Instant,
    last: Instant,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            started: now,
            last: now,
        }
    }

    /// True (and resets the timer) once `interval` has passed since the last emit
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average throughput in MB/s since the throttle was created
    pub fn throughput_mbps(&self, bytes: u64) -> Option<f64> {
        let secs = self.elapsed().as_secs_f64();
        if bytes == 0 || secs <= 0.0 {
            return None;
        }
        Some(bytes as f64 / (1024.0 * 1024.0) / secs)
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(PROGRESS_INTERVAL)
    }
}
