//! Logging setup and error strategy counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSettings};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match settings.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
}

/// Per-handler counters of what the strategy engine did with failures
#[derive(Debug, Default)]
pub struct ErrorStats {
    surfaced: AtomicU64,
    masked: AtomicU64,
    forwarded: AtomicU64,
    dropped: AtomicU64,
    panicked: AtomicU64,
}

impl ErrorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_surfaced(&self) {
        self.surfaced.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "errors_surfaced", "Metric incremented");
    }

    pub fn error_masked(&self) {
        self.masked.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "errors_masked", "Metric incremented");
    }

    pub fn error_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "errors_forwarded", "Metric incremented");
    }

    pub fn error_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "errors_dropped", "Metric incremented");
    }

    pub fn error_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "errors_panicked", "Metric incremented");
    }

    pub fn snapshot(&self) -> ErrorStatsSnapshot {
        ErrorStatsSnapshot {
            surfaced: self.surfaced.load(Ordering::Relaxed),
            masked: self.masked.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorStatsSnapshot {
    pub surfaced: u64,
    pub masked: u64,
    pub forwarded: u64,
    pub dropped: u64,
    pub panicked: u64,
}

impl ErrorStatsSnapshot {
    pub fn total(&self) -> u64 {
        self.surfaced + self.masked + self.forwarded + self.dropped + self.panicked
    }
}
