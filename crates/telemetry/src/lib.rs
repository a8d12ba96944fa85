//! Logging and metrics for the nestfind engine
//!
//! This crate provides:
//! - Structured logging with tracing
//! - Level-attempt and callback-failure counters via the `metrics` facade
//! - Duration timers and a `timed_span!` macro
//!
//! Metrics are no-ops until the host process installs a recorder.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Counter incremented once per fallback level that issues a search
pub const LEVEL_ATTEMPTS: &str = "nestfind_level_attempts_total";

/// Counter incremented when the search callback fails
pub const CALLBACK_FAILURES: &str = "nestfind_callback_failures_total";

/// Counter incremented with the level that produced the final result
pub const SEARCH_OUTCOMES: &str = "nestfind_search_outcomes_total";

/// Histogram of operation durations in milliseconds
pub const OPERATION_DURATION: &str = "nestfind_operation_duration_ms";

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize the telemetry system
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer()
            .with_target(config.show_target)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file)
            .with_line_number(config.show_line_number)
            .compact());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub show_target: bool,
    pub show_thread_ids: bool,
    pub show_file: bool,
    pub show_line_number: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
        }
    }
}

/// Count a fallback level that issued at least one search.
pub fn record_level_attempt(level: &'static str) {
    metrics::counter!(LEVEL_ATTEMPTS, "level" => level).increment(1);
}

/// Count a failed search callback.
pub fn record_callback_failure(level: &'static str) {
    metrics::counter!(CALLBACK_FAILURES, "level" => level).increment(1);
}

/// Count the level that produced a final result.
pub fn record_outcome(level: &'static str) {
    metrics::counter!(SEARCH_OUTCOMES, "level" => level).increment(1);
}

/// Timer for measuring operation duration
pub struct Timer {
    name: &'static str,
    start: Instant,
    stopped: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            stopped: false,
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(mut self) -> Duration {
        self.stopped = true;
        let duration = self.start.elapsed();
        self.record(duration);
        tracing::debug!(
            metric = %self.name,
            duration_ms = duration.as_millis() as u64,
            "Timer completed"
        );
        duration
    }

    fn record(&self, duration: Duration) {
        metrics::histogram!(OPERATION_DURATION, "operation" => self.name)
            .record(duration.as_secs_f64() * 1000.0);
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        // Record duration if not explicitly stopped
        if !self.stopped {
            self.record(self.start.elapsed());
        }
    }
}

/// Span for tracing operations
#[macro_export]
macro_rules! timed_span {
    ($name:expr) => {
        let _timer = $crate::Timer::start($name);
        let _span = tracing::info_span!($name).entered();
    };
    ($name:expr, $($field:tt)*) => {
        let _timer = $crate::Timer::start($name);
        let _span = tracing::info_span!($name, $($field)*).entered();
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_timer_drop_without_stop() {
        let timer = Timer::start("dropped_operation");
        drop(timer);
    }

    #[test]
    fn test_counters_without_recorder_are_noops() {
        record_level_attempt("exact");
        record_callback_failure("relaxed");
        record_outcome("popular");
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        // Should be a valid UUID
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_init_installs_subscriber_once() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
            show_target: true,
            ..TelemetryConfig::default()
        };
        assert!(init_with_config(config).is_ok());
        tracing::debug!(session_id = %session_id(), "subscriber live");

        let err = init().unwrap_err();
        assert!(err.to_string().contains("Failed to set tracing subscriber"));
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.show_file);
    }
}
