//! Settings - configuration contracts shared across crates
//!
//! Loaded by `config_loader`, consumed by `dispatcher` and `observability`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Dispatcher configuration
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Logging / metrics configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dispatcher configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound for a single handler invocation (milliseconds)
    ///
    /// `None` waits for every handler indefinitely.
    #[serde(default)]
    pub handler_timeout_ms: Option<u64>,
}

impl DispatcherConfig {
    /// Config with a per-handler timeout, rounded up to whole milliseconds
    pub fn with_handler_timeout(timeout: Duration) -> Self {
        // Round up so sub-millisecond timeouts never become zero
        let millis = timeout.as_nanos().div_ceil(1_000_000).max(1);
        Self {
            handler_timeout_ms: Some(u64::try_from(millis).unwrap_or(u64::MAX)),
        }
    }

    /// Per-handler timeout as a `Duration`
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout_ms.map(Duration::from_millis)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON structured logs
    #[default]
    Json,
    /// Human readable
    Pretty,
    /// Compact single line
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format
    #[serde(default)]
    pub format: LogFormat,

    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Prometheus exporter port (None = disabled)
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
            metrics_port: None,
        }
    }
}
