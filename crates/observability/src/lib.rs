//! # Observability
//!
//! 可观测性模块：Tracing + Prometheus 指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - Prometheus 指标导出 (可选)
//! - 分发指标上报与统计
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::init_with_config;
//! use contracts::LoggingConfig;
//!
//! init_with_config(&LoggingConfig::default())?;
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use contracts::{LogFormat, LoggingConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_dispatch, record_handler_outcome, record_registry_size, DispatchStats, RunningStats,
    StatsReport, StatsSummary,
};

/// 使用默认配置初始化 (JSON 日志，不启用 Prometheus)
pub fn init() -> Result<()> {
    init_with_config(&LoggingConfig::default())
}

/// 使用自定义配置初始化
///
/// - Tracing: 支持 RUST_LOG 环境变量，未设置时使用 `config.level`
/// - Prometheus: 仅在 `metrics_port` 配置时监听 0.0.0.0:port
pub fn init_with_config(config: &LoggingConfig) -> Result<()> {
    // 1. Initialize Tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    // 2. Initialize Prometheus Exporter (if enabled)
    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// 仅初始化 Prometheus 指标（不初始化 Tracing）
///
/// 用于 Tracing 已由其他模块初始化的场景。
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
