//! 事件分发指标收集模块
//!
//! 通过 `metrics` facade 上报分发指标，并提供内存内的延迟统计。

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// 记录一次完成的分发
///
/// 每次 `dispatch` 等待所有 handler 完成后调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_dispatch;
///
/// let started = std::time::Instant::now();
/// // ... fan-out ...
/// record_dispatch("order.created", 3, started.elapsed());
/// ```
pub fn record_dispatch(event_name: &str, handler_count: usize, elapsed: Duration) {
    counter!(
        "event_dispatcher_dispatches_total",
        "event" => event_name.to_string()
    )
    .increment(1);

    histogram!(
        "event_dispatcher_dispatch_latency_ms",
        "event" => event_name.to_string()
    )
    .record(elapsed.as_secs_f64() * 1000.0);

    histogram!("event_dispatcher_fanout_width").record(handler_count as f64);
}

/// 记录单个 handler 的执行结果
///
/// `outcome`: `completed` / `timeout` / `panic`
pub fn record_handler_outcome(event_name: &str, outcome: &str) {
    counter!(
        "event_dispatcher_handler_invocations_total",
        "event" => event_name.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// 记录注册表中的事件名数量
pub fn record_registry_size(event_names: usize) {
    gauge!("event_dispatcher_registered_events").set(event_names as f64);
}

/// 分发统计聚合器
///
/// 在内存中聚合分发延迟与 fan-out 宽度，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    /// 分发总次数
    pub total_dispatches: u64,

    /// 无 handler 的分发次数
    pub empty_dispatches: u64,

    /// 延迟统计 (毫秒)
    pub latency_ms: RunningStats,

    /// fan-out 宽度统计
    pub fanout: RunningStats,
}

impl DispatchStats {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, handler_count: usize, elapsed: Duration) {
        self.total_dispatches += 1;
        if handler_count == 0 {
            self.empty_dispatches += 1;
            return;
        }
        self.latency_ms.push(elapsed.as_secs_f64() * 1000.0);
        self.fanout.push(handler_count as f64);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> StatsReport {
        StatsReport {
            total_dispatches: self.total_dispatches,
            empty_dispatches: self.empty_dispatches,
            latency_ms: StatsSummary::from(&self.latency_ms),
            fanout: StatsSummary::from(&self.fanout),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 分发摘要
#[derive(Debug, Clone, Default)]
pub struct StatsReport {
    pub total_dispatches: u64,
    pub empty_dispatches: u64,
    pub latency_ms: StatsSummary,
    pub fanout: StatsSummary,
}

impl std::fmt::Display for StatsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Total dispatches: {}", self.total_dispatches)?;
        writeln!(f, "Without handlers: {}", self.empty_dispatches)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;
        writeln!(f, "Fan-out width: {}", self.fanout)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }
}
