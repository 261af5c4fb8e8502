//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total dispatch calls (including those with no handlers)
    dispatch_count: AtomicU64,
    /// Handler invocations that ran to completion
    completed_count: AtomicU64,
    /// Handler invocations that panicked
    panic_count: AtomicU64,
    /// Handler invocations dropped by the handler timeout
    timeout_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total dispatch count
    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count.load(Ordering::Relaxed)
    }

    /// Increment dispatch count
    pub fn inc_dispatch_count(&self) {
        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get completed invocation count
    pub fn completed_count(&self) -> u64 {
        self.completed_count.load(Ordering::Relaxed)
    }

    /// Increment completed invocation count
    pub fn inc_completed_count(&self) {
        self.completed_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get panic count
    pub fn panic_count(&self) -> u64 {
        self.panic_count.load(Ordering::Relaxed)
    }

    /// Increment panic count
    pub fn inc_panic_count(&self) {
        self.panic_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get timeout count
    pub fn timeout_count(&self) -> u64 {
        self.timeout_count.load(Ordering::Relaxed)
    }

    /// Increment timeout count
    pub fn inc_timeout_count(&self) {
        self.timeout_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            dispatch_count: self.dispatch_count(),
            completed_count: self.completed_count(),
            panic_count: self.panic_count(),
            timeout_count: self.timeout_count(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchMetricsSnapshot {
    pub dispatch_count: u64,
    pub completed_count: u64,
    pub panic_count: u64,
    pub timeout_count: u64,
}

impl DispatchMetricsSnapshot {
    /// Invocations that did not complete normally
    pub fn failed_count(&self) -> u64 {
        self.panic_count + self.timeout_count
    }
}
