//! Delivery counters for a registry

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated on every channel invocation
#[derive(Debug, Default)]
pub struct ChannelMetrics {
    /// Invocations on active topics
    emitted: AtomicU64,
    /// Invocations dropped because the topic was suppressed
    suppressed: AtomicU64,
    /// Messages rendered and sent to bound sinks
    routed: AtomicU64,
    /// Messages written by the default transmitter
    fallback: AtomicU64,
    /// Sink or transmitter failures surfaced to callers
    delivery_failures: AtomicU64,
}

impl ChannelMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    pub fn inc_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub fn inc_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn routed(&self) -> u64 {
        self.routed.load(Ordering::Relaxed)
    }

    pub fn inc_routed(&self) {
        self.routed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fallback(&self) -> u64 {
        self.fallback.load(Ordering::Relaxed)
    }

    pub fn inc_fallback(&self) {
        self.fallback.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    pub fn inc_delivery_failures(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            emitted: self.emitted(),
            suppressed: self.suppressed(),
            routed: self.routed(),
            fallback: self.fallback(),
            delivery_failures: self.delivery_failures(),
        }
    }
}

/// Snapshot of registry metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub emitted: u64,
    pub suppressed: u64,
    pub routed: u64,
    pub fallback: u64,
    pub delivery_failures: u64,
}
