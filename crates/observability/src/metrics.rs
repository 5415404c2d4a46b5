//! Channel metrics publishing
//!
//! Bridges registry counters and per-message counts into the `metrics`
//! facade, so whatever recorder is installed (Prometheus by default) sees
//! them.

use channels::MetricsSnapshot;
use contracts::{ContractError, Priority, SinkAdapter};
use metrics::{counter, gauge};

/// Publish a registry snapshot as absolute counters.
///
/// Call periodically or at shutdown; counters are monotonic so repeated
/// calls with newer snapshots are safe.
pub fn record_snapshot(snapshot: &MetricsSnapshot) {
    counter!("logrelay_messages_emitted_total").absolute(snapshot.emitted);
    counter!("logrelay_messages_suppressed_total").absolute(snapshot.suppressed);
    counter!("logrelay_messages_routed_total").absolute(snapshot.routed);
    counter!("logrelay_messages_fallback_total").absolute(snapshot.fallback);
    counter!("logrelay_delivery_failures_total").absolute(snapshot.delivery_failures);
}

/// Record the number of topics a registry knows about
pub fn record_topic_count(count: usize) {
    gauge!("logrelay_topics").set(count as f64);
}

/// Record one message delivered to a named sink
pub fn record_message(sink_name: &str, level: &Priority) {
    counter!(
        "logrelay_sink_messages_total",
        "sink" => sink_name.to_string(),
        "priority" => level.to_string()
    )
    .increment(1);
}

/// Sink that only counts messages, by priority label.
///
/// Bind it next to real sinks to get per-channel throughput without
/// touching the emitting code.
#[derive(Debug, Clone)]
pub struct MetricsSink {
    name: String,
}

impl MetricsSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SinkAdapter for MetricsSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, level: &Priority, _message: &str) -> Result<(), ContractError> {
        record_message(&self.name, level);
        Ok(())
    }
}
