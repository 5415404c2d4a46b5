//! TracingSink - forwards channel messages into `tracing`

use contracts::{ContractError, Priority, SinkAdapter};
use tracing::{debug, error, info, trace, warn};

/// Sink that re-emits messages as `tracing` events.
///
/// Priority labels map onto tracing levels by name (`warning` and
/// `critical` are accepted as aliases); unknown labels are logged at info
/// with the label attached.
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    /// Create a new TracingSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SinkAdapter for TracingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, level: &Priority, message: &str) -> Result<(), ContractError> {
        let message = message.trim_end_matches('\n');
        match level.as_str().to_ascii_lowercase().as_str() {
            "trace" => trace!(sink = %self.name, "{message}"),
            "debug" => debug!(sink = %self.name, "{message}"),
            "info" => info!(sink = %self.name, "{message}"),
            "warn" | "warning" => warn!(sink = %self.name, "{message}"),
            "error" | "critical" => error!(sink = %self.name, "{message}"),
            _ => info!(sink = %self.name, priority = %level, "{message}"),
        }
        Ok(())
    }
}
