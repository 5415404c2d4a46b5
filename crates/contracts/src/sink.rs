//! SinkAdapter trait - the one capability a destination must offer
//!
//! The channel layer renders a message and hands it to every sink bound to
//! the channel. Sinks are owned by whoever constructed them; the registry
//! only keeps shared references.

use std::sync::Arc;

use crate::{ContractError, Priority};

/// Output destination for channel messages.
///
/// All sink implementations must implement this trait. Methods take `&self`
/// so one sink can be bound to several channels at once; implementations
/// that write use interior mutability.
pub trait SinkAdapter: Send + Sync {
    /// Sink name (used for diagnostics and the sink catalogue)
    fn name(&self) -> &str;

    /// Accept one rendered message at the channel's priority.
    ///
    /// # Errors
    /// Whatever the destination reports. The error reaches the emitting
    /// caller as-is.
    fn accept(&self, level: &Priority, message: &str) -> Result<(), ContractError>;

    /// Report whether the sink can currently accept messages.
    ///
    /// Checked for every sink before a binding is installed.
    fn validate(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Shared, type-erased sink reference as stored in routing tables.
pub type SharedSink = Arc<dyn SinkAdapter>;
