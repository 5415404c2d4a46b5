//! Channel layer error types

use thiserror::Error;

/// Errors raised while wiring a registry from configuration
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Routing or validation error (from contract)
    #[error("channel error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl ChannelError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
