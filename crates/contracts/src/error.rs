//! Layered error definitions
//!
//! Categorized by source: config / routing / sink delivery / io

use std::fmt;

use thiserror::Error;

use crate::Topic;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Routing Errors =====
    /// A candidate sink cannot be bound; nothing from the call was installed
    #[error("invalid sink '{sink}' for topic '{topic}': {reason}")]
    InvalidSink {
        topic: Topic,
        sink: String,
        reason: String,
    },

    // ===== Sink Errors =====
    /// Sink failed to deliver a message
    #[error("sink '{sink_name}' delivery error: {message}")]
    SinkDelivery { sink_name: String, message: String },

    /// Sink is closed and no longer accepts messages
    #[error("sink '{sink_name}' is closed")]
    SinkClosed { sink_name: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invalid sink error
    pub fn invalid_sink(
        topic: impl Into<Topic>,
        sink: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSink {
            topic: topic.into(),
            sink: sink.into(),
            reason: reason.into(),
        }
    }

    /// Create sink delivery error
    pub fn sink_delivery(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkDelivery {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create sink closed error
    pub fn sink_closed(sink_name: impl Into<String>) -> Self {
        Self::SinkClosed {
            sink_name: sink_name.into(),
        }
    }
}

/// Non-fatal notice that a topic already had a live handle.
///
/// Registration still proceeds and the new handle replaces the old entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateChannelWarning {
    pub topic: Topic,
}

impl fmt::Display for DuplicateChannelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel '{}' already registered, overwriting", self.topic)
    }
}
