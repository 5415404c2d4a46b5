//! # Channels
//!
//! Channel registry and message pipeline.
//!
//! Responsibilities:
//! - Hold per-topic suppression, decoration, priority, context and routing
//! - Build channel handles bound to one topic
//! - Render decorations and fan messages out to bound sinks
//! - Fall back to standard error when a topic has no sinks
//!
//! # Example
//!
//! ```
//! use channels::{emit, ChannelRegistry, MemorySink, SinkRef};
//! use std::sync::Arc;
//!
//! let registry = ChannelRegistry::new();
//! let db = registry.create_channel("app", Some("db"));
//!
//! let memory = Arc::new(MemorySink::new("memory"));
//! registry.set_decoration("app::db", "topic: text\n");
//! registry.bind_sinks("app::db", [SinkRef::Adapter(memory.clone())]).unwrap();
//!
//! emit!(db, "pool size ", 8).unwrap();
//! assert_eq!(memory.messages(), vec!["app::db: pool size 8\n".to_string()]);
//! ```

pub mod configure;
pub mod decoration;
pub mod error;
pub mod handle;
mod macros;
pub mod metrics;
pub mod registry;
pub mod sinks;
pub mod transmitter;

pub use configure::{apply_blueprint, create_sink};
pub use contracts::{
    ContractError, DuplicateChannelWarning, KeywordSyntax, Priority, SharedSink, SinkAdapter,
    Topic,
};
pub use decoration::{render, Decoration};
pub use error::ChannelError;
pub use handle::ChannelHandle;
pub use metrics::{ChannelMetrics, MetricsSnapshot};
pub use registry::{
    ChannelRegistry, ChannelSettings, Clock, Registration, RegistryBuilder, SinkRef,
};
pub use sinks::{FileSink, MemorySink, StderrSink, TracingSink, UdpSink};
pub use transmitter::{CaptureBuffer, DefaultTransmitter};
