//! # Contracts
//!
//! Shared interface contracts for the channel layer: topic identifiers,
//! priority labels, the sink capability, errors, and the configuration
//! blueprint. Every other crate depends on this one, never the reverse.
//!
//! ## Topic model
//! - A topic is `<namespace>` or `<namespace>::<label>`
//! - Topics are plain keys; nothing here owns per-topic state

mod blueprint;
mod error;
mod priority;
mod sink;
mod topic;

pub use blueprint::*;
pub use error::*;
pub use priority::Priority;
pub use sink::*;
pub use topic::{Topic, NAMESPACE_SEPARATOR};
