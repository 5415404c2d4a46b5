//! Priority - severity label attached to every message on a channel

use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form severity label forwarded to sinks.
///
/// Labels are not interpreted by the channel layer; sinks decide what
/// `"warn"` or `"audit"` mean. The default label is `"info"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(String);

impl Priority {
    /// Label used when a channel has no configured priority.
    pub const DEFAULT_LABEL: &'static str = "info";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(Self::DEFAULT_LABEL.to_string())
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Priority {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Priority {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
