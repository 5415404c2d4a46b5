//! ChannelsBlueprint - Config Loader output
//!
//! Declarative description of sinks and per-channel settings, applied to a
//! registry at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Priority, Topic};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete channel configuration blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Sink definitions, referenced by name from channels
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,

    /// Per-topic settings
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl ChannelsBlueprint {
    /// Look up a sink definition by name
    pub fn sink(&self, name: &str) -> Option<&SinkConfig> {
        self.sinks.iter().find(|s| s.name == name)
    }
}

/// Settings for one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Full topic, e.g. `"app::db"`
    pub topic: Topic,

    /// `false` suppresses the topic
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Decoration template
    #[serde(default)]
    pub decoration: Option<String>,

    /// How keywords are spelled in `decoration`
    #[serde(default)]
    pub keyword_syntax: KeywordSyntax,

    /// Priority label forwarded to sinks
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Context string substituted into the decoration
    #[serde(default)]
    pub context: Option<String>,

    /// Names of sinks to bind, in delivery order
    #[serde(default)]
    pub sinks: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// Keyword spelling inside decoration templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSyntax {
    /// Bare words: `topic`, `timestamp`, `context`, `text`.
    /// Matched as plain substrings, so `topical` also matches.
    #[default]
    Bare,
    /// Braced words: `{topic}`, `{timestamp}`, `{context}`, `{text}`
    Braced,
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// `level: message` on standard error
    Stderr,
    /// Append to a file
    File,
    /// Forward into `tracing`
    Tracing,
    /// UDP datagrams
    Udp,
}
