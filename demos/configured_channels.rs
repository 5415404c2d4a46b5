//! Configured Channels Example
//!
//! Loads a channel blueprint (first argument, or a built-in one), applies it
//! to a registry, emits on every configured topic and publishes the registry
//! counters through the metrics facade.
//!
//! Run with: cargo run -p demos --bin configured_channels [channels.toml]

use channels::{apply_blueprint, ChannelRegistry};
use config_loader::{ConfigFormat, ConfigLoader};
use contracts::ChannelsBlueprint;

const BUILTIN: &str = r#"
[[sinks]]
name = "trace"
sink_type = "tracing"

[[sinks]]
name = "console"
sink_type = "stderr"

[[channels]]
topic = "demo::db"
decoration = "{topic} [{context}] {text}"
keyword_syntax = "braced"
context = "primary"
priority = "warn"
sinks = ["trace"]

[[channels]]
topic = "demo::noisy"
enabled = false

[[channels]]
topic = "demo"
decoration = "timestamp topic: text\n"
sinks = ["console"]
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_tracing(&observability::ObservabilityConfig {
        log_format: observability::LogFormat::Compact,
        metrics_port: None,
        default_log_level: "debug".to_string(),
    })?;

    let blueprint = load_blueprint()?;
    let registry = ChannelRegistry::new();
    apply_blueprint(&registry, &blueprint)?;

    for config in &blueprint.channels {
        let handle = registry.register_channel(config.topic.clone()).into_handle();
        handle.emit(["hello from ", config.topic.as_str()])?;
    }

    observability::record_snapshot(&registry.metrics());
    observability::record_topic_count(registry.topics().len());

    for topic in registry.topics() {
        let settings = registry.describe(&topic);
        tracing::info!(
            topic = %settings.topic,
            enabled = settings.enabled,
            priority = %settings.priority,
            sinks = ?settings.sinks,
            "Channel settings"
        );
    }
    Ok(())
}

fn load_blueprint() -> Result<ChannelsBlueprint, contracts::ContractError> {
    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "Loading channel blueprint");
            ConfigLoader::load_from_path(std::path::Path::new(&path))
        }
        None => ConfigLoader::load_from_str(BUILTIN, ConfigFormat::Toml),
    }
}
