//! Apply a ChannelsBlueprint to a registry

use std::sync::Arc;

use tracing::{info, instrument};

use contracts::{ChannelConfig, ChannelsBlueprint, SharedSink, SinkConfig, SinkType};

use crate::decoration::Decoration;
use crate::error::ChannelError;
use crate::registry::ChannelRegistry;
use crate::sinks::{FileSink, StderrSink, TracingSink, UdpSink};

/// Create a sink from configuration
#[instrument(
    name = "channels_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(config: &SinkConfig) -> Result<SharedSink, ChannelError> {
    let sink: SharedSink = match config.sink_type {
        SinkType::Stderr => Arc::new(StderrSink::new(&config.name)),
        SinkType::Tracing => Arc::new(TracingSink::new(&config.name)),
        SinkType::File => Arc::new(
            FileSink::from_params(&config.name, &config.params)
                .map_err(|e| ChannelError::sink_creation(&config.name, e.to_string()))?,
        ),
        SinkType::Udp => Arc::new(
            UdpSink::from_params(&config.name, &config.params)
                .map_err(|e| ChannelError::sink_creation(&config.name, e.to_string()))?,
        ),
    };
    Ok(sink)
}

/// Build every sink of `blueprint`, add them to the registry's catalogue,
/// then apply each channel's settings in file order.
///
/// All sinks are created before any channel is touched, so a sink that
/// fails to open leaves the registry's channel settings unchanged.
#[instrument(
    name = "channels_apply_blueprint",
    skip(registry, blueprint),
    fields(sinks = blueprint.sinks.len(), channels = blueprint.channels.len())
)]
pub fn apply_blueprint(
    registry: &ChannelRegistry,
    blueprint: &ChannelsBlueprint,
) -> Result<(), ChannelError> {
    let sinks = blueprint
        .sinks
        .iter()
        .map(create_sink)
        .collect::<Result<Vec<_>, _>>()?;
    for sink in sinks {
        registry.register_sink(sink);
    }

    for channel in &blueprint.channels {
        apply_channel(registry, channel)?;
    }

    info!("Channel blueprint applied");
    Ok(())
}

fn apply_channel(registry: &ChannelRegistry, config: &ChannelConfig) -> Result<(), ChannelError> {
    let topic = &config.topic;

    if config.enabled {
        registry.enable(topic);
    } else {
        registry.disable(topic);
    }
    if let Some(template) = &config.decoration {
        registry.set_decoration(
            topic,
            Decoration {
                template: template.clone(),
                syntax: config.keyword_syntax,
            },
        );
    }
    if let Some(context) = &config.context {
        registry.set_context(topic, context.clone());
    }
    if let Some(priority) = &config.priority {
        registry.set_priority(topic, priority.clone());
    }
    if !config.sinks.is_empty() {
        registry.bind_sinks(topic, config.sinks.iter().map(String::as_str))?;
    }
    Ok(())
}
