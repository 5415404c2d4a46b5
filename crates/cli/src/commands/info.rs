//! `info` command implementation.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use channels::{decoration, Decoration};
use contracts::{ChannelConfig, ChannelsBlueprint};

use crate::cli::InfoArgs;
use crate::error::load_blueprint;

const PREVIEW_TEXT: &str = "<message>";
const PREVIEW_TIMESTAMP: &str = "<timestamp>";

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    channels: Vec<ChannelInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
}

#[derive(Serialize)]
struct ChannelInfo {
    topic: String,
    enabled: bool,
    priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decoration: Option<String>,
    /// What a message looks like once rendered
    preview: String,
    /// Empty means the default transmitter (standard error)
    sinks: Vec<String>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    params: HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

/// What one message on `channel` looks like where it lands.
///
/// Unrouted channels write raw text to stderr, so their decoration never
/// shows up in the preview.
fn preview(channel: &ChannelConfig) -> String {
    if channel.sinks.is_empty() {
        return PREVIEW_TEXT.to_string();
    }
    let decoration = channel.decoration.as_ref().map(|template| Decoration {
        template: template.clone(),
        syntax: channel.keyword_syntax,
    });
    decoration::render(
        channel.topic.as_str(),
        decoration.as_ref(),
        channel.context.as_deref(),
        PREVIEW_TEXT,
        || PREVIEW_TIMESTAMP.to_string(),
    )
}

fn build_config_info(blueprint: &ChannelsBlueprint, args: &InfoArgs) -> ConfigInfo {
    let channels = blueprint
        .channels
        .iter()
        .map(|c| ChannelInfo {
            topic: c.topic.to_string(),
            enabled: c.enabled,
            priority: c.priority.clone().unwrap_or_default().to_string(),
            context: c.context.clone(),
            decoration: c.decoration.clone(),
            preview: preview(c),
            sinks: c.sinks.clone(),
        })
        .collect();

    let sinks = if args.sinks {
        blueprint
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
                params: s.params.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        channels,
        sinks,
    }
}

fn print_config_info(blueprint: &ChannelsBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 logrelay Configuration                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Version: {:?}", blueprint.version);

    println!("\n📡 Channels ({})", blueprint.channels.len());
    for (i, channel) in blueprint.channels.iter().enumerate() {
        let is_last = i == blueprint.channels.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let state = if channel.enabled { "" } else { " [suppressed]" };
        println!("   {} {}{}", prefix, channel.topic, state);
        println!(
            "   {}  ├─ Priority: {}",
            child_prefix,
            channel.priority.clone().unwrap_or_default()
        );
        if let Some(ref context) = channel.context {
            println!("   {}  ├─ Context: {}", child_prefix, context);
        }
        println!("   {}  ├─ Preview: {:?}", child_prefix, preview(channel));
        if channel.sinks.is_empty() {
            println!("   {}  └─ Sinks: (stderr)", child_prefix);
        } else {
            println!("   {}  └─ Sinks: {}", child_prefix, channel.sinks.join(", "));
        }
    }

    if !blueprint.sinks.is_empty() {
        println!("\n📤 Sinks ({})", blueprint.sinks.len());
        for (i, sink) in blueprint.sinks.iter().enumerate() {
            let is_last = i == blueprint.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type);

            if args.sinks {
                let mut params: Vec<_> = sink.params.iter().collect();
                params.sort();
                for (key, value) in params {
                    println!("        {} = {}", key, value);
                }
            }
        }
    }

    println!();
}
