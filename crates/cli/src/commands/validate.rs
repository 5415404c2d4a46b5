//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ChannelsBlueprint;

use crate::cli::ValidateArgs;
use crate::error::load_blueprint;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    sink_count: usize,
    channel_count: usize,
    suppressed_count: usize,
    routed_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match load_blueprint(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&blueprint)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(blueprint: &ChannelsBlueprint) -> ConfigSummary {
    ConfigSummary {
        version: format!("{:?}", blueprint.version),
        sink_count: blueprint.sinks.len(),
        channel_count: blueprint.channels.len(),
        suppressed_count: blueprint.channels.iter().filter(|c| !c.enabled).count(),
        routed_count: blueprint
            .channels
            .iter()
            .filter(|c| !c.sinks.is_empty())
            .count(),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ChannelsBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    for sink in &blueprint.sinks {
        let referenced = blueprint
            .channels
            .iter()
            .any(|c| c.sinks.iter().any(|name| name == &sink.name));
        if !referenced {
            warnings.push(format!("Sink '{}' is not bound to any channel", sink.name));
        }
    }

    for channel in &blueprint.channels {
        if !channel.enabled && !channel.sinks.is_empty() {
            warnings.push(format!(
                "Channel '{}' is disabled but has sinks bound",
                channel.topic
            ));
        }
        if channel.context.is_some() && channel.decoration.is_none() {
            warnings.push(format!(
                "Channel '{}' sets a context but no decoration to show it",
                channel.topic
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Sinks: {}", summary.sink_count);
            println!("  Channels: {}", summary.channel_count);
            println!("  Suppressed: {}", summary.suppressed_count);
            println!("  Routed: {}", summary.routed_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
