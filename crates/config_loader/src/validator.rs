//! Blueprint validation
//!
//! Rules:
//! - sink names non-empty and unique
//! - topics non-empty and unique
//! - every sink a channel references is declared
//! - file sinks carry `path`, udp sinks a parseable `addr`

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{ChannelsBlueprint, ContractError, SinkType};

/// Validate a blueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ChannelsBlueprint) -> Result<(), ContractError> {
    validate_sinks(blueprint)?;
    validate_sink_params(blueprint)?;
    validate_topics(blueprint)?;
    validate_references(blueprint)?;
    Ok(())
}

/// Sink names are non-empty and unique
fn validate_sinks(blueprint: &ChannelsBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// Type-specific parameters are present and well-formed
fn validate_sink_params(blueprint: &ChannelsBlueprint) -> Result<(), ContractError> {
    for sink in &blueprint.sinks {
        match sink.sink_type {
            SinkType::File => {
                if sink.params.get("path").is_none_or(|p| p.is_empty()) {
                    return Err(ContractError::config_validation(
                        format!("sinks[{}].params.path", sink.name),
                        "file sink requires a path",
                    ));
                }
            }
            SinkType::Udp => {
                let addr = sink.params.get("addr").ok_or_else(|| {
                    ContractError::config_validation(
                        format!("sinks[{}].params.addr", sink.name),
                        "udp sink requires an addr",
                    )
                })?;
                if addr.parse::<SocketAddr>().is_err() {
                    return Err(ContractError::config_validation(
                        format!("sinks[{}].params.addr", sink.name),
                        format!("invalid socket address '{addr}'"),
                    ));
                }
                if let Some(raw) = sink.params.get("max_packet_size") {
                    if !matches!(raw.parse::<usize>(), Ok(size) if size > 0) {
                        return Err(ContractError::config_validation(
                            format!("sinks[{}].params.max_packet_size", sink.name),
                            format!("expected a positive integer, got '{raw}'"),
                        ));
                    }
                }
            }
            SinkType::Stderr | SinkType::Tracing => {}
        }
    }
    Ok(())
}

/// Topics are non-empty and each appears once
fn validate_topics(blueprint: &ChannelsBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, channel) in blueprint.channels.iter().enumerate() {
        if channel.topic.is_empty() {
            return Err(ContractError::config_validation(
                format!("channels[{idx}].topic"),
                "topic cannot be empty",
            ));
        }
        if !seen.insert(channel.topic.as_str()) {
            return Err(ContractError::config_validation(
                format!("channels[topic={}]", channel.topic),
                "duplicate topic",
            ));
        }
    }
    Ok(())
}

/// Every referenced sink is declared
fn validate_references(blueprint: &ChannelsBlueprint) -> Result<(), ContractError> {
    let declared: HashSet<_> = blueprint.sinks.iter().map(|s| s.name.as_str()).collect();

    for channel in &blueprint.channels {
        for name in &channel.sinks {
            if !declared.contains(name.as_str()) {
                return Err(ContractError::config_validation(
                    format!("channels[{}].sinks", channel.topic),
                    format!("sink '{name}' is not declared"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_toml;

    fn check(content: &str) -> Result<(), ContractError> {
        validate(&parse_toml(content).unwrap())
    }

    #[test]
    fn test_valid_blueprint() {
        let content = r#"
[[sinks]]
name = "net"
sink_type = "udp"
params = { addr = "127.0.0.1:5140" }

[[channels]]
topic = "app"
sinks = ["net"]
"#;
        assert!(check(content).is_ok());
    }

    #[test]
    fn test_duplicate_sink_name() {
        let content = r#"
[[sinks]]
name = "a"
sink_type = "stderr"

[[sinks]]
name = "a"
sink_type = "tracing"
"#;
        let err = check(content).unwrap_err();
        assert!(err.to_string().contains("duplicate sink name"));
    }

    #[test]
    fn test_empty_sink_name() {
        let content = r#"
[[sinks]]
name = ""
sink_type = "stderr"
"#;
        assert!(check(content).is_err());
    }

    #[test]
    fn test_file_sink_without_path() {
        let content = r#"
[[sinks]]
name = "f"
sink_type = "file"
"#;
        let err = check(content).unwrap_err();
        assert!(err.to_string().contains("path"));
    }

    #[test]
    fn test_udp_sink_bad_addr() {
        let content = r#"
[[sinks]]
name = "u"
sink_type = "udp"
params = { addr = "localhost" }
"#;
        assert!(matches!(
            check(content),
            Err(ContractError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_udp_sink_bad_max_packet_size() {
        let content = r#"
[[sinks]]
name = "u"
sink_type = "udp"
params = { addr = "127.0.0.1:5140", max_packet_size = "abc" }
"#;
        let err = check(content).unwrap_err();
        assert!(err.to_string().contains("max_packet_size"));
    }

    #[test]
    fn test_duplicate_topic() {
        let content = r#"
[[channels]]
topic = "app"

[[channels]]
topic = "app"
enabled = false
"#;
        let err = check(content).unwrap_err();
        assert!(err.to_string().contains("duplicate topic"));
    }

    #[test]
    fn test_undeclared_sink_reference() {
        let content = r#"
[[channels]]
topic = "app"
sinks = ["ghost"]
"#;
        let err = check(content).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
