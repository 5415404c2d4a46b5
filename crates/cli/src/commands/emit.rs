//! `emit` command implementation.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use tracing::{debug, info};

use channels::{apply_blueprint, ChannelHandle, ChannelRegistry};

use crate::cli::EmitArgs;
use crate::error::{load_blueprint, CliError};

/// Execute the `emit` command
pub fn run_emit(args: &EmitArgs) -> Result<()> {
    let registry = build_registry(args)?;

    let registration = registry.register_channel(args.topic.as_str());
    let handle = registration.into_handle();
    if !handle.is_enabled() {
        debug!(topic = %handle.topic(), "Topic is suppressed, messages will be dropped");
    }

    let sent = if args.message.is_empty() {
        let stdin = io::stdin();
        emit_lines(&handle, stdin.lock().lines(), !args.no_newline)?
    } else {
        emit_lines(
            &handle,
            std::iter::once(Ok(args.message.join(" "))),
            !args.no_newline,
        )?
    };

    let metrics = registry.metrics();
    info!(
        topic = %handle.topic(),
        sent,
        routed = metrics.routed,
        fallback = metrics.fallback,
        suppressed = metrics.suppressed,
        "Emit finished"
    );
    Ok(())
}

fn build_registry(args: &EmitArgs) -> Result<ChannelRegistry, CliError> {
    let registry = ChannelRegistry::new();

    if let Some(ref path) = args.config {
        let blueprint = load_blueprint(path)?;
        apply_blueprint(&registry, &blueprint)?;
        info!(config = %path.display(), "Configuration applied");
    }
    if let Some(ref priority) = args.priority {
        registry.set_priority(args.topic.as_str(), priority.as_str());
    }

    Ok(registry)
}

/// Send each line through `handle`, returning how many were sent.
fn emit_lines<I>(handle: &ChannelHandle, lines: I, newline: bool) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut sent = 0;
    for line in lines {
        let mut text = line.context("Failed to read message")?;
        if newline {
            text.push('\n');
        }
        handle
            .send(&text)
            .with_context(|| format!("Failed to emit on '{}'", handle.topic()))?;
        sent += 1;
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use channels::{MemorySink, SinkRef};
    use std::io::Write;
    use std::sync::Arc;

    fn memory_channel() -> (ChannelHandle, Arc<MemorySink>) {
        let registry = ChannelRegistry::new();
        let memory = Arc::new(MemorySink::new("memory"));
        registry
            .bind_sinks("cli", [SinkRef::Adapter(memory.clone())])
            .unwrap();
        (registry.create_channel("cli", None), memory)
    }

    #[test]
    fn test_emit_lines_appends_newline() {
        let (handle, memory) = memory_channel();
        let lines = vec![Ok("one".to_string()), Ok("two".to_string())];

        assert_eq!(emit_lines(&handle, lines, true).unwrap(), 2);
        assert_eq!(memory.messages(), vec!["one\n", "two\n"]);
    }

    #[test]
    fn test_emit_lines_without_newline() {
        let (handle, memory) = memory_channel();
        emit_lines(&handle, vec![Ok("raw".to_string())], false).unwrap();
        assert_eq!(memory.messages(), vec!["raw"]);
    }

    #[test]
    fn test_read_error_stops_emission() {
        let (handle, memory) = memory_channel();
        let lines = vec![
            Ok("first".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8")),
            Ok("never".to_string()),
        ];

        assert!(emit_lines(&handle, lines, true).is_err());
        assert_eq!(memory.messages(), vec!["first\n"]);
    }

    #[test]
    fn test_build_registry_applies_config_and_priority() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br#"
[[channels]]
topic = "app::noisy"
enabled = false
"#,
        )
        .unwrap();

        let args = EmitArgs {
            config: Some(file.path().to_path_buf()),
            topic: "app::db".to_string(),
            priority: Some("error".to_string()),
            no_newline: false,
            message: Vec::new(),
        };
        let registry = build_registry(&args).unwrap();

        assert!(!registry.is_enabled("app::noisy"));
        assert_eq!(registry.priority("app::db"), "error");
    }

    #[test]
    fn test_build_registry_missing_config() {
        let args = EmitArgs {
            config: Some("/nonexistent/channels.toml".into()),
            topic: "app".to_string(),
            priority: None,
            no_newline: false,
            message: Vec::new(),
        };
        assert!(matches!(
            build_registry(&args),
            Err(CliError::ConfigNotFound { .. })
        ));
    }
}
