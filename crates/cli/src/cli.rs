//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// logrelay - route named log channels to configurable sinks
#[derive(Parser, Debug)]
#[command(
    name = "logrelay",
    author,
    version,
    about = "Inspect channel configuration and emit messages through it",
    long_about = "Loads a channel blueprint (TOML or JSON), validates it, and emits \n\
                  messages on a topic exactly as an embedding application would: \n\
                  suppressed topics stay silent, routed topics go to their sinks, \n\
                  everything else lands on standard error."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOGRELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all diagnostics except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "LOGRELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit a message on a topic
    Emit(EmitArgs),

    /// Validate configuration file without emitting
    Validate(ValidateArgs),

    /// Display configured channels and sinks
    Info(InfoArgs),
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Channel blueprint (TOML or JSON); without one every topic falls back
    /// to standard error
    #[arg(short, long, env = "LOGRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Topic to emit on, e.g. `app::db`
    #[arg(short, long)]
    pub topic: String,

    /// Override the topic's priority label
    #[arg(long)]
    pub priority: Option<String>,

    /// Do not append a newline to each message
    #[arg(short = 'n', long)]
    pub no_newline: bool,

    /// Message words, joined with single spaces; reads stdin lines when absent
    pub message: Vec<String>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "channels.toml", env = "LOGRELAY_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "channels.toml", env = "LOGRELAY_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show sink parameters
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_emit() {
        let cli = Cli::try_parse_from([
            "logrelay", "-v", "emit", "--topic", "app::db", "pool", "ready",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Emit(args) => {
                assert_eq!(args.topic, "app::db");
                assert_eq!(args.message, vec!["pool", "ready"]);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
