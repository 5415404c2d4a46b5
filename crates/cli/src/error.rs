//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration failed to load or validate
    #[error("Failed to load configuration: {0}")]
    Config(#[from] contracts::ContractError),

    /// Blueprint could not be applied to the registry
    #[error("Failed to apply configuration: {0}")]
    Apply(#[from] channels::ChannelError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Load a blueprint, turning a missing file into a dedicated error
pub fn load_blueprint(path: &Path) -> Result<contracts::ChannelsBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path));
    }
    Ok(config_loader::ConfigLoader::load_from_path(path)?)
}
