//! FileSink - appends rendered messages to a file

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use contracts::{ContractError, Priority, SinkAdapter};
use tracing::{debug, error, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file
    pub path: PathBuf,
    /// Keep existing content (default) or truncate on open
    pub append: bool,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| "missing 'path' parameter".to_string())?;

        let append = match params.get("append").map(String::as_str) {
            None | Some("true") => true,
            Some("false") => false,
            Some(other) => return Err(format!("invalid 'append' value '{other}'")),
        };

        Ok(Self { path, append })
    }
}

/// Sink that writes messages verbatim to a file.
///
/// The file stays open until [`close`](Self::close) is called; a closed
/// sink fails validation, so it can no longer be bound, and rejects
/// deliveries from channels it is still bound to.
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    /// Open (and create, with parent directories) the configured file
    #[instrument(name = "file_sink_open", skip(name, config), fields(path = %config.path.display()))]
    pub fn open(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(config.append)
            .truncate(!config.append)
            .open(&config.path)?;

        let name = name.into();
        debug!(sink = %name, "FileSink opened");

        Ok(Self {
            name,
            config,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Self::open(name, config)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.config.path
    }

    /// Flush and release the file. Idempotent.
    #[instrument(name = "file_sink_close", skip(self), fields(sink = %self.name))]
    pub fn close(&self) -> Result<(), ContractError> {
        let writer = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut writer) = writer {
            writer.flush()?;
            debug!(sink = %self.name, "FileSink closed");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl SinkAdapter for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, _level: &Priority, message: &str) -> Result<(), ContractError> {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let writer = guard
            .as_mut()
            .ok_or_else(|| ContractError::sink_closed(&self.name))?;

        writer
            .write_all(message.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                error!(sink = %self.name, error = %e, "Write failed");
                ContractError::sink_delivery(&self.name, e.to_string())
            })
    }

    fn validate(&self) -> Result<(), ContractError> {
        if self.is_closed() {
            return Err(ContractError::sink_closed(&self.name));
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("name", &self.name)
            .field("path", &self.config.path)
            .finish_non_exhaustive()
    }
}
