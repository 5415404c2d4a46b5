//! StderrSink - `level: message` lines on standard error

use std::io::{self, Write};

use contracts::{ContractError, Priority, SinkAdapter};

/// Sink that writes `level: message` to standard error.
///
/// Unlike the default transmitter this sink sees the rendered message and
/// the priority label.
#[derive(Debug, Clone)]
pub struct StderrSink {
    name: String,
}

impl StderrSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SinkAdapter for StderrSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, level: &Priority, message: &str) -> Result<(), ContractError> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{level}: {message}")?;
        stderr.flush()?;
        Ok(())
    }
}
