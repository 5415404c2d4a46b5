//! DefaultTransmitter - fallback output for topics with no sinks

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Writes raw message text, with nothing appended, to a byte stream.
///
/// The process-wide default targets standard error. Embedders and tests can
/// point it at any writer.
pub struct DefaultTransmitter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl DefaultTransmitter {
    /// Transmitter writing to standard error
    pub fn stderr() -> Self {
        Self::to_writer(io::stderr())
    }

    /// Transmitter writing to an arbitrary writer
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write `text` verbatim and flush.
    pub fn transmit(&self, text: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }
}

impl Default for DefaultTransmitter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for DefaultTransmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTransmitter").finish_non_exhaustive()
    }
}

/// Cloneable in-memory writer for capturing transmitter output
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_is_verbatim() {
        let buffer = CaptureBuffer::new();
        let transmitter = DefaultTransmitter::to_writer(buffer.clone());

        transmitter.transmit("hello").unwrap();
        transmitter.transmit(" world").unwrap();

        assert_eq!(buffer.contents(), "hello world");
    }
}
