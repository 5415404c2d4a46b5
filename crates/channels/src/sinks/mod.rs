//! Sink implementations
//!
//! Contains StderrSink, FileSink, TracingSink, UdpSink, and MemorySink.

mod file;
mod memory;
mod stderr;
mod tracing_sink;
mod udp;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::memory::MemorySink;
pub use self::stderr::StderrSink;
pub use self::tracing_sink::TracingSink;
pub use self::udp::{DatagramFormat, UdpSink, UdpSinkConfig};
