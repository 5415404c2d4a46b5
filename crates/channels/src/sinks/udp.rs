//! UdpSink - fire-and-forget datagram per message

use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use std::sync::{Mutex, PoisonError};

use contracts::{ContractError, Priority, SinkAdapter};
use tracing::{debug, error, instrument, warn};

/// Datagram layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatagramFormat {
    /// Rendered message only
    #[default]
    Raw,
    /// `level: message`
    Labelled,
}

/// Datagram size limit when `max_packet_size` is not given
pub const DEFAULT_MAX_PACKET_SIZE: usize = 65000;

/// Configuration for UdpSink
#[derive(Debug, Clone)]
pub struct UdpSinkConfig {
    /// Target address
    pub addr: SocketAddr,
    /// Datagram layout
    pub format: DatagramFormat,
    /// Max datagram size; longer messages are truncated
    pub max_packet_size: usize,
}

impl UdpSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let addr_str = params
            .get("addr")
            .ok_or_else(|| "missing 'addr' parameter".to_string())?;

        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|e| format!("invalid address '{addr_str}': {e}"))?;

        let format = match params.get("format").map(String::as_str) {
            Some("raw") | None => DatagramFormat::Raw,
            Some("labelled") => DatagramFormat::Labelled,
            Some(other) => return Err(format!("unknown format '{other}'")),
        };

        let max_packet_size = match params.get("max_packet_size") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(format!("invalid max_packet_size '{raw}'")),
            },
            None => DEFAULT_MAX_PACKET_SIZE,
        };

        Ok(Self {
            addr,
            format,
            max_packet_size,
        })
    }
}

/// Sink that sends each message as one UDP datagram
pub struct UdpSink {
    name: String,
    config: UdpSinkConfig,
    socket: Mutex<Option<UdpSocket>>,
}

impl UdpSink {
    /// Bind an ephemeral local port and connect it to the target
    #[instrument(name = "udp_sink_new", skip(name, config), fields(target = %config.addr))]
    pub fn new(name: impl Into<String>, config: UdpSinkConfig) -> std::io::Result<Self> {
        let name = name.into();
        let bind_addr: SocketAddr = if config.addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(config.addr)?;

        debug!(sink = %name, target = %config.addr, "UdpSink connected");

        Ok(Self {
            name,
            config,
            socket: Mutex::new(Some(socket)),
        })
    }

    /// Create from params (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = UdpSinkConfig::from_params(params)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Self::new(name, config)
    }

    /// Release the socket. Later deliveries fail with `SinkClosed`.
    pub fn close(&self) {
        self.socket
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!(sink = %self.name, "UdpSink closed");
    }

    fn payload(&self, level: &Priority, message: &str) -> Vec<u8> {
        let mut data = match self.config.format {
            DatagramFormat::Raw => message.as_bytes().to_vec(),
            DatagramFormat::Labelled => format!("{level}: {message}").into_bytes(),
        };

        if data.len() > self.config.max_packet_size {
            warn!(
                sink = %self.name,
                size = data.len(),
                max = self.config.max_packet_size,
                "Datagram too large, truncating"
            );
            data.truncate(self.config.max_packet_size);
        }
        data
    }
}

impl SinkAdapter for UdpSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, level: &Priority, message: &str) -> Result<(), ContractError> {
        let guard = self.socket.lock().unwrap_or_else(PoisonError::into_inner);
        let socket = guard
            .as_ref()
            .ok_or_else(|| ContractError::sink_closed(&self.name))?;

        let data = self.payload(level, message);
        match socket.send(&data) {
            Ok(sent) => debug!(sink = %self.name, bytes = sent, "Sent"),
            // best-effort
            Err(e) => error!(sink = %self.name, error = %e, "UDP send failed"),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ContractError> {
        let guard = self.socket.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(_) => Ok(()),
            None => Err(ContractError::sink_closed(&self.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_udp_sink_config_parsing() {
        let params = HashMap::from([
            ("addr".to_string(), "127.0.0.1:9999".to_string()),
            ("format".to_string(), "labelled".to_string()),
        ]);

        let config = UdpSinkConfig::from_params(&params).unwrap();
        assert_eq!(config.addr.port(), 9999);
        assert_eq!(config.format, DatagramFormat::Labelled);
        assert_eq!(config.max_packet_size, 65000);
    }

    #[test]
    fn test_udp_sink_config_rejects_bad_addr() {
        let params = HashMap::from([("addr".to_string(), "nowhere".to_string())]);
        assert!(UdpSinkConfig::from_params(&params).is_err());
        assert!(UdpSinkConfig::from_params(&HashMap::new()).is_err());
    }

    #[test]
    fn test_udp_sink_config_rejects_bad_max_packet_size() {
        for raw in ["abc", "0", "-5"] {
            let params = HashMap::from([
                ("addr".to_string(), "127.0.0.1:9999".to_string()),
                ("max_packet_size".to_string(), raw.to_string()),
            ]);
            let err = UdpSinkConfig::from_params(&params).unwrap_err();
            assert!(err.contains("max_packet_size"), "{raw}: {err}");
        }

        let params = HashMap::from([
            ("addr".to_string(), "127.0.0.1:9999".to_string()),
            ("max_packet_size".to_string(), "512".to_string()),
        ]);
        assert_eq!(
            UdpSinkConfig::from_params(&params).unwrap().max_packet_size,
            512
        );
    }

    #[test]
    fn test_udp_sink_delivers_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        let sink = UdpSink::new(
            "test_udp",
            UdpSinkConfig {
                addr: receiver.local_addr().unwrap(),
                format: DatagramFormat::Labelled,
                max_packet_size: 65000,
            },
        )
        .unwrap();
        sink.accept(&Priority::from("warn"), "disk low").unwrap();

        let mut buf = [0u8; 128];
        let len = receiver.recv(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"warn: disk low");
    }

    #[test]
    fn test_udp_sink_truncates_and_closes() {
        let sink = UdpSink::new(
            "tiny",
            UdpSinkConfig {
                addr: "127.0.0.1:19998".parse().unwrap(),
                format: DatagramFormat::Raw,
                max_packet_size: 4,
            },
        )
        .unwrap();
        assert_eq!(sink.payload(&Priority::default(), "abcdefgh"), b"abcd");

        sink.close();
        assert!(sink.validate().is_err());
        assert!(sink.accept(&Priority::default(), "x").is_err());
    }
}
