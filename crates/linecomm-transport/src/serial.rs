//! RS-232 adapter over the `serialport` crate.
//!
//! Line settings are kept as [`SerialConfig`] and translated to the driver's
//! constants through the lookup tables below at the moment a port is opened.

use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::config::{DataBits, Parity, SerialConfig, StopBits};
use crate::decode;
use crate::error::{Result, TransportError};
use crate::traits::Transport;

const DATA_BITS_TABLE: [(DataBits, serialport::DataBits); 4] = [
    (DataBits::Five, serialport::DataBits::Five),
    (DataBits::Six, serialport::DataBits::Six),
    (DataBits::Seven, serialport::DataBits::Seven),
    (DataBits::Eight, serialport::DataBits::Eight),
];

// serialport has no 1.5 stop bit setting.
const STOP_BITS_TABLE: [(StopBits, serialport::StopBits); 2] = [
    (StopBits::One, serialport::StopBits::One),
    (StopBits::Two, serialport::StopBits::Two),
];

const PARITY_TABLE: [(Parity, serialport::Parity); 3] = [
    (Parity::None, serialport::Parity::None),
    (Parity::Odd, serialport::Parity::Odd),
    (Parity::Even, serialport::Parity::Even),
];

fn to_driver<A: PartialEq + Copy, B: Copy>(table: &[(A, B)], value: A) -> Option<B> {
    table.iter().find(|(ours, _)| *ours == value).map(|(_, theirs)| *theirs)
}

fn from_driver<A: Copy, B: PartialEq + Copy>(table: &[(A, B)], value: B) -> Option<A> {
    table.iter().find(|(_, theirs)| *theirs == value).map(|(ours, _)| *ours)
}

impl From<DataBits> for serialport::DataBits {
    fn from(value: DataBits) -> Self {
        // DATA_BITS_TABLE covers every variant.
        to_driver(&DATA_BITS_TABLE, value).unwrap_or(serialport::DataBits::Eight)
    }
}

impl From<serialport::DataBits> for DataBits {
    fn from(value: serialport::DataBits) -> Self {
        from_driver(&DATA_BITS_TABLE, value).unwrap_or(DataBits::Eight)
    }
}

impl TryFrom<StopBits> for serialport::StopBits {
    type Error = TransportError;

    fn try_from(value: StopBits) -> Result<Self> {
        to_driver(&STOP_BITS_TABLE, value).ok_or_else(|| {
            TransportError::Unsupported(format!("{value} stop bits not supported by driver"))
        })
    }
}

impl From<serialport::StopBits> for StopBits {
    fn from(value: serialport::StopBits) -> Self {
        from_driver(&STOP_BITS_TABLE, value).unwrap_or(StopBits::One)
    }
}

impl From<Parity> for serialport::Parity {
    fn from(value: Parity) -> Self {
        to_driver(&PARITY_TABLE, value).unwrap_or(serialport::Parity::None)
    }
}

impl From<serialport::Parity> for Parity {
    fn from(value: serialport::Parity) -> Self {
        from_driver(&PARITY_TABLE, value).unwrap_or(Parity::None)
    }
}

/// A serial port opened on demand.
///
/// The OS handle exists only between [`open`](Transport::open) and
/// [`close`](Transport::close); settings changed while open are applied
/// to the live handle immediately.
pub struct SerialTransport {
    path: String,
    config: SerialConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Create a closed transport for `path` (e.g. `/dev/ttyUSB0`, `COM1`).
    pub fn new(path: impl Into<String>, config: SerialConfig) -> Self {
        Self {
            path: path.into(),
            config,
            port: None,
        }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }

    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        if let Some(port) = self.port.as_mut() {
            port.set_baud_rate(baud_rate)
                .map_err(|err| TransportError::Io(err.into()))?;
        }
        self.config.baud_rate = baud_rate;
        Ok(())
    }

    /// Per-character read timeout.
    pub fn read_timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        if let Some(port) = self.port.as_mut() {
            port.set_timeout(timeout)
                .map_err(|err| TransportError::Io(err.into()))?;
        }
        self.config.timeout = timeout;
        Ok(())
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        match self.port.as_mut() {
            Some(port) => Ok(port),
            None => Err(TransportError::NotOpen(self.path.clone())),
        }
    }
}

impl Transport for SerialTransport {
    fn port_name(&self) -> &str {
        &self.path
    }

    fn open(&mut self) -> Result<()> {
        let stop_bits = serialport::StopBits::try_from(self.config.stop_bits)?;
        let port = serialport::new(&self.path, self.config.baud_rate)
            .data_bits(self.config.data_bits.into())
            .stop_bits(stop_bits)
            .parity(self.config.parity.into())
            .timeout(self.config.timeout)
            .open()
            .map_err(|err| TransportError::Open {
                port: self.path.clone(),
                source: err.into(),
            })?;

        info!(
            port = %self.path,
            baud = self.config.baud_rate,
            data_bits = %self.config.data_bits,
            stop_bits = %self.config.stop_bits,
            parity = %self.config.parity,
            "opened serial port"
        );
        self.port = Some(port);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            port.flush().map_err(|source| TransportError::Close {
                port: self.path.clone(),
                source,
            })?;
            info!(port = %self.path, "closed serial port");
        }
        Ok(())
    }

    fn read_char(&mut self) -> Result<char> {
        let port = self.port_mut()?;
        let c = decode::read_char(port.as_mut())?;
        debug!(port = %self.path, character = ?c, "read character");
        Ok(c)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port_mut()?;
        decode::write_all(port.as_mut(), data)
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("open", &self.port.is_some())
            .finish()
    }
}

/// Names of the serial ports visible to the system.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(|err| TransportError::Io(err.into()))?;
    Ok(ports.into_iter().map(|info| info.port_name).collect())
}
