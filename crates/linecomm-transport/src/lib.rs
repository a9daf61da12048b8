//! Character transport capability for line-oriented instruments.
//!
//! Provides the minimal I/O boundary the communicator is written against:
//! - [`Transport`]: open, close, live is-open check, read one character, write bytes
//! - [`SerialTransport`]: RS-232 adapter over the `serialport` crate (behind `serial`)
//! - [`UnixSocketTransport`]: client side of a Unix domain socket (Linux/macOS)
//! - [`StreamTransport`]: any `Read + Write` value
//! - [`ScriptedTransport`]: in-memory fake for tests and simulations
//!
//! This is the lowest layer of linecomm. Everything else builds on top of
//! the [`Transport`] trait provided here.

pub mod config;
pub mod decode;
pub mod error;
pub mod scripted;
pub mod stream;
pub mod traits;

#[cfg(feature = "serial")]
pub mod serial;

#[cfg(unix)]
pub mod uds;

pub use config::{DataBits, Parity, SerialConfig, SocketConfig, StopBits};
pub use error::{Result, TransportError};
pub use scripted::{Fault, ScriptedTransport};
pub use stream::StreamTransport;
pub use traits::Transport;

#[cfg(feature = "serial")]
pub use serial::{available_ports, SerialTransport};

#[cfg(unix)]
pub use uds::UnixSocketTransport;
