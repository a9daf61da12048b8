use bytes::BytesMut;
use linecomm_frame::{encode_message, ConfigError, FrameError, MessageChars, Terminator};
use linecomm_transport::{Transport, TransportError};
use tracing::{debug, info};

use crate::config::CommConfig;
use crate::error::Result;
use crate::guard::PortGuard;
use crate::traits::Query;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Query/response communicator over a character transport.
///
/// Owns the termination sequence and sequences open/close around I/O. The
/// open state is never cached: every decision asks the transport, so a port
/// opened or closed by someone else between calls is handled correctly.
///
/// A `Communicator` serves one caller at a time. Every operation takes
/// `&mut self`, so overlapping queries cannot be expressed.
pub struct Communicator<T: Transport> {
    transport: T,
    port: String,
    terminator: Terminator,
    buf: BytesMut,
}

impl<T: Transport> Communicator<T> {
    /// Create a communicator with the default `"\r\n"` terminator.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, CommConfig::default())
    }

    /// Create a communicator with explicit configuration.
    pub fn with_config(transport: T, config: CommConfig) -> Self {
        Self {
            port: transport.port_name().to_string(),
            transport,
            terminator: config.terminator,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// The endpoint name, fixed at construction.
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn terminator(&self) -> &Terminator {
        &self.terminator
    }

    /// Replace the termination sequence for subsequent reads and writes.
    pub fn set_terminator(&mut self, terminator: Terminator) {
        self.terminator = terminator;
    }

    /// Replace the termination sequence from its literal characters.
    ///
    /// An empty sequence is rejected and the current one kept.
    pub fn set_terminator_str(&mut self, text: &str) -> std::result::Result<(), ConfigError> {
        self.terminator = Terminator::new(text)?;
        Ok(())
    }

    /// Live open state of the transport.
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Open the port unless it is already open.
    pub fn open(&mut self) -> std::result::Result<(), TransportError> {
        if self.transport.is_open() {
            return Ok(());
        }
        self.transport.open()
    }

    /// Close the port unless it is already closed.
    pub fn close(&mut self) -> std::result::Result<(), TransportError> {
        if !self.transport.is_open() {
            return Ok(());
        }
        self.transport.close()
    }

    /// Read a single character (blocking).
    pub fn read(&mut self) -> std::result::Result<char, TransportError> {
        self.transport.read_char()
    }

    /// Write one message; the terminator is appended here.
    pub fn write(&mut self, message: &str) -> std::result::Result<(), TransportError> {
        self.buf.clear();
        encode_message(message, &self.terminator, &mut self.buf);
        self.transport.write_bytes(&self.buf)?;
        info!(port = %self.port, command = message, "wrote message");
        Ok(())
    }

    /// The body of the next message as a lazy character sequence.
    ///
    /// The terminator cannot change while the sequence is alive: it borrows
    /// the communicator mutably.
    pub fn message(&mut self) -> MessageChars<'_, T> {
        MessageChars::new(&mut self.transport, &self.terminator)
    }

    /// Read the next message body, terminator stripped.
    pub fn read_message(&mut self) -> std::result::Result<String, FrameError> {
        let body = linecomm_frame::read_message(&mut self.transport, &self.terminator)?;
        info!(port = %self.port, reply = %body, "read message");
        Ok(body)
    }

    /// Hold the port open for several operations.
    ///
    /// See [`PortGuard`] for the release rules.
    pub fn session(&mut self) -> std::result::Result<PortGuard<'_, T>, TransportError> {
        PortGuard::acquire(self)
    }

    /// Write `message` and return the reply body.
    ///
    /// Opens the port if it is closed and, in that case only, closes it
    /// again before returning. If the write or read fails, the port is still
    /// closed and the original error returned; a close failure at that point
    /// is logged. On success a close failure is returned.
    pub fn query(&mut self, message: &str) -> Result<String> {
        debug!(port = %self.port, command = message, "query");
        let mut guard = self.session()?;
        let reply: Result<String> = match guard.write(message) {
            Ok(()) => guard.read_message().map_err(Into::into),
            Err(err) => Err(err.into()),
        };

        match reply {
            Ok(body) => {
                guard.finish()?;
                Ok(body)
            }
            // Dropping the guard closes the port.
            Err(err) => Err(err),
        }
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the communicator and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: Transport> Query for Communicator<T> {
    fn query(&mut self, message: &str) -> Result<String> {
        Communicator::query(self, message)
    }
}

impl<T: Transport> std::fmt::Debug for Communicator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Communicator")
            .field("port", &self.port)
            .field("terminator", &format_args!("{}", self.terminator))
            .finish()
    }
}
