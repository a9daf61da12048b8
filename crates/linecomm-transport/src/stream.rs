use std::io::{Read, Write};

use tracing::{debug, info};

use crate::decode;
use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Adapts any `Read + Write` value to the [`Transport`] capability.
///
/// The underlying stream is always connected; `open` and `close` toggle a
/// logical flag that gates reads and writes. Closing flushes pending output.
pub struct StreamTransport<S> {
    name: String,
    inner: S,
    open: bool,
}

impl<S: Read + Write> StreamTransport<S> {
    /// Wrap a stream. The transport starts closed.
    pub fn new(name: impl Into<String>, inner: S) -> Self {
        Self {
            name: name.into(),
            inner,
            open: false,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<()> {
        self.open = true;
        info!(port = %self.name, "stream opened");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.inner.flush().map_err(|source| TransportError::Close {
            port: self.name.clone(),
            source,
        })?;
        info!(port = %self.name, "stream closed");
        Ok(())
    }

    fn read_char(&mut self) -> Result<char> {
        if !self.open {
            return Err(TransportError::NotOpen(self.name.clone()));
        }
        let c = decode::read_char(&mut self.inner)?;
        debug!(port = %self.name, character = ?c, "read character");
        Ok(c)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        if !self.open {
            return Err(TransportError::NotOpen(self.name.clone()));
        }
        decode::write_all(&mut self.inner, data)
    }
}

impl<S> std::fmt::Debug for StreamTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamTransport")
            .field("name", &self.name)
            .field("open", &self.open)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Reads from one buffer, writes into another.
    struct Duplex {
        rx: Cursor<Vec<u8>>,
        tx: Vec<u8>,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.rx.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.tx.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn duplex(incoming: &str) -> Duplex {
        Duplex {
            rx: Cursor::new(incoming.as_bytes().to_vec()),
            tx: Vec::new(),
        }
    }

    #[test]
    fn starts_closed_and_gates_io() {
        let mut t = StreamTransport::new("dup", duplex("a"));
        assert!(!t.is_open());
        assert!(matches!(t.read_char(), Err(TransportError::NotOpen(_))));

        t.open().unwrap();
        assert_eq!(t.read_char().unwrap(), 'a');
        assert!(matches!(t.read_char(), Err(TransportError::Closed)));
    }

    #[test]
    fn writes_reach_inner_stream() {
        let mut t = StreamTransport::new("dup", duplex(""));
        t.open().unwrap();
        t.write_bytes(b"UNITS?\r\n").unwrap();
        t.close().unwrap();
        assert_eq!(t.into_inner().tx, b"UNITS?\r\n");
    }

    #[test]
    #[cfg(unix)]
    fn works_over_socket_pair() {
        let (left, mut right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut t = StreamTransport::new("pair", left);
        t.open().unwrap();

        right.write_all("1.0e-3\r\n".as_bytes()).unwrap();
        let got: String = (0..8).map(|_| t.read_char().unwrap()).collect();
        assert_eq!(got, "1.0e-3\r\n");

        t.write_bytes(b"ok").unwrap();
        let mut buf = [0u8; 2];
        right.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ok");
    }
}
