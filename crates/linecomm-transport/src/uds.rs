use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::SocketConfig;
use crate::decode;
use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Client side of a Unix domain socket, used as an instrument port.
///
/// Nothing is connected until [`open`](Transport::open); [`close`](Transport::close)
/// shuts the stream down and drops it. Instrument simulators and serial
/// multiplexers commonly expose this kind of endpoint.
pub struct UnixSocketTransport {
    path: PathBuf,
    name: String,
    config: SocketConfig,
    stream: Option<UnixStream>,
}

impl UnixSocketTransport {
    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(target_os = "macos")]
    const MAX_PATH_LEN: usize = 104;
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    const MAX_PATH_LEN: usize = 104;

    /// Create a closed transport for the socket at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, SocketConfig::default())
    }

    /// Create a closed transport with explicit timeouts.
    pub fn with_config(path: impl AsRef<Path>, config: SocketConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        Ok(Self {
            name: path.display().to_string(),
            path,
            config,
            stream: None,
        })
    }

    /// The socket path this transport connects to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    fn stream_mut(&mut self) -> Result<&mut UnixStream> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream),
            None => Err(TransportError::NotOpen(self.name.clone())),
        }
    }
}

impl Transport for UnixSocketTransport {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<()> {
        let open_err = |source| TransportError::Open {
            port: self.name.clone(),
            source,
        };
        let stream = UnixStream::connect(&self.path).map_err(open_err)?;
        stream
            .set_read_timeout(self.config.read_timeout)
            .map_err(open_err)?;
        stream
            .set_write_timeout(self.config.write_timeout)
            .map_err(open_err)?;

        info!(path = ?self.path, "connected to instrument socket");
        self.stream = Some(stream);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            match stream.shutdown(Shutdown::Both) {
                Ok(()) => {}
                // The peer may already be gone; the handle is dropped either way.
                Err(err) if err.kind() == std::io::ErrorKind::NotConnected => {}
                Err(source) => {
                    return Err(TransportError::Close {
                        port: self.name.clone(),
                        source,
                    })
                }
            }
            info!(path = ?self.path, "disconnected from instrument socket");
        }
        Ok(())
    }

    fn read_char(&mut self) -> Result<char> {
        let c = decode::read_char(self.stream_mut()?)?;
        debug!(path = ?self.path, character = ?c, "read character");
        Ok(c)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        decode::write_all(self.stream_mut()?, data)
    }
}

impl std::fmt::Debug for UnixSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnixSocketTransport")
            .field("path", &self.path)
            .field("open", &self.stream.is_some())
            .finish()
    }
}
