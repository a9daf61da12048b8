use std::path::PathBuf;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the named port.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: std::io::Error,
    },

    /// Failed to close the named port.
    #[error("failed to close {port}: {source}")]
    Close {
        port: String,
        source: std::io::Error,
    },

    /// A read or write was attempted on a port that is not open.
    #[error("port {0} is not open")]
    NotOpen(String),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The adapter's read timeout elapsed before a character arrived.
    #[error("timed out waiting for a character")]
    Timeout,

    /// The peer closed the stream (end of input).
    #[error("transport closed (end of stream)")]
    Closed,

    /// The bytes on the wire do not form a UTF-8 character.
    #[error("invalid UTF-8 sequence on the wire: {bytes:02x?}")]
    InvalidUtf8 { bytes: Vec<u8> },

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// A port setting is not understood or not supported by the adapter.
    #[error("unsupported port setting: {0}")]
    Unsupported(String),
}

impl TransportError {
    /// Returns true if this error is a read timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
