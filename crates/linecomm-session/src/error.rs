use linecomm_frame::{ConfigError, FrameError};
use linecomm_transport::TransportError;

/// Errors that can occur in communicator operations.
#[derive(Debug, thiserror::Error)]
pub enum CommError {
    /// Transport-level error, exactly as the adapter reported it.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply could not be framed (stream ended before the terminator).
    #[error("frame error: {0}")]
    Frame(FrameError),

    /// Invalid communicator configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CommError {
    /// Returns true if the underlying transport timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommError::Transport(err) if err.is_timeout())
    }
}

impl From<FrameError> for CommError {
    fn from(err: FrameError) -> Self {
        // Keep the original category visible instead of nesting it.
        match err {
            FrameError::Transport(err) => CommError::Transport(err),
            FrameError::Config(err) => CommError::Config(err),
            other => CommError::Frame(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CommError>;
