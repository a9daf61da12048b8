use linecomm_transport::TransportError;

/// Invalid framing configuration, rejected before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A termination sequence must contain at least one character.
    #[error("termination sequence must not be empty")]
    EmptyTerminator,

    /// An escaped terminator string could not be decoded.
    #[error("invalid escape in terminator {input:?}: {reason}")]
    InvalidEscape { input: String, reason: String },
}

/// Errors that can occur while framing a message.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended before the termination sequence was seen.
    ///
    /// `received` holds every character of the unfinished message: those
    /// already yielded by [`MessageChars`](crate::MessageChars) followed by
    /// the lookahead window.
    #[error("stream ended before termination sequence (received {received:?})")]
    Incomplete { received: String },

    /// The framing configuration is invalid.
    #[error("framing configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The transport failed while a message was being read.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FrameError {
    /// Returns true if the underlying transport timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FrameError::Transport(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
