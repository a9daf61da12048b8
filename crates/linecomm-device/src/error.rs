use linecomm_session::CommError;

/// Errors that can occur while talking to an instrument.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The query round trip failed.
    #[error("communication error: {0}")]
    Comm(#[from] CommError),

    /// The reply did not have the expected shape.
    #[error("could not parse reply to {command}: {reply:?}")]
    Parse { command: String, reply: String },

    /// The instrument reported an infinite or NaN reading.
    #[error("instrument returned non-finite value {value} for {command}")]
    NotFinite { command: String, value: f64 },

    /// The argument cannot be sent as part of a command.
    #[error("invalid argument {0:?}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
