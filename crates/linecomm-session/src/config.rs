use linecomm_frame::{ConfigError, Terminator};

/// Configuration for a [`Communicator`](crate::Communicator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommConfig {
    /// Sequence that ends every message in both directions. Default: `"\r\n"`.
    pub terminator: Terminator,
}

impl CommConfig {
    /// Configuration with a literal terminator.
    pub fn with_terminator(text: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            terminator: Terminator::new(text)?,
        })
    }
}
