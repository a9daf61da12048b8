//! Scoped query/response communicator for terminator-framed instruments.
//!
//! This is the "just works" layer. Wrap a transport in a [`Communicator`],
//! then [`query`](Communicator::query) the instrument: the port is opened if
//! needed, the command written with its terminator, the reply framed and
//! returned, and the port closed again if this call opened it, on every
//! exit path.

pub mod communicator;
pub mod config;
pub mod error;
pub mod guard;
pub mod traits;

pub use communicator::Communicator;
pub use config::CommConfig;
pub use error::{CommError, Result};
pub use guard::PortGuard;
pub use traits::Query;
