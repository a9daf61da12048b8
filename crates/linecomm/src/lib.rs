//! Query/response communication with terminator-framed instruments.
//!
//! linecomm talks to bench instruments that speak line-oriented ASCII over a
//! serial port: write a command ending in a terminator, read back a reply
//! ending in the same terminator.
//!
//! # Crate Structure
//!
//! - [`transport`]: Character transports (serial ports, Unix sockets, in-memory scripts)
//! - [`frame`]: Terminators and the lookahead message matcher
//! - [`session`]: [`Communicator`](session::Communicator) with scoped open/close around `query`
//! - [`device`]: Instrument command sets (behind `device` feature)
//!
//! ```
//! use linecomm::session::Communicator;
//! use linecomm::transport::ScriptedTransport;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let port = ScriptedTransport::new("sim").with_incoming("3.1415\r\n");
//! let mut comm = Communicator::new(port);
//! assert_eq!(comm.query("RDGFIELD?")?, "3.1415");
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use linecomm_transport::*;
}

/// Re-export framing types.
pub mod frame {
    pub use linecomm_frame::*;
}

/// Re-export communicator types.
pub mod session {
    pub use linecomm_session::*;
}

/// Re-export device adapters (requires `device` feature).
#[cfg(feature = "device")]
pub mod device {
    pub use linecomm_device::*;
}
