//! Terminator-delimited message framing for character streams.
//!
//! Instruments on a serial line end every message with a fixed termination
//! sequence (usually `"\r\n"`). This crate provides:
//! - [`Terminator`]: a validated, non-empty termination sequence
//! - [`encode_message`]: body + terminator, ready for the wire
//! - [`MessageChars`]: a lookahead matcher that yields the body of one
//!   message character by character and consumes the terminator
//!
//! The matcher keeps a window exactly as long as the terminator and stops at
//! the first position where the window equals it. Nothing past that point is
//! read from the transport.

pub mod error;
pub mod matcher;
pub mod terminator;

pub use error::{ConfigError, FrameError, Result};
pub use matcher::{read_message, MatchState, MessageChars};
pub use terminator::{encode_message, Terminator, DEFAULT_TERMINATOR};
