use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, BytesMut};

use crate::error::ConfigError;

/// Carriage return + line feed.
pub const DEFAULT_TERMINATOR: &str = "\r\n";

/// A non-empty termination sequence.
///
/// The number of characters (not bytes) is the size of the framing window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Terminator {
    text: String,
    chars: Vec<char>,
}

impl Terminator {
    /// Build a terminator from its literal characters.
    pub fn new(text: impl Into<String>) -> Result<Self, ConfigError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ConfigError::EmptyTerminator);
        }
        let chars = text.chars().collect();
        Ok(Self { text, chars })
    }

    /// Build a terminator from a backslash-escaped string such as `\r\n`.
    ///
    /// Supported escapes: `\r`, `\n`, `\t`, `\0`, `\\` and `\xNN`.
    pub fn parse_escaped(input: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidEscape {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut out = String::with_capacity(input.len());
        let mut chars = input.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('r') => out.push('\r'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some('\\') => out.push('\\'),
                Some('x') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    if hex.len() != 2 {
                        return Err(invalid("\\x needs two hex digits"));
                    }
                    let byte = u8::from_str_radix(&hex, 16)
                        .map_err(|_| invalid("\\x needs two hex digits"))?;
                    out.push(char::from(byte));
                }
                Some(other) => return Err(invalid(&format!("unknown escape \\{other}"))),
                None => return Err(invalid("trailing backslash")),
            }
        }

        Self::new(out)
    }

    /// The literal termination characters.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of characters in the sequence, i.e. the framing window size.
    pub fn window_size(&self) -> usize {
        self.chars.len()
    }

    /// The sequence with control characters escaped, suitable for logs.
    pub fn escaped(&self) -> String {
        self.text.escape_debug().to_string()
    }
}

impl Default for Terminator {
    fn default() -> Self {
        Self {
            text: DEFAULT_TERMINATOR.to_string(),
            chars: DEFAULT_TERMINATOR.chars().collect(),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escaped())
    }
}

impl FromStr for Terminator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_escaped(s)
    }
}

impl TryFrom<&str> for Terminator {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Terminator {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encode a message body followed by the terminator.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬──────────────────┐
/// │ Body (UTF-8)         │ Terminator       │
/// │ e.g. "RDGFIELD?"     │ e.g. "\r\n"      │
/// └──────────────────────┴──────────────────┘
/// ```
pub fn encode_message(message: &str, terminator: &Terminator, dst: &mut BytesMut) {
    dst.reserve(message.len() + terminator.as_str().len());
    dst.put_slice(message.as_bytes());
    dst.put_slice(terminator.as_str().as_bytes());
}
