//! Port settings.
//!
//! These are plain data. Translation to a driver's own constants happens
//! inside the adapter that needs it (see `serial.rs`).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::TransportError;

/// Default serial baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default serial read timeout.
pub const DEFAULT_SERIAL_TIMEOUT: Duration = Duration::from_secs(3);

/// Number of data bits per RS-232 character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    pub fn bits(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl FromStr for DataBits {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(DataBits::Five),
            "6" => Ok(DataBits::Six),
            "7" => Ok(DataBits::Seven),
            "8" => Ok(DataBits::Eight),
            other => Err(TransportError::Unsupported(format!(
                "data bits must be 5, 6, 7 or 8 (got {other:?})"
            ))),
        }
    }
}

/// Number of stop bits marking the end of an RS-232 character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopBits {
    One,
    OnePointFive,
    Two,
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopBits::One => "1",
            StopBits::OnePointFive => "1.5",
            StopBits::Two => "2",
        };
        f.write_str(text)
    }
}

impl FromStr for StopBits {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(StopBits::One),
            "1.5" => Ok(StopBits::OnePointFive),
            "2" => Ok(StopBits::Two),
            other => Err(TransportError::Unsupported(format!(
                "stop bits must be 1, 1.5 or 2 (got {other:?})"
            ))),
        }
    }
}

/// Parity scheme used for single bit-flip detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Parity::None => "none",
            Parity::Odd => "odd",
            Parity::Even => "even",
        };
        f.write_str(text)
    }
}

impl FromStr for Parity {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "n" => Ok(Parity::None),
            "odd" | "o" => Ok(Parity::Odd),
            "even" | "e" => Ok(Parity::Even),
            other => Err(TransportError::Unsupported(format!(
                "parity must be none, odd or even (got {other:?})"
            ))),
        }
    }
}

/// Configuration for a serial line.
///
/// The defaults are 9600 baud, 7 data bits, 1 stop bit, odd parity and a
/// 3 second read timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line rate in bits per second.
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    /// How long a single character read may block.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Seven,
            stop_bits: StopBits::One,
            parity: Parity::Odd,
            timeout: DEFAULT_SERIAL_TIMEOUT,
        }
    }
}

/// Configuration for a Unix domain socket endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SocketConfig {
    /// Read timeout for blocking character reads.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking writes.
    pub write_timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_defaults() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, 9600);
        assert_eq!(cfg.data_bits, DataBits::Seven);
        assert_eq!(cfg.stop_bits, StopBits::One);
        assert_eq!(cfg.parity, Parity::Odd);
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn parse_settings() {
        assert_eq!("8".parse::<DataBits>().unwrap(), DataBits::Eight);
        assert_eq!("1.5".parse::<StopBits>().unwrap(), StopBits::OnePointFive);
        assert_eq!("Even".parse::<Parity>().unwrap(), Parity::Even);
        assert_eq!("n".parse::<Parity>().unwrap(), Parity::None);
    }

    #[test]
    fn parse_rejects_unknown_settings() {
        assert!(matches!(
            "9".parse::<DataBits>(),
            Err(TransportError::Unsupported(_))
        ));
        assert!("3".parse::<StopBits>().is_err());
        assert!("mark".parse::<Parity>().is_err());
    }

    #[test]
    fn display_matches_parse_input() {
        for bits in [DataBits::Five, DataBits::Six, DataBits::Seven, DataBits::Eight] {
            assert_eq!(bits.to_string().parse::<DataBits>().unwrap(), bits);
        }
        assert_eq!(StopBits::OnePointFive.to_string(), "1.5");
        assert_eq!(Parity::Odd.to_string(), "odd");
    }
}
