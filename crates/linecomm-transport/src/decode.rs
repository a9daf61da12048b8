//! Blocking character I/O over `std::io` streams.
//!
//! Adapters that sit on top of a `Read + Write` handle share these helpers
//! so that end-of-stream, timeouts and malformed bytes surface as the same
//! [`TransportError`] variants regardless of the underlying device.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};

/// Read one UTF-8 encoded character (blocking).
///
/// Returns `Err(TransportError::Closed)` when EOF is reached, including EOF
/// in the middle of a multi-byte sequence.
pub fn read_char<R: Read + ?Sized>(reader: &mut R) -> Result<char> {
    let mut buf = [0u8; 4];
    read_byte(reader, &mut buf[0])?;

    let width = utf8_width(buf[0]).ok_or_else(|| TransportError::InvalidUtf8 {
        bytes: vec![buf[0]],
    })?;
    for slot in buf.iter_mut().take(width).skip(1) {
        read_byte(reader, slot)?;
    }

    let bytes = &buf[..width];
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|text| text.chars().next())
        .ok_or_else(|| TransportError::InvalidUtf8 {
            bytes: bytes.to_vec(),
        })
}

/// Write the whole buffer and flush (blocking).
pub fn write_all<W: Write + ?Sized>(writer: &mut W, data: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < data.len() {
        match writer.write(&data[offset..]) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(map_io_error(err)),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(map_io_error(err)),
        }
    }
}

/// Classify an I/O error from a blocking read or write.
pub fn map_io_error(err: std::io::Error) -> TransportError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => TransportError::Timeout,
        ErrorKind::UnexpectedEof => TransportError::Closed,
        _ => TransportError::Io(err),
    }
}

fn read_byte<R: Read + ?Sized>(reader: &mut R, slot: &mut u8) -> Result<()> {
    loop {
        match reader.read(std::slice::from_mut(slot)) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(_) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(map_io_error(err)),
        }
    }
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
