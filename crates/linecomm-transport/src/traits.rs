use crate::error::Result;

/// The capability set a communicator needs from a port.
///
/// Implementations must answer [`is_open`](Transport::is_open) from live
/// state: callers re-query it before every scoped operation and never cache
/// the answer, so a port closed behind their back is noticed.
pub trait Transport {
    /// Human-readable name of the endpoint, e.g. `/dev/ttyUSB0` or `COM1`.
    fn port_name(&self) -> &str;

    /// Open the port.
    fn open(&mut self) -> Result<()>;

    /// Whether the port is currently open.
    fn is_open(&self) -> bool;

    /// Close the port.
    fn close(&mut self) -> Result<()>;

    /// Read exactly one character, blocking until it arrives or the
    /// adapter gives up (timeout, end of stream, hardware fault).
    fn read_char(&mut self) -> Result<char>;

    /// Write the whole byte sequence.
    fn write_bytes(&mut self, data: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn port_name(&self) -> &str {
        (**self).port_name()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn read_char(&mut self) -> Result<char> {
        (**self).read_char()
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_bytes(data)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn port_name(&self) -> &str {
        (**self).port_name()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn read_char(&mut self) -> Result<char> {
        (**self).read_char()
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedTransport;

    fn drive<T: Transport>(mut transport: T) -> Result<char> {
        transport.open()?;
        let c = transport.read_char()?;
        transport.write_bytes(b"ack")?;
        transport.close()?;
        Ok(c)
    }

    #[test]
    fn mut_ref_forwards_to_inner_transport() {
        let mut fake = ScriptedTransport::new("fake0").with_incoming("x");
        assert_eq!(drive(&mut fake).unwrap(), 'x');
        assert_eq!(fake.open_count(), 1);
        assert_eq!(fake.close_count(), 1);
        assert_eq!(fake.written(), b"ack");
    }

    #[test]
    fn boxed_dyn_transport_is_a_transport() {
        let boxed: Box<dyn Transport> = Box::new(ScriptedTransport::new("fake1").with_incoming("y"));
        assert_eq!(boxed.port_name(), "fake1");
        assert_eq!(drive(boxed).unwrap(), 'y');
    }
}
