use std::ops::{Deref, DerefMut};

use linecomm_transport::{Transport, TransportError};
use tracing::{debug, warn};

use crate::communicator::Communicator;

/// Scoped hold on an open port.
///
/// Created by [`Communicator::session`]. If the port was closed when the
/// guard was created, the guard opened it and will close it again when it
/// is dropped or [`finish`](PortGuard::finish)ed, on success, on error and
/// during unwinding alike. A port that was already open is left open.
pub struct PortGuard<'a, T: Transport> {
    comm: &'a mut Communicator<T>,
    opened: bool,
    released: bool,
}

impl<'a, T: Transport> PortGuard<'a, T> {
    pub(crate) fn acquire(comm: &'a mut Communicator<T>) -> Result<Self, TransportError> {
        let opened = !comm.is_open();
        if opened {
            debug!(port = %comm.port(), "opening port for scoped operation");
            comm.open()?;
        }
        Ok(Self {
            comm,
            opened,
            released: false,
        })
    }

    /// Whether this guard opened the port (and so owns closing it).
    pub fn opened_port(&self) -> bool {
        self.opened
    }

    /// Release the port now and report a close failure instead of logging it.
    pub fn finish(mut self) -> Result<(), TransportError> {
        self.released = true;
        if self.opened {
            debug!(port = %self.comm.port(), "closing port after scoped operation");
            self.comm.close()?;
        }
        Ok(())
    }
}

impl<T: Transport> Deref for PortGuard<'_, T> {
    type Target = Communicator<T>;

    fn deref(&self) -> &Self::Target {
        self.comm
    }
}

impl<T: Transport> DerefMut for PortGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.comm
    }
}

impl<T: Transport> Drop for PortGuard<'_, T> {
    fn drop(&mut self) {
        if self.released || !self.opened {
            return;
        }
        debug!(port = %self.comm.port(), "closing port after failed scoped operation");
        if let Err(err) = self.comm.close() {
            warn!(port = %self.comm.port(), error = %err, "failed to close port");
        }
    }
}
