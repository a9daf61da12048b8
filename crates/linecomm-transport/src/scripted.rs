//! In-memory transport with scripted input.
//!
//! `ScriptedTransport` stands in for an instrument: characters queued with
//! [`push_incoming`](ScriptedTransport::push_incoming) are handed out one at a
//! time, every write is recorded, and open/close calls are counted. Faults
//! can be armed per operation to exercise error paths, and a single read
//! timeout can be queued between characters with
//! [`push_timeout`](ScriptedTransport::push_timeout).

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Open,
    Close,
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Char(char),
    Timeout,
}

/// A scripted fake port.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    name: String,
    open: bool,
    incoming: VecDeque<Step>,
    written: Vec<u8>,
    opens: usize,
    closes: usize,
    faults: Vec<Fault>,
}

impl ScriptedTransport {
    /// Create a closed fake port with no queued input.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`push_incoming`](Self::push_incoming).
    pub fn with_incoming(mut self, data: &str) -> Self {
        self.push_incoming(data);
        self
    }

    /// Queue characters for subsequent reads.
    pub fn push_incoming(&mut self, data: &str) {
        self.incoming.extend(data.chars().map(Step::Char));
    }

    /// Queue one read that fails with [`TransportError::Timeout`].
    pub fn push_timeout(&mut self) {
        self.incoming.push_back(Step::Timeout);
    }

    /// Characters queued but not yet read.
    pub fn remaining(&self) -> String {
        self.incoming
            .iter()
            .filter_map(|step| match step {
                Step::Char(c) => Some(*c),
                Step::Timeout => None,
            })
            .collect()
    }

    /// Every byte written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Written bytes as text (lossy).
    pub fn written_str(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }

    /// Forget recorded writes.
    pub fn clear_written(&mut self) {
        self.written.clear();
    }

    /// Number of times the port was actually opened.
    pub fn open_count(&self) -> usize {
        self.opens
    }

    /// Number of times the port was actually closed.
    pub fn close_count(&self) -> usize {
        self.closes
    }

    /// Make every subsequent call of `op` fail until [`clear_faults`](Self::clear_faults).
    pub fn fail(&mut self, op: Fault) {
        if !self.faults.contains(&op) {
            self.faults.push(op);
        }
    }

    /// Builder form of [`fail`](Self::fail).
    pub fn failing(mut self, op: Fault) -> Self {
        self.fail(op);
        self
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Flip the open state without counting an open or close, as if another
    /// party had opened or closed the device.
    pub fn set_open_externally(&mut self, open: bool) {
        self.open = open;
    }

    fn check(&self, op: Fault) -> Result<()> {
        if self.faults.contains(&op) {
            return Err(TransportError::Io(std::io::Error::other(format!(
                "injected {op:?} fault on {}",
                self.name
            ))));
        }
        Ok(())
    }
}

impl Transport for ScriptedTransport {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<()> {
        self.check(Fault::Open)?;
        self.open = true;
        self.opens += 1;
        debug!(port = %self.name, "scripted port opened");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> Result<()> {
        self.check(Fault::Close)?;
        self.open = false;
        self.closes += 1;
        debug!(port = %self.name, "scripted port closed");
        Ok(())
    }

    fn read_char(&mut self) -> Result<char> {
        if !self.open {
            return Err(TransportError::NotOpen(self.name.clone()));
        }
        self.check(Fault::Read)?;
        match self.incoming.pop_front() {
            Some(Step::Char(c)) => Ok(c),
            Some(Step::Timeout) => Err(TransportError::Timeout),
            None => Err(TransportError::Closed),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        if !self.open {
            return Err(TransportError::NotOpen(self.name.clone()));
        }
        self.check(Fault::Write)?;
        self.written.extend_from_slice(data);
        Ok(())
    }
}
