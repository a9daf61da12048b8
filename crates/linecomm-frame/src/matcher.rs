use std::collections::VecDeque;
use std::iter::FusedIterator;

use linecomm_transport::{Transport, TransportError};
use tracing::{debug, trace};

use crate::error::{FrameError, Result};
use crate::terminator::Terminator;

/// Where a [`MessageChars`] sequence is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Filling the window before anything may be emitted.
    Priming,
    /// Window full; each step compares, emits the oldest character and refills.
    Matching,
    /// Terminator consumed or the read failed. Yields nothing further.
    Done,
}

/// The body of one message, read lazily from a transport.
///
/// A window as long as the terminator is filled first. From then on, while
/// the window differs from the terminator, its oldest character is yielded
/// and one more character is read. The first time the window equals the
/// terminator the sequence ends, leaving everything after the terminator
/// unread on the transport.
///
/// A read timeout is yielded as an error but leaves the window and state
/// intact: calling `next` again resumes the same message. Any other error
/// ends the sequence. If the stream ends first, [`FrameError::Incomplete`]
/// carries every character of the message read so far.
///
/// The sequence is finite and does not restart: once it returns `None`,
/// framing the next message needs a new `MessageChars`.
pub struct MessageChars<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
    terminator: &'a Terminator,
    window: VecDeque<char>,
    emitted: String,
    state: MatchState,
}

impl<'a, T: Transport + ?Sized> MessageChars<'a, T> {
    pub fn new(transport: &'a mut T, terminator: &'a Terminator) -> Self {
        Self {
            transport,
            window: VecDeque::with_capacity(terminator.window_size()),
            terminator,
            emitted: String::new(),
            state: MatchState::Priming,
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Whether any character of this message has been read yet.
    pub fn has_started(&self) -> bool {
        !self.emitted.is_empty() || !self.window.is_empty()
    }

    /// Top the window up to the terminator length.
    fn fill_window(&mut self) -> Result<()> {
        while self.window.len() < self.terminator.window_size() {
            match self.transport.read_char() {
                Ok(c) => self.window.push_back(c),
                Err(TransportError::Closed) => {
                    debug!(
                        port = %self.transport.port_name(),
                        "stream closed before termination sequence"
                    );
                    let mut received = self.emitted.clone();
                    received.extend(self.window.iter());
                    return Err(FrameError::Incomplete { received });
                }
                Err(err) => return Err(FrameError::Transport(err)),
            }
        }
        Ok(())
    }

    /// A timeout keeps the message resumable; anything else ends it.
    fn fail(&mut self, err: FrameError) -> FrameError {
        if !err.is_timeout() {
            self.state = MatchState::Done;
        }
        err
    }

    fn window_is_terminator(&self) -> bool {
        self.window.iter().eq(self.terminator.chars().iter())
    }
}

impl<T: Transport + ?Sized> Iterator for MessageChars<'_, T> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                MatchState::Priming => {
                    if let Err(err) = self.fill_window() {
                        return Some(Err(self.fail(err)));
                    }
                    self.state = MatchState::Matching;
                }
                MatchState::Matching => {
                    if let Err(err) = self.fill_window() {
                        return Some(Err(self.fail(err)));
                    }
                    if self.window_is_terminator() {
                        trace!(
                            port = %self.transport.port_name(),
                            terminator = %self.terminator,
                            "matched termination sequence"
                        );
                        self.window.clear();
                        self.state = MatchState::Done;
                        return None;
                    }
                    let c = self.window.pop_front()?;
                    self.emitted.push(c);
                    return Some(Ok(c));
                }
                MatchState::Done => return None,
            }
        }
    }
}

impl<T: Transport + ?Sized> FusedIterator for MessageChars<'_, T> {}

/// Read one complete message body, terminator stripped.
///
/// Any error, a timeout included, abandons the message. On a premature end
/// of stream the returned [`FrameError::Incomplete`] carries every character
/// received for this message.
pub fn read_message<T: Transport + ?Sized>(
    transport: &mut T,
    terminator: &Terminator,
) -> Result<String> {
    let mut body = String::new();
    for next in MessageChars::new(transport, terminator) {
        body.push(next?);
    }
    Ok(body)
}
