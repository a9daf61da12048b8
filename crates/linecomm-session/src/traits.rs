use crate::error::Result;

/// Anything that can run one command/reply round trip.
///
/// Device adapters are written against this trait so they can be driven by
/// a [`Communicator`](crate::Communicator) or by a test double.
pub trait Query {
    /// Send `message` (without terminator) and return the reply body.
    fn query(&mut self, message: &str) -> Result<String>;
}

impl<Q: Query + ?Sized> Query for &mut Q {
    fn query(&mut self, message: &str) -> Result<String> {
        (**self).query(message)
    }
}

impl<Q: Query + ?Sized> Query for Box<Q> {
    fn query(&mut self, message: &str) -> Result<String> {
        (**self).query(message)
    }
}
