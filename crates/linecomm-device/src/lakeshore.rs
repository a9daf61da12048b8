use linecomm_session::Query;
use tracing::debug;

use crate::error::{DeviceError, Result};
use crate::magnetometer::Magnetometer;

/// Read the field in the active units.
pub const READ_FIELD: &str = "RDGFIELD?";
/// Ask for the active units.
pub const READ_UNITS: &str = "UNITS?";
/// Prefix of the set-units command.
pub const SET_UNITS: &str = "UNITS";

/// Handle for a LakeShore 475 DSP gaussmeter.
pub struct LakeShore475<Q> {
    comm: Q,
}

impl<Q: Query> LakeShore475<Q> {
    /// Wrap the communicator used to reach the gaussmeter.
    pub fn new(comm: Q) -> Self {
        Self { comm }
    }

    pub fn get_ref(&self) -> &Q {
        &self.comm
    }

    pub fn get_mut(&mut self) -> &mut Q {
        &mut self.comm
    }

    pub fn into_inner(self) -> Q {
        self.comm
    }
}

impl<Q: Query> Magnetometer for LakeShore475<Q> {
    fn field(&mut self) -> Result<f64> {
        let reply = self.comm.query(READ_FIELD)?;
        let value: f64 = reply.trim().parse().map_err(|_| DeviceError::Parse {
            command: READ_FIELD.to_string(),
            reply: reply.clone(),
        })?;
        if !value.is_finite() {
            return Err(DeviceError::NotFinite {
                command: READ_FIELD.to_string(),
                value,
            });
        }
        debug!(field = value, "read field");
        Ok(value)
    }

    fn units(&mut self) -> Result<String> {
        Ok(self.comm.query(READ_UNITS)?)
    }

    fn set_units(&mut self, units: &str) -> Result<()> {
        if units.chars().any(char::is_control) {
            return Err(DeviceError::InvalidArgument(units.to_string()));
        }
        // The instrument acknowledges with a line; its content carries nothing.
        self.comm.query(&format!("{SET_UNITS} {units}"))?;
        Ok(())
    }
}

impl<Q> std::fmt::Debug for LakeShore475<Q>
where
    Q: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LakeShore475")
            .field("comm", &self.comm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use linecomm_session::{CommError, Communicator};
    use linecomm_transport::{ScriptedTransport, Transport, TransportError};

    use super::*;

    #[derive(Debug, Default)]
    struct CannedReplies {
        replies: VecDeque<String>,
        sent: Vec<String>,
    }

    impl CannedReplies {
        fn with(reply: &str) -> Self {
            Self {
                replies: VecDeque::from([reply.to_string()]),
                sent: Vec::new(),
            }
        }
    }

    impl Query for CannedReplies {
        fn query(&mut self, message: &str) -> linecomm_session::Result<String> {
            self.sent.push(message.to_string());
            self.replies
                .pop_front()
                .ok_or(CommError::Transport(TransportError::Timeout))
        }
    }

    #[test]
    fn field_parses_reply() {
        let mut gauss = LakeShore475::new(CannedReplies::with("+1.2345E+02"));
        assert_eq!(gauss.field().unwrap(), 123.45);
        assert_eq!(gauss.get_ref().sent, vec!["RDGFIELD?"]);
    }

    #[test]
    fn field_tolerates_surrounding_whitespace() {
        let mut gauss = LakeShore475::new(CannedReplies::with(" -0.5 "));
        assert_eq!(gauss.field().unwrap(), -0.5);
    }

    #[test]
    fn field_rejects_infinity_and_nan() {
        for reply in ["inf", "-inf", "NaN"] {
            let mut gauss = LakeShore475::new(CannedReplies::with(reply));
            assert!(
                matches!(gauss.field(), Err(DeviceError::NotFinite { .. })),
                "reply {reply:?}"
            );
        }
    }

    #[test]
    fn field_rejects_garbage() {
        let mut gauss = LakeShore475::new(CannedReplies::with("OVERLOAD"));
        assert!(matches!(
            gauss.field(),
            Err(DeviceError::Parse { ref reply, .. }) if reply == "OVERLOAD"
        ));
    }

    #[test]
    fn units_returns_reply_verbatim() {
        let mut gauss = LakeShore475::new(CannedReplies::with("G"));
        assert_eq!(gauss.units().unwrap(), "G");
        assert_eq!(gauss.get_ref().sent, vec!["UNITS?"]);
    }

    #[test]
    fn set_units_sends_command() {
        let mut gauss = LakeShore475::new(CannedReplies::with(""));
        gauss.set_units("T").unwrap();
        assert_eq!(gauss.get_ref().sent, vec!["UNITS T"]);
    }

    #[test]
    fn set_units_rejects_control_characters() {
        let mut gauss = LakeShore475::new(CannedReplies::default());
        assert!(matches!(
            gauss.set_units("T\r\nRST"),
            Err(DeviceError::InvalidArgument(_))
        ));
        assert!(gauss.get_ref().sent.is_empty());
    }

    #[test]
    fn communication_errors_propagate() {
        let mut gauss = LakeShore475::new(CannedReplies::default());
        assert!(matches!(
            gauss.units(),
            Err(DeviceError::Comm(CommError::Transport(TransportError::Timeout)))
        ));
    }

    #[test]
    fn drives_a_real_communicator() {
        let port = ScriptedTransport::new("/dev/ttyS0").with_incoming("3.1415\r\n");
        let mut gauss = LakeShore475::new(Communicator::new(port));

        assert_eq!(gauss.field().unwrap(), 3.1415);

        let port = gauss.into_inner().into_inner();
        assert_eq!(port.written_str(), "RDGFIELD?\r\n");
        assert!(!port.is_open());
    }
}
