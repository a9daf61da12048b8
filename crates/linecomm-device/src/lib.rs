//! Instrument command sets built on the linecomm query primitive.
//!
//! Each device handle wraps anything implementing
//! [`Query`](linecomm_session::Query) and turns ASCII command strings into
//! typed readings. Supported devices:
//!   - LakeShore 475 DSP gaussmeter ([`LakeShore475`])

pub mod error;
pub mod lakeshore;
pub mod magnetometer;

pub use error::{DeviceError, Result};
pub use lakeshore::LakeShore475;
pub use magnetometer::Magnetometer;
