use crate::error::Result;

/// A field-measuring instrument.
pub trait Magnetometer {
    /// The current magnetic field in the instrument's active units.
    fn field(&mut self) -> Result<f64>;

    /// The active field units as reported by the instrument.
    fn units(&mut self) -> Result<String>;

    /// Switch the instrument to other field units.
    fn set_units(&mut self, units: &str) -> Result<()>;
}
