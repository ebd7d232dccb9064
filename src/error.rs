//! Invalid-state errors shared by all drivers
//!
//! Every driver guards its configuration and read operations with the same
//! checks: the transport must still be open, and the quantity being read
//! must have a non-skipped oversampling. Violations are reported as an
//! [`InvalidState`] carrying a human-readable cause.

use core::fmt;

/// Operation attempted in a state that does not allow it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidState {
    /// The driver was closed; carries the name of the released resource
    NotOpen(&'static str),
    /// Temperature read requested with temperature oversampling skipped
    TemperatureOversamplingSkipped,
    /// Pressure read requested with pressure oversampling skipped
    PressureOversamplingSkipped,
    /// Humidity read requested with humidity oversampling skipped
    HumidityOversamplingSkipped,
    /// Humidity requested from a chip without a humidity sensor
    NoHumiditySensor,
}

impl fmt::Display for InvalidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen(resource) => write!(f, "{resource} not open"),
            Self::TemperatureOversamplingSkipped => {
                f.write_str("temperature oversampling is skipped")
            }
            Self::PressureOversamplingSkipped => f.write_str("pressure oversampling is skipped"),
            Self::HumidityOversamplingSkipped => f.write_str("Humidity oversampling is skipped"),
            Self::NoHumiditySensor => f.write_str("chip has no humidity sensor"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidState {}
