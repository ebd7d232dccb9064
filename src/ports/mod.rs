//! Ports (interfaces) defining the boundaries of the drivers
//!
//! - **Sensor capabilities**: what a sensor can measure and how its power
//!   mode is set
//! - **StatusSource**: how a thermostat status document is fetched (HTTP,
//!   canned response)

pub mod sensor;
#[cfg(feature = "std")]
pub mod status;

pub use sensor::{HumiditySensor, ModeControl, PressureSensor, TemperatureSensor};
#[cfg(feature = "std")]
pub use status::StatusSource;
