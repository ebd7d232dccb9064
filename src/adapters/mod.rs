//! Adapters - concrete drivers implementing the ports
//!
//! Each adapter owns one external transport.
//!
//! # Available Adapters
//!
//! - **bmx280**: Bosch BMP280 / BME280 over I2C
//! - **radio_thermostat**: Radio Thermostat over HTTP/JSON (`std` only)

pub mod bmx280;
#[cfg(feature = "std")]
pub mod radio_thermostat;

pub use bmx280::{Bmx280, Bmx280Config, Bmx280Error};
#[cfg(feature = "std")]
pub use radio_thermostat::{HttpStatusSource, RadioThermostat, ThermostatConfig, ThermostatError};
