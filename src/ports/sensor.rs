//! Sensor ports - capability traits for reading environmental data
//!
//! Sensors differ in what they can measure, so instead of a single trait
//! each measured quantity is its own capability. A BME280 implements all of
//! them, a networked thermostat only temperature.

use crate::domain::{Measurement, Mode, SensorId};

/// Port for sensors that measure temperature
///
/// # Example Implementation
///
/// ```ignore
/// impl<I: I2c> TemperatureSensor for Bmx280<I> {
///     type Error = Bmx280Error<I::Error>;
///
///     fn read_temperature(&mut self) -> Result<f32, Self::Error> {
///         Bmx280::read_temperature(self)
///     }
///
///     fn sensor_id(&self) -> SensorId { SensorId::BME280 }
/// }
/// ```
pub trait TemperatureSensor {
    /// Error returned by reads
    type Error;

    /// Read the current temperature in degrees Celsius
    fn read_temperature(&mut self) -> Result<f32, Self::Error>;

    /// Get the sensor identifier
    fn sensor_id(&self) -> SensorId;

    /// Read the temperature wrapped in a [`Measurement`]
    fn read_measurement(&mut self) -> Result<Measurement, Self::Error> {
        let temperature_c = self.read_temperature()?;
        Ok(Measurement::temperature(self.sensor_id(), temperature_c))
    }
}

/// Port for sensors that measure barometric pressure
pub trait PressureSensor: TemperatureSensor {
    /// Read the current pressure in hectopascals
    fn read_pressure(&mut self) -> Result<f32, Self::Error>;
}

/// Port for sensors that measure relative humidity
pub trait HumiditySensor: TemperatureSensor {
    /// Read the current relative humidity in percent
    fn read_humidity(&mut self) -> Result<f32, Self::Error>;
}

/// Port for sensors with a selectable power mode
pub trait ModeControl {
    /// Error returned when the mode cannot be applied
    type Error;

    /// Switch the sensor to the given power mode
    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error>;
}
