//! Measurement domain entities
//!
//! Calibrated readings as the rest of the application sees them, independent
//! of the bus or network they came from.

use serde::{Deserialize, Serialize};

/// A calibrated measurement from one sensor
///
/// Temperature is always present; pressure and humidity are only filled in
/// by sensors that measure them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Sensor identifier
    pub sensor_id: SensorId,
    /// Temperature in Celsius
    pub temperature_c: f32,
    /// Pressure in hectopascals
    pub pressure_hpa: Option<f32>,
    /// Relative humidity in percent
    pub humidity_rh: Option<f32>,
}

impl Measurement {
    /// Create a temperature-only measurement
    pub const fn temperature(sensor_id: SensorId, temperature_c: f32) -> Self {
        Self {
            sensor_id,
            temperature_c,
            pressure_hpa: None,
            humidity_rh: None,
        }
    }
}

/// Sensor identifier
///
/// Uses a single byte to identify sensor kinds, with predefined constants for
/// the supported drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorId(pub u8);

impl SensorId {
    /// Bosch BMP280 (temperature and pressure)
    pub const BMP280: SensorId = SensorId(1);

    /// Bosch BME280 (temperature, pressure and humidity)
    pub const BME280: SensorId = SensorId(2);

    /// Radio Thermostat reached over HTTP
    pub const RADIO_THERMOSTAT: SensorId = SensorId(3);

    /// Get the string representation of this sensor ID
    pub const fn as_str(&self) -> &'static str {
        match self.0 {
            1 => "bmp280",
            2 => "bme280",
            3 => "radio_thermostat",
            _ => "unknown",
        }
    }
}

/// Convert Fahrenheit to Celsius
#[inline]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f32 {
    ((fahrenheit - 32.0) / 1.8) as f32
}
