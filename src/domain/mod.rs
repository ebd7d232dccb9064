//! Domain layer - pure conversion logic independent of any transport
//!
//! This module contains the value types and calibration formulas shared by
//! the drivers.

pub mod calibration;
pub mod mode;
pub mod reading;

pub use calibration::{
    Calibration, CompensatedTemperature, HumidityCalibration, PressureCalibration,
    TemperatureCalibration,
};
pub use mode::{Mode, Oversampling};
pub use reading::{fahrenheit_to_celsius, Measurement, SensorId};
