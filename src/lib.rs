//! Environmental Sensor Drivers
//!
//! This library provides drivers for environmental sensors, organised as a
//! small hexagonal architecture.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - Calibration coefficients and compensation formulas           │
//! │  - Mode / Oversampling settings                                 │
//! │  - Measurement entity                                           │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - TemperatureSensor / PressureSensor / HumiditySensor          │
//! │  - ModeControl: power mode selection                            │
//! │  - StatusSource: thermostat status transport                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - Bmx280: BMP280/BME280 over embedded-hal I2C                  │
//! │  - RadioThermostat: Radio Thermostat over HTTP/JSON             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both drivers share one lifecycle: open at construction, configure, read,
//! close. Anything attempted after close fails with
//! [`InvalidState::NotOpen`], and closing twice is a no-op.
//!
//! # Features
//!
//! - `std` (default): the HTTP thermostat driver and `std::error::Error`
//!   impls. Without it the crate is `no_std` and only the I2C driver remains.
//! - `log`: log through the `log` facade (enabled by `std`)
//! - `defmt`: log through defmt and derive `defmt::Format` for firmware builds

#![cfg_attr(not(any(feature = "std", test)), no_std)]

// Must come first so the logging macros are visible to every module.
pub(crate) mod fmt;

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export key domain types
pub use domain::{Calibration, Measurement, Mode, Oversampling, SensorId};

pub use error::InvalidState;

// Re-export key port traits
pub use ports::{HumiditySensor, ModeControl, PressureSensor, TemperatureSensor};
#[cfg(feature = "std")]
pub use ports::StatusSource;

// Re-export adapters
pub use adapters::{Bmx280, Bmx280Config, Bmx280Error};
#[cfg(feature = "std")]
pub use adapters::{HttpStatusSource, RadioThermostat, ThermostatConfig, ThermostatError};
