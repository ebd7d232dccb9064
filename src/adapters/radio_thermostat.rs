//! Radio Thermostat adapter
//!
//! Reads the room temperature from a Radio Thermostat over its local
//! HTTP API (`GET http://<host>/tstat`). The device reports Fahrenheit;
//! the driver converts to Celsius.
//!
//! Network failures are returned to the caller. A status document that
//! cannot be parsed is logged and reported as [`INVALID_TEMP_C`] instead,
//! since a single bad response from a best-effort network sensor should not
//! abort the caller.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

use crate::domain::{fahrenheit_to_celsius, Mode, SensorId};
use crate::error::InvalidState;
use crate::ports::sensor::{ModeControl, TemperatureSensor};
use crate::ports::status::StatusSource;

/// Minimum temperature in Celsius the thermostat can measure
pub const MIN_TEMP_C: f32 = -40.0;
/// Maximum temperature in Celsius the thermostat can measure
pub const MAX_TEMP_C: f32 = 85.0;
/// Temperature reported when no valid reading is available
pub const INVALID_TEMP_C: f32 = -99.0;
/// Maximum power consumption in micro-amperes when measuring temperature
pub const MAX_POWER_CONSUMPTION_TEMP_UA: f32 = 325.0;
/// Maximum frequency of the measurements
pub const MAX_FREQ_HZ: f32 = 1.0;
/// Minimum frequency of the measurements
pub const MIN_FREQ_HZ: f32 = 0.01;

const RESOURCE: &str = "thermostat connection";

/// Errors that can occur when talking to a thermostat
#[derive(Error, Debug)]
pub enum ThermostatError {
    /// Operation not allowed in the current driver state
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Host did not form a valid URL
    #[error("invalid thermostat URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Status source failed for a reason other than HTTP
    #[error("status unavailable: {0}")]
    Status(String),
}

/// Result type for thermostat operations
pub type Result<T> = std::result::Result<T, ThermostatError>;

/// Connection settings for the HTTP transport
#[derive(Clone, Copy, Debug)]
pub struct ThermostatConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
        }
    }
}

/// The subset of the `/tstat` document the driver uses
#[derive(Debug, Deserialize)]
struct TstatStatus {
    /// Room temperature in Fahrenheit
    #[serde(deserialize_with = "number_or_numeric_string")]
    temp: f64,
}

/// Accept `72.5` as well as `"72.5"`
fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Blocking HTTP transport for `/tstat`
pub struct HttpStatusSource {
    client: reqwest::blocking::Client,
    url: Url,
}

impl HttpStatusSource {
    /// Build the transport for `http://<host>/tstat`
    pub fn new(host: &str, config: ThermostatConfig) -> Result<Self> {
        let url = Url::parse(&format!("http://{host}/tstat"))?;
        // Thermostats sit on the local network, never behind a proxy.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .no_proxy()
            .build()?;
        Ok(Self { client, url })
    }

    /// Status endpoint
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl StatusSource for HttpStatusSource {
    type Error = ThermostatError;

    fn fetch_status(&mut self) -> Result<String> {
        debug!("Thermostat: GET {}", self.url.as_str());
        let body = self
            .client
            .get(self.url.clone())
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }
}

/// Pre-parsed status document served for every fetch
#[derive(Clone, Debug)]
pub struct CannedResponse(serde_json::Value);

impl StatusSource for CannedResponse {
    type Error = ThermostatError;

    fn fetch_status(&mut self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Radio Thermostat driver
///
/// Lifecycle: open at construction, configure, read, [`close`](Self::close).
/// Every operation after close fails with [`InvalidState::NotOpen`].
pub struct RadioThermostat<S = HttpStatusSource> {
    source: Option<S>,
    mode: Mode,
    last_temperature: f32,
}

impl RadioThermostat<HttpStatusSource> {
    /// Connect to the thermostat at `host` (name or IP address, optional port)
    pub fn new(host: &str) -> Result<Self> {
        Self::with_config(host, ThermostatConfig::default())
    }

    /// Connect with custom transport settings
    pub fn with_config(host: &str, config: ThermostatConfig) -> Result<Self> {
        let source = HttpStatusSource::new(host, config)?;
        info!("Thermostat: using {}", source.url().as_str());
        Ok(Self::with_source(source))
    }
}

impl RadioThermostat<CannedResponse> {
    /// Serve a fixed, already parsed status document instead of the network
    pub fn with_response(response: serde_json::Value) -> Self {
        Self::with_source(CannedResponse(response))
    }
}

impl<S> RadioThermostat<S>
where
    S: StatusSource,
    ThermostatError: From<S::Error>,
{
    /// Drive the thermostat through any status source
    pub fn with_source(source: S) -> Self {
        Self {
            source: Some(source),
            mode: Mode::Normal,
            last_temperature: INVALID_TEMP_C,
        }
    }

    /// Whether the connection has not been closed yet
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Current power mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the power mode
    ///
    /// In [`Mode::Sleep`] reads return the last cached temperature without
    /// touching the network.
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.source()?;
        self.mode = mode;
        Ok(())
    }

    /// Last temperature successfully read, or [`INVALID_TEMP_C`]
    pub fn last_temperature(&self) -> f32 {
        self.last_temperature
    }

    /// Read the current temperature in degrees Celsius
    pub fn read_temperature(&mut self) -> Result<f32> {
        let mode = self.mode;
        let source = self.source()?;
        if mode == Mode::Sleep {
            return Ok(self.last_temperature);
        }

        info!("Thermostat: reading temperature");
        let body = source.fetch_status()?;
        match serde_json::from_str::<TstatStatus>(&body) {
            Ok(status) => {
                let temperature = fahrenheit_to_celsius(status.temp);
                info!("Thermostat: read temperature {}", temperature);
                self.last_temperature = temperature;
                Ok(temperature)
            }
            Err(e) => {
                warn!(
                    "Thermostat: unusable status document (line {}, column {})",
                    e.line(),
                    e.column()
                );
                Ok(INVALID_TEMP_C)
            }
        }
    }

    /// Close the driver and release the connection
    ///
    /// Returns the status source on the first call and `None` afterwards.
    pub fn close(&mut self) -> Option<S> {
        self.source.take()
    }

    fn source(&mut self) -> Result<&mut S> {
        self.source
            .as_mut()
            .ok_or(ThermostatError::InvalidState(InvalidState::NotOpen(RESOURCE)))
    }
}

impl<S> TemperatureSensor for RadioThermostat<S>
where
    S: StatusSource,
    ThermostatError: From<S::Error>,
{
    type Error = ThermostatError;

    fn read_temperature(&mut self) -> Result<f32> {
        RadioThermostat::<S>::read_temperature(self)
    }

    fn sensor_id(&self) -> SensorId {
        SensorId::RADIO_THERMOSTAT
    }
}

impl<S> ModeControl for RadioThermostat<S>
where
    S: StatusSource,
    ThermostatError: From<S::Error>,
{
    type Error = ThermostatError;

    fn set_mode(&mut self, mode: Mode) -> Result<()> {
        RadioThermostat::<S>::set_mode(self, mode)
    }
}
