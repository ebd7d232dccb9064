//! Status port - transport for networked thermostats
//!
//! The thermostat driver only needs "give me the current status document".
//! Keeping that behind a trait lets tests substitute a canned or counting
//! source for the HTTP client.

/// Port for fetching a thermostat status document
pub trait StatusSource {
    /// Transport error type
    type Error;

    /// Fetch the raw status body (a JSON object)
    ///
    /// Transport failures are returned as errors and are not retried.
    fn fetch_status(&mut self) -> Result<String, Self::Error>;
}
