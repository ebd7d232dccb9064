//! Bosch BMP280 / BME280 sensor adapter
//!
//! Register driver over any blocking `embedded_hal::i2c::I2c` bus. The
//! factory calibration is read once at construction; reads fetch raw ADC
//! windows and run them through the compensation formulas in
//! [`crate::domain::calibration`].
//!
//! Configuration is cached in the driver (`ctrl_meas` is write-only from our
//! point of view) so every setter is a single register write.

use core::fmt;

use embedded_hal::i2c::I2c;

use crate::domain::{
    Calibration, CompensatedTemperature, HumidityCalibration, Measurement, Mode, Oversampling,
    PressureCalibration, SensorId, TemperatureCalibration,
};
use crate::error::InvalidState;
use crate::ports::sensor::{HumiditySensor, ModeControl, PressureSensor, TemperatureSensor};

/// Default I2C address (SDO pulled high)
pub const DEFAULT_I2C_ADDRESS: u8 = 0x77;
/// Alternate I2C address (SDO pulled low)
pub const ALTERNATE_I2C_ADDRESS: u8 = 0x76;

/// Chip id reported by a BMP280
pub const BMP280_CHIP_ID: u8 = 0x58;
/// Chip id reported by a BME280
pub const BME280_CHIP_ID: u8 = 0x60;

const REG_CHIP_ID: u8 = 0xD0;
const REG_CALIB_TP: u8 = 0x88;
const REG_CALIB_H1: u8 = 0xA1;
const REG_CALIB_H2: u8 = 0xE1;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_PRESSURE: u8 = 0xF7;
const REG_TEMPERATURE: u8 = 0xFA;
const REG_HUMIDITY: u8 = 0xFD;

const OSRS_MASK: u8 = 0b111;
const OSRS_T_SHIFT: u8 = 5;
const OSRS_P_SHIFT: u8 = 2;
const MODE_MASK: u8 = 0b11;

const RESOURCE: &str = "I2C device";

/// Error type for BMx280 operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmx280Error<E> {
    /// Operation not allowed in the current driver state
    InvalidState(InvalidState),
    /// Underlying bus failure
    Bus(E),
}

impl<E> From<InvalidState> for Bmx280Error<E> {
    fn from(state: InvalidState) -> Self {
        Self::InvalidState(state)
    }
}

impl<E: fmt::Debug> fmt::Display for Bmx280Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(state) => write!(f, "invalid state: {state}"),
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Bmx280Error<E> {}

/// Full sensor configuration applied in one go
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bmx280Config {
    pub temperature_oversampling: Oversampling,
    pub pressure_oversampling: Oversampling,
    /// Ignored on chips without a humidity sensor
    pub humidity_oversampling: Oversampling,
    pub mode: Mode,
}

impl Default for Bmx280Config {
    fn default() -> Self {
        Self {
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            humidity_oversampling: Oversampling::X1,
            mode: Mode::Normal,
        }
    }
}

impl Bmx280Config {
    /// Datasheet recommendation for weather monitoring (one sample per minute)
    pub const fn weather_monitoring() -> Self {
        Self {
            temperature_oversampling: Oversampling::X1,
            pressure_oversampling: Oversampling::X1,
            humidity_oversampling: Oversampling::X1,
            mode: Mode::Forced,
        }
    }

    /// Datasheet recommendation for indoor navigation
    pub const fn indoor_navigation() -> Self {
        Self {
            temperature_oversampling: Oversampling::X2,
            pressure_oversampling: Oversampling::X16,
            humidity_oversampling: Oversampling::X1,
            mode: Mode::Normal,
        }
    }
}

/// BMP280 / BME280 driver
///
/// Lifecycle: open at construction, configure, read, [`close`](Self::close).
/// Every operation after close fails with [`InvalidState::NotOpen`].
pub struct Bmx280<I> {
    i2c: Option<I>,
    address: u8,
    chip_id: u8,
    calibration: Calibration,
    has_humidity: bool,
    ctrl_meas: u8,
    temperature_oversampling: Oversampling,
    pressure_oversampling: Oversampling,
    humidity_oversampling: Oversampling,
    mode: Mode,
}

impl<I: I2c> Bmx280<I> {
    /// Open a sensor at [`DEFAULT_I2C_ADDRESS`]
    pub fn new(i2c: I) -> Result<Self, Bmx280Error<I::Error>> {
        Self::with_address(i2c, DEFAULT_I2C_ADDRESS)
    }

    /// Open a sensor at the given address
    ///
    /// Reads the chip id and the factory calibration. Humidity support is
    /// enabled when the chip identifies as a BME280.
    pub fn with_address(i2c: I, address: u8) -> Result<Self, Bmx280Error<I::Error>> {
        let mut sensor = Self {
            i2c: Some(i2c),
            address,
            chip_id: 0,
            calibration: Calibration::default(),
            has_humidity: false,
            ctrl_meas: 0,
            temperature_oversampling: Oversampling::Skipped,
            pressure_oversampling: Oversampling::Skipped,
            humidity_oversampling: Oversampling::Skipped,
            mode: Mode::Sleep,
        };

        let mut id = [0u8; 1];
        sensor.read_registers(REG_CHIP_ID, &mut id)?;
        sensor.chip_id = id[0];
        sensor.has_humidity = sensor.chip_id == BME280_CHIP_ID;

        sensor.read_calibration()?;
        info!(
            "BMx280: chip id {} at address {}, humidity {}",
            sensor.chip_id, address, sensor.has_humidity
        );

        Ok(sensor)
    }

    fn read_calibration(&mut self) -> Result<(), Bmx280Error<I::Error>> {
        let mut tp = [0u8; 24];
        self.read_registers(REG_CALIB_TP, &mut tp)?;

        let unsigned = |i: usize| u16::from_le_bytes([tp[i * 2], tp[i * 2 + 1]]) as i32;
        let signed = |i: usize| i16::from_le_bytes([tp[i * 2], tp[i * 2 + 1]]) as i32;

        self.calibration.temperature = TemperatureCalibration([unsigned(0), signed(1), signed(2)]);
        self.calibration.pressure = PressureCalibration([
            unsigned(3),
            signed(4),
            signed(5),
            signed(6),
            signed(7),
            signed(8),
            signed(9),
            signed(10),
            signed(11),
        ]);

        if self.has_humidity {
            self.read_humidity_calibration()?;
        }

        Ok(())
    }

    fn read_humidity_calibration(&mut self) -> Result<(), Bmx280Error<I::Error>> {
        let mut h1 = [0u8; 1];
        self.read_registers(REG_CALIB_H1, &mut h1)?;
        let mut h = [0u8; 7];
        self.read_registers(REG_CALIB_H2, &mut h)?;

        // H4 and H5 are 12-bit values sharing the nibbles of 0xE5.
        self.calibration.humidity = HumidityCalibration([
            h1[0] as i32,
            i16::from_le_bytes([h[0], h[1]]) as i32,
            h[2] as i32,
            ((h[3] as i8 as i32) << 4) | (h[4] & 0x0F) as i32,
            ((h[5] as i8 as i32) << 4) | (h[4] >> 4) as i32,
            h[6] as i8 as i32,
        ]);
        Ok(())
    }

    /// Chip id read at construction
    pub fn chip_id(&self) -> u8 {
        self.chip_id
    }

    /// Factory calibration read at construction
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Whether humidity reads are enabled
    pub fn has_humidity_sensor(&self) -> bool {
        self.has_humidity
    }

    /// Override humidity support
    ///
    /// Enabling humidity on a chip whose humidity calibration was not read at
    /// construction loads it from the chip first. The flag is left unchanged
    /// if that read fails.
    pub fn set_has_humidity_sensor(
        &mut self,
        has_humidity: bool,
    ) -> Result<(), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        if has_humidity && self.calibration.humidity == HumidityCalibration::default() {
            self.read_humidity_calibration()?;
            debug!("BMx280: humidity calibration loaded on override");
        }
        self.has_humidity = has_humidity;
        Ok(())
    }

    /// Whether the bus has not been released yet
    pub fn is_open(&self) -> bool {
        self.i2c.is_some()
    }

    /// Current power mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Set the power mode
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        self.write_ctrl_meas((self.ctrl_meas & !MODE_MASK) | mode.bits())?;
        self.mode = mode;
        Ok(())
    }

    /// Set the temperature oversampling
    pub fn set_temperature_oversampling(
        &mut self,
        oversampling: Oversampling,
    ) -> Result<(), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        let ctrl = (self.ctrl_meas & !(OSRS_MASK << OSRS_T_SHIFT))
            | (oversampling.bits() << OSRS_T_SHIFT);
        self.write_ctrl_meas(ctrl)?;
        self.temperature_oversampling = oversampling;
        Ok(())
    }

    /// Set the pressure oversampling
    pub fn set_pressure_oversampling(
        &mut self,
        oversampling: Oversampling,
    ) -> Result<(), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        let ctrl = (self.ctrl_meas & !(OSRS_MASK << OSRS_P_SHIFT))
            | (oversampling.bits() << OSRS_P_SHIFT);
        self.write_ctrl_meas(ctrl)?;
        self.pressure_oversampling = oversampling;
        Ok(())
    }

    /// Set the humidity oversampling
    ///
    /// `ctrl_hum` only takes effect after the next `ctrl_meas` write, so the
    /// cached `ctrl_meas` is written again.
    pub fn set_humidity_oversampling(
        &mut self,
        oversampling: Oversampling,
    ) -> Result<(), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        if !self.has_humidity {
            return Err(InvalidState::NoHumiditySensor.into());
        }
        self.write_register(REG_CTRL_HUM, oversampling.bits() & OSRS_MASK)?;
        self.write_ctrl_meas(self.ctrl_meas)?;
        self.humidity_oversampling = oversampling;
        Ok(())
    }

    /// Apply all oversampling settings and the mode
    pub fn apply_config(&mut self, config: &Bmx280Config) -> Result<(), Bmx280Error<I::Error>> {
        self.set_temperature_oversampling(config.temperature_oversampling)?;
        self.set_pressure_oversampling(config.pressure_oversampling)?;
        if self.has_humidity {
            self.set_humidity_oversampling(config.humidity_oversampling)?;
        }
        self.set_mode(config.mode)
    }

    /// Read the temperature in degrees Celsius
    pub fn read_temperature(&mut self) -> Result<f32, Bmx280Error<I::Error>> {
        self.ensure_temperature_enabled()?;
        Ok(self.read_compensated_temperature()?.celsius)
    }

    /// Read the pressure in hectopascals
    pub fn read_pressure(&mut self) -> Result<f32, Bmx280Error<I::Error>> {
        self.read_temperature_and_pressure().map(|(_, pressure)| pressure)
    }

    /// Read temperature (°C) and pressure (hPa) from the same cycle
    pub fn read_temperature_and_pressure(&mut self) -> Result<(f32, f32), Bmx280Error<I::Error>> {
        self.ensure_temperature_enabled()?;
        if self.pressure_oversampling.is_skipped() {
            return Err(InvalidState::PressureOversamplingSkipped.into());
        }
        let temperature = self.read_compensated_temperature()?;
        let pressure = self.read_compensated_pressure(temperature.fine)?;
        Ok((temperature.celsius, pressure))
    }

    /// Read the relative humidity in percent
    pub fn read_humidity(&mut self) -> Result<f32, Bmx280Error<I::Error>> {
        self.read_temperature_and_humidity().map(|(_, humidity)| humidity)
    }

    /// Read temperature (°C) and relative humidity (%RH) from the same cycle
    pub fn read_temperature_and_humidity(&mut self) -> Result<(f32, f32), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        if !self.has_humidity {
            return Err(InvalidState::NoHumiditySensor.into());
        }
        self.ensure_temperature_enabled()?;
        if self.humidity_oversampling.is_skipped() {
            return Err(InvalidState::HumidityOversamplingSkipped.into());
        }
        let temperature = self.read_compensated_temperature()?;
        let humidity = self.read_compensated_humidity(temperature.fine)?;
        Ok((temperature.celsius, humidity))
    }

    /// Read every enabled quantity into a [`Measurement`]
    ///
    /// Temperature must be enabled; pressure and humidity are included when
    /// their oversampling is configured.
    pub fn read_measurement(&mut self) -> Result<Measurement, Bmx280Error<I::Error>> {
        self.ensure_temperature_enabled()?;
        let temperature = self.read_compensated_temperature()?;

        let pressure_hpa = if self.pressure_oversampling.is_skipped() {
            None
        } else {
            Some(self.read_compensated_pressure(temperature.fine)?)
        };
        let humidity_rh = if self.has_humidity && !self.humidity_oversampling.is_skipped() {
            Some(self.read_compensated_humidity(temperature.fine)?)
        } else {
            None
        };

        Ok(Measurement {
            sensor_id: self.sensor_kind(),
            temperature_c: temperature.celsius,
            pressure_hpa,
            humidity_rh,
        })
    }

    /// Close the driver and release the bus
    ///
    /// Returns the bus on the first call and `None` afterwards.
    pub fn close(&mut self) -> Option<I> {
        let i2c = self.i2c.take();
        if i2c.is_some() {
            debug!("BMx280: closed");
        }
        i2c
    }

    fn sensor_kind(&self) -> SensorId {
        if self.has_humidity {
            SensorId::BME280
        } else {
            SensorId::BMP280
        }
    }

    fn ensure_open(&self) -> Result<(), Bmx280Error<I::Error>> {
        if self.i2c.is_none() {
            return Err(InvalidState::NotOpen(RESOURCE).into());
        }
        Ok(())
    }

    fn ensure_temperature_enabled(&self) -> Result<(), Bmx280Error<I::Error>> {
        self.ensure_open()?;
        if self.temperature_oversampling.is_skipped() {
            return Err(InvalidState::TemperatureOversamplingSkipped.into());
        }
        Ok(())
    }

    fn read_compensated_temperature(
        &mut self,
    ) -> Result<CompensatedTemperature, Bmx280Error<I::Error>> {
        let raw = self.read_sample(REG_TEMPERATURE)?;
        let temperature = self.calibration.temperature.compensate(raw);
        trace!("BMx280: raw temperature {}, {} C", raw, temperature.celsius);
        Ok(temperature)
    }

    fn read_compensated_pressure(&mut self, fine: f32) -> Result<f32, Bmx280Error<I::Error>> {
        let raw = self.read_sample(REG_PRESSURE)?;
        Ok(self.calibration.pressure.compensate(raw, fine))
    }

    fn read_compensated_humidity(&mut self, fine: f32) -> Result<f32, Bmx280Error<I::Error>> {
        let mut buf = [0u8; 2];
        self.read_registers(REG_HUMIDITY, &mut buf)?;
        let raw = u16::from_be_bytes(buf) as i32;
        Ok(self.calibration.humidity.compensate(raw, fine))
    }

    /// Read a 20-bit sample (msb, lsb, xlsb[7:4])
    fn read_sample(&mut self, register: u8) -> Result<i32, Bmx280Error<I::Error>> {
        let mut buf = [0u8; 3];
        self.read_registers(register, &mut buf)?;
        Ok(((buf[0] as i32) << 12) | ((buf[1] as i32) << 4) | ((buf[2] as i32) >> 4))
    }

    fn write_ctrl_meas(&mut self, value: u8) -> Result<(), Bmx280Error<I::Error>> {
        self.write_register(REG_CTRL_MEAS, value)?;
        self.ctrl_meas = value;
        Ok(())
    }

    fn read_registers(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Bmx280Error<I::Error>> {
        let address = self.address;
        let Some(i2c) = self.i2c.as_mut() else {
            return Err(InvalidState::NotOpen(RESOURCE).into());
        };
        i2c.write_read(address, &[register], buf).map_err(Bmx280Error::Bus)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Bmx280Error<I::Error>> {
        let address = self.address;
        let Some(i2c) = self.i2c.as_mut() else {
            return Err(InvalidState::NotOpen(RESOURCE).into());
        };
        i2c.write(address, &[register, value]).map_err(Bmx280Error::Bus)
    }
}

impl<I: I2c> TemperatureSensor for Bmx280<I> {
    type Error = Bmx280Error<I::Error>;

    fn read_temperature(&mut self) -> Result<f32, Self::Error> {
        Bmx280::<I>::read_temperature(self)
    }

    fn sensor_id(&self) -> SensorId {
        self.sensor_kind()
    }

    fn read_measurement(&mut self) -> Result<Measurement, Self::Error> {
        Bmx280::<I>::read_measurement(self)
    }
}

impl<I: I2c> PressureSensor for Bmx280<I> {
    fn read_pressure(&mut self) -> Result<f32, Self::Error> {
        Bmx280::<I>::read_pressure(self)
    }
}

impl<I: I2c> HumiditySensor for Bmx280<I> {
    fn read_humidity(&mut self) -> Result<f32, Self::Error> {
        Bmx280::<I>::read_humidity(self)
    }
}

impl<I: I2c> ModeControl for Bmx280<I> {
    type Error = Bmx280Error<I::Error>;

    fn set_mode(&mut self, mode: Mode) -> Result<(), Self::Error> {
        Bmx280::<I>::set_mode(self, mode)
    }
}
