//! Calibration domain service
//!
//! BMx280 chips ship with factory trimming coefficients burned into
//! non-volatile memory. This module holds those coefficients and the
//! datasheet compensation formulas that turn raw ADC counts into physical
//! units. Everything here is pure arithmetic, no bus access.

/// Temperature trimming coefficients `dig_T1..dig_T3`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureCalibration(pub [i32; 3]);

/// Pressure trimming coefficients `dig_P1..dig_P9`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressureCalibration(pub [i32; 9]);

/// Humidity trimming coefficients `dig_H1..dig_H6` (BME280 only)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HumidityCalibration(pub [i32; 6]);

/// Full coefficient set read once from the device
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub temperature: TemperatureCalibration,
    pub pressure: PressureCalibration,
    pub humidity: HumidityCalibration,
}

/// Compensated temperature together with the fine temperature that the
/// pressure and humidity formulas depend on
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompensatedTemperature {
    /// Temperature in degrees Celsius
    pub celsius: f32,
    /// Fine temperature (`t_fine` in the datasheet)
    pub fine: f32,
}

impl TemperatureCalibration {
    /// Convert a raw 20-bit temperature sample
    pub fn compensate(&self, raw: i32) -> CompensatedTemperature {
        let [t1, t2, t3] = self.0;
        let adc = raw as f64;
        let t1 = t1 as f64;

        let var1 = (adc / 16384.0 - t1 / 1024.0) * t2 as f64;
        let d = adc / 131072.0 - t1 / 8192.0;
        let var2 = d * d * t3 as f64;
        let fine = var1 + var2;

        CompensatedTemperature {
            celsius: (fine / 5120.0) as f32,
            fine: fine as f32,
        }
    }
}

impl PressureCalibration {
    /// Convert a raw 20-bit pressure sample to hectopascals
    ///
    /// Returns 0 when the coefficients would cause a division by zero.
    pub fn compensate(&self, raw: i32, fine_temperature: f32) -> f32 {
        let [p1, p2, p3, p4, p5, p6, p7, p8, p9] = self.0.map(|c| c as f64);

        let mut var1 = fine_temperature as f64 / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * p6 / 32768.0;
        var2 += var1 * p5 * 2.0;
        var2 = var2 / 4.0 + p4 * 65536.0;
        var1 = (p3 * var1 * var1 / 524288.0 + p2 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * p1;
        if var1 == 0.0 {
            return 0.0;
        }

        let mut pa = 1048576.0 - raw as f64;
        pa = (pa - var2 / 4096.0) * 6250.0 / var1;
        var1 = p9 * pa * pa / 2147483648.0;
        var2 = pa * p8 / 32768.0;
        pa += (var1 + var2 + p7) / 16.0;

        (pa / 100.0) as f32
    }
}

impl HumidityCalibration {
    /// Convert a raw 16-bit humidity sample to %RH, clamped to `0..=100`
    pub fn compensate(&self, raw: i32, fine_temperature: f32) -> f32 {
        let [h1, h2, h3, h4, h5, h6] = self.0.map(|c| c as f64);

        let mut h = fine_temperature as f64 - 76800.0;
        h = (raw as f64 - (h4 * 64.0 + h5 / 16384.0 * h))
            * (h2 / 65536.0 * (1.0 + h6 / 67108864.0 * h * (1.0 + h3 / 67108864.0 * h)));
        h *= 1.0 - h1 * h / 524288.0;

        if h > 100.0 {
            100.0
        } else if h < 0.0 {
            0.0
        } else {
            h as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference coefficients and samples from the BMP280/BME280 datasheets.
    const TEMP: TemperatureCalibration = TemperatureCalibration([27504, 26435, -1000]);
    const PRESSURE: PressureCalibration =
        PressureCalibration([36477, -10685, 3024, 2855, 140, -7, 15500, -14600, 6000]);
    const HUMIDITY: HumidityCalibration = HumidityCalibration([75, 363, 0, 315, 50, 30]);
    const RAW_TEMPERATURE: i32 = 519888;
    const RAW_PRESSURE: i32 = 415148;
    const RAW_HUMIDITY: i32 = 28437;

    // Datasheet results differ slightly depending on rounding, so allow 0.1%.
    const TOLERANCE: f32 = 0.001;

    fn assert_close(expected: f32, actual: f32) {
        let delta = (expected - actual).abs();
        assert!(
            delta <= (expected * TOLERANCE).abs(),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_compensate_temperature() {
        let t = TEMP.compensate(RAW_TEMPERATURE);
        assert_close(25.08, t.celsius);
        assert_close(128422.0, t.fine);
    }

    #[test]
    fn test_compensate_pressure() {
        let t = TEMP.compensate(RAW_TEMPERATURE);
        assert_close(1006.5327, PRESSURE.compensate(RAW_PRESSURE, t.fine));
    }

    #[test]
    fn test_compensate_humidity() {
        let t = TEMP.compensate(RAW_TEMPERATURE);
        assert_close(45.708218, HUMIDITY.compensate(RAW_HUMIDITY, t.fine));
    }

    #[test]
    fn test_pressure_zero_divisor() {
        let cal = PressureCalibration([0; 9]);
        assert_eq!(cal.compensate(RAW_PRESSURE, 128422.0), 0.0);
    }

    #[test]
    fn test_humidity_clamped() {
        let t = TEMP.compensate(RAW_TEMPERATURE);
        assert_eq!(HUMIDITY.compensate(0, t.fine), 0.0);
        assert_eq!(HUMIDITY.compensate(65535, t.fine), 100.0);
    }
}
