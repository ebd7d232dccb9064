//! Operating mode and oversampling settings

use serde::{Deserialize, Serialize};

/// Power mode shared by the register sensor and the thermostat
///
/// For the BMx280 this maps onto the `mode[1:0]` bits of `ctrl_meas`.
/// For the thermostat, `Sleep` means "serve the cached value".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No measurements are performed
    Sleep,
    /// A single measurement, then back to sleep
    Forced,
    /// Continuous measurement
    #[default]
    Normal,
}

impl Mode {
    /// Register encoding for the BMx280 `ctrl_meas` mode field
    pub const fn bits(self) -> u8 {
        match self {
            Mode::Sleep => 0b00,
            Mode::Forced => 0b01,
            Mode::Normal => 0b11,
        }
    }

    /// Parse a mode name as given on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sleep" => Some(Mode::Sleep),
            "forced" => Some(Mode::Forced),
            "normal" => Some(Mode::Normal),
            _ => None,
        }
    }
}

/// Oversampling level for one measured quantity
///
/// `Skipped` disables the measurement entirely; reads of a skipped
/// quantity are rejected by the drivers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    #[default]
    Skipped,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    /// 3-bit register encoding (`osrs_t`, `osrs_p`, `osrs_h`)
    pub const fn bits(self) -> u8 {
        match self {
            Oversampling::Skipped => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }

    #[inline]
    pub const fn is_skipped(self) -> bool {
        matches!(self, Oversampling::Skipped)
    }
}
