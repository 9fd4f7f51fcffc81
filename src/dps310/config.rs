//! DPS310 configuration types

use crate::ConfigError;
use crate::sign::SignConvention;

/// Oversampling (precision) setting, `PM_PRC` / `TMP_PRC`
///
/// Higher settings lower noise at the cost of conversion time. Above 8x the result no
/// longer fits the output registers without the device's internal bit-shift, see
/// [`Oversampling::shift_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// Single sample
    #[default]
    X1 = 0,
    /// 2 samples
    X2 = 1,
    /// 4 samples
    X4 = 2,
    /// 8 samples
    X8 = 3,
    /// 16 samples
    X16 = 4,
    /// 32 samples
    X32 = 5,
    /// 64 samples
    X64 = 6,
    /// 128 samples
    X128 = 7,
}

impl Oversampling {
    /// Compensation scale factor (kP / kT) for this setting
    #[must_use]
    pub const fn scale_factor(self) -> u32 {
        match self {
            Self::X1 => 524_288,
            Self::X2 => 1_572_864,
            Self::X4 => 3_670_016,
            Self::X8 => 7_864_320,
            Self::X16 => 253_952,
            Self::X32 => 516_096,
            Self::X64 => 1_040_384,
            Self::X128 => 2_088_960,
        }
    }

    /// Whether the result bit-shift must be enabled (settings 4-7)
    #[must_use]
    pub const fn shift_enabled(self) -> bool {
        self as u8 >= 4
    }

    /// Register encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Number of samples per measurement
    #[must_use]
    pub const fn samples(self) -> u8 {
        1 << (self as u8)
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::X1),
            1 => Ok(Self::X2),
            2 => Ok(Self::X4),
            3 => Ok(Self::X8),
            4 => Ok(Self::X16),
            5 => Ok(Self::X32),
            6 => Ok(Self::X64),
            7 => Ok(Self::X128),
            other => Err(ConfigError::InvalidOversampling(other)),
        }
    }
}

/// Background measurement rate, `PM_RATE` / `TMP_RATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementRate {
    /// 1 measurement per second
    #[default]
    Hz1 = 0,
    /// 2 per second
    Hz2 = 1,
    /// 4 per second
    Hz4 = 2,
    /// 8 per second
    Hz8 = 3,
    /// 16 per second
    Hz16 = 4,
    /// 32 per second
    Hz32 = 5,
    /// 64 per second
    Hz64 = 6,
    /// 128 per second
    Hz128 = 7,
}

impl MeasurementRate {
    /// Register encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Measurements per second
    #[must_use]
    pub const fn per_second(self) -> u8 {
        1 << (self as u8)
    }
}

/// Measurement mode, `MEAS_CTRL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// Standby, no measurements
    Idle = 0b000,
    /// One pressure measurement, then standby
    PressureOnce = 0b001,
    /// One temperature measurement, then standby
    TemperatureOnce = 0b010,
    /// Continuous pressure measurements
    ContinuousPressure = 0b101,
    /// Continuous temperature measurements
    ContinuousTemperature = 0b110,
    /// Continuous pressure and temperature measurements
    #[default]
    Continuous = 0b111,
}

impl MeasurementMode {
    /// Register encoding
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the mode keeps measuring in the background
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        self as u8 & 0b100 != 0
    }
}

/// DPS310 driver configuration
///
/// Oversampling must be chosen before the first coefficient read; changing it later goes
/// through [`Dps310::configure_oversampling`](super::Dps310::configure_oversampling),
/// which also updates the scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dps310Config {
    /// Pressure oversampling
    pub pressure_oversampling: Oversampling,
    /// Temperature oversampling
    pub temperature_oversampling: Oversampling,
    /// Pressure measurement rate in continuous mode
    pub pressure_rate: MeasurementRate,
    /// Temperature measurement rate in continuous mode
    pub temperature_rate: MeasurementRate,
    /// Mode written during construction
    pub mode: MeasurementMode,
    /// Sign interpretation for coefficients and raw results
    pub sign_convention: SignConvention,
    /// Upper bound on each ready-flag poll, in milliseconds
    pub ready_timeout_ms: u32,
    /// Delay between ready-flag reads, in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for Dps310Config {
    fn default() -> Self {
        Self {
            pressure_oversampling: Oversampling::X1,
            temperature_oversampling: Oversampling::X1,
            pressure_rate: MeasurementRate::Hz1,
            temperature_rate: MeasurementRate::Hz1,
            mode: MeasurementMode::Continuous,
            sign_convention: SignConvention::SignMagnitude,
            ready_timeout_ms: 500,
            poll_interval_ms: 10,
        }
    }
}
