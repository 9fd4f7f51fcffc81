//! DPS310 scale factors and compensation polynomial

use super::coefficients::Coefficients;
use super::config::Oversampling;
use super::registers::RESULT_BLOCK_LEN;
use crate::sign::SignConvention;

/// Divisor from pascal to the display unit used by [`Measurement::display_pressure`]
pub const DISPLAY_PRESSURE_DIVISOR: f64 = 68.948;

/// Scale factors and shift flags resolved from the oversampling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleFactors {
    /// Pressure scale factor kP
    pub kp: u32,
    /// Temperature scale factor kT
    pub kt: u32,
    /// Value for `P_SHIFT`
    pub pressure_shift: bool,
    /// Value for `T_SHIFT`
    pub temperature_shift: bool,
}

impl ScaleFactors {
    /// Resolve scale factors for independent pressure and temperature settings
    #[must_use]
    pub const fn resolve(pressure: Oversampling, temperature: Oversampling) -> Self {
        Self {
            kp: pressure.scale_factor(),
            kt: temperature.scale_factor(),
            pressure_shift: pressure.shift_enabled(),
            temperature_shift: temperature.shift_enabled(),
        }
    }
}

/// Raw 24-bit pressure and temperature counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Raw pressure count
    pub pressure: i32,
    /// Raw temperature count
    pub temperature: i32,
}

impl RawSample {
    /// Decode the six result bytes (`PSR_B2..TMP_B0`)
    #[must_use]
    pub fn from_bytes(bytes: &[u8; RESULT_BLOCK_LEN], convention: SignConvention) -> Self {
        let word = |i: usize| {
            (u32::from(bytes[i]) << 16) | (u32::from(bytes[i + 1]) << 8) | u32::from(bytes[i + 2])
        };
        Self {
            pressure: convention.decode(word(0), 24),
            temperature: convention.decode(word(3), 24),
        }
    }
}

/// Pressure output units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureUnit {
    /// Pascal
    Pascal,
    /// Hectopascal (millibar)
    Hectopascal,
    /// Pascal divided by 68.948
    #[default]
    Display,
}

/// Compensated measurement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Compensated pressure in pascal
    pub pressure_pa: f64,
    /// Scaled temperature (raw count / kT)
    pub temperature: f64,
}

impl Measurement {
    /// Pressure in the display unit (pascal / 68.948)
    #[must_use]
    pub fn display_pressure(&self) -> f64 {
        self.pressure_pa / DISPLAY_PRESSURE_DIVISOR
    }

    /// Pressure in `unit`
    #[must_use]
    pub fn pressure_in(&self, unit: PressureUnit) -> f64 {
        match unit {
            PressureUnit::Pascal => self.pressure_pa,
            PressureUnit::Hectopascal => self.pressure_pa / 100.0,
            PressureUnit::Display => self.display_pressure(),
        }
    }
}

/// Apply the compensation polynomial to a raw sample
///
/// ```text
/// Psc   = P / kP
/// Tsc   = T / kT
/// Pcomp = c00 + Psc*(c10 + Psc*(c20 + Psc*c30)) + Tsc*(c01 + Psc*(c11 + Psc*c21))
/// ```
///
/// The temperature output is `Tsc` directly.
#[must_use]
pub fn compensate(
    coefficients: &Coefficients,
    scale: &ScaleFactors,
    sample: RawSample,
) -> Measurement {
    let c = |value: i32| f64::from(value);

    let p = f64::from(sample.pressure) / f64::from(scale.kp);
    let t = f64::from(sample.temperature) / f64::from(scale.kt);

    let pressure_pa = c(coefficients.c00)
        + p * (c(coefficients.c10) + p * (c(coefficients.c20) + p * c(coefficients.c30)))
        + t * (c(coefficients.c01) + p * (c(coefficients.c11) + p * c(coefficients.c21)));

    Measurement {
        pressure_pa,
        temperature: t,
    }
}
