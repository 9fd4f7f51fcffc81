//! MCP9808 digital temperature sensor
//!
//! Ambient temperature is a 13-bit two's complement value in 1/16 °C steps. The three
//! alert limits share one layout: an 11-bit two's complement value in 1/4 °C steps at
//! bits 2-12 of a 16-bit register.

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

use crate::field::{Bits, Int, ReadOnly, ReadWrite, RegisterField, WritableField};
use crate::sign::twos_complement;
use crate::{ConfigError, Error};

/// Lowest address the MCP9808 can be strapped to (A2..A0 low)
pub const MCP9808_ADDRESS: u8 = 0x18;

/// Expected manufacturer ID
pub const MANUFACTURER_ID_VALUE: u16 = 0x0054;

/// Expected device ID (upper byte of the device ID register)
pub const DEVICE_ID_VALUE: u8 = 0x04;

/// Largest alert limit magnitude in °C
pub const LIMIT_MAX_CELSIUS: f32 = 255.75;

/// MCP9808 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Alert upper boundary
    UpperLimit = 0x02,
    /// Alert lower boundary
    LowerLimit = 0x03,
    /// Critical temperature
    CriticalLimit = 0x04,
    /// Ambient temperature
    AmbientTemperature = 0x05,
    /// Manufacturer ID
    ManufacturerId = 0x06,
    /// Device ID and revision
    DeviceId = 0x07,
    /// Conversion resolution
    Resolution = 0x08,
}

impl Register {
    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

const AMBIENT: Bits<ReadOnly> = Bits::new(Register::AmbientTemperature.addr(), 2, 0, 12);
const MANUFACTURER_ID: Int<u16, ReadOnly> = Int::new(Register::ManufacturerId.addr());
const DEVICE_ID: Bits<ReadOnly> = Bits::new(Register::DeviceId.addr(), 2, 8, 15);
const REVISION: Bits<ReadOnly> = Bits::new(Register::DeviceId.addr(), 2, 0, 7);
const RESOLUTION: Bits<ReadWrite> = Bits::new(Register::Resolution.addr(), 1, 0, 1);

/// Temperature conversion resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 0.5 °C, 30 ms conversion
    Half = 0,
    /// 0.25 °C, 65 ms conversion
    Quarter = 1,
    /// 0.125 °C, 130 ms conversion
    Eighth = 2,
    /// 0.0625 °C, 250 ms conversion (power-on default)
    #[default]
    Sixteenth = 3,
}

impl Resolution {
    /// Step size in °C
    #[must_use]
    pub const fn step_celsius(self) -> f32 {
        match self {
            Self::Half => 0.5,
            Self::Quarter => 0.25,
            Self::Eighth => 0.125,
            Self::Sixteenth => 0.0625,
        }
    }

    const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Half,
            1 => Self::Quarter,
            2 => Self::Eighth,
            _ => Self::Sixteenth,
        }
    }
}

/// Alert limit registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Limit {
    /// `T_UPPER`
    Upper,
    /// `T_LOWER`
    Lower,
    /// `T_CRIT`
    Critical,
}

impl Limit {
    const fn field(self) -> Bits<ReadWrite> {
        let register = match self {
            Self::Upper => Register::UpperLimit,
            Self::Lower => Register::LowerLimit,
            Self::Critical => Register::CriticalLimit,
        };
        Bits::new(register.addr(), 2, 2, 12)
    }
}

/// Whether `address` is one of the eight MCP9808 addresses (0x18-0x1F)
#[must_use]
pub const fn is_valid_address(address: u8) -> bool {
    matches!(address, 0x18..=0x1F)
}

/// Convert the ambient temperature field to °C
#[must_use]
pub fn ambient_from_raw(raw: u32) -> f32 {
    twos_complement(raw, 13) as f32 / 16.0
}

/// Convert an alert limit field to °C
#[must_use]
pub fn limit_from_raw(raw: u32) -> f32 {
    twos_complement(raw, 11) as f32 / 4.0
}

/// Encode a limit in °C as an alert limit field
///
/// # Errors
///
/// Returns [`ConfigError::OutOfRange`] outside ±255.75 °C or if `celsius` is not a
/// multiple of 0.25 °C.
pub fn limit_to_raw(celsius: f32) -> Result<u32, ConfigError> {
    if !(-LIMIT_MAX_CELSIUS..=LIMIT_MAX_CELSIUS).contains(&celsius) {
        return Err(ConfigError::OutOfRange);
    }
    let quarters = celsius * 4.0;
    if libm::roundf(quarters) != quarters {
        return Err(ConfigError::OutOfRange);
    }
    Ok((quarters as i32 as u32) & 0x7FF)
}

/// MCP9808 driver
pub struct Mcp9808<I> {
    interface: I,
}

impl<I> Mcp9808<I> {
    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.interface
    }
}

#[cfg(not(feature = "async"))]
impl<I> Mcp9808<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a driver and verify the device ID
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the device ID read if it is not an MCP9808,
    /// or an error if communication fails.
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self { interface };
        let device_id = driver.device_id()?;
        if device_id != DEVICE_ID_VALUE {
            return Err(Error::InvalidDevice(device_id));
        }
        Ok(driver)
    }

    /// Ambient temperature in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(ambient_from_raw(AMBIENT.read(&mut self.interface)?))
    }

    /// Ambient temperature in °F
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature_fahrenheit(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(self.read_temperature()? * 9.0 / 5.0 + 32.0)
    }

    /// Manufacturer ID (0x0054)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn manufacturer_id(&mut self) -> Result<u16, Error<I::Error>> {
        MANUFACTURER_ID.read(&mut self.interface)
    }

    /// Device ID (0x04)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn device_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(DEVICE_ID.read(&mut self.interface)? as u8)
    }

    /// Silicon revision
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn revision(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(REVISION.read(&mut self.interface)? as u8)
    }

    /// Current conversion resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn resolution(&mut self) -> Result<Resolution, Error<I::Error>> {
        Ok(Resolution::from_bits(RESOLUTION.read(&mut self.interface)?))
    }

    /// Set the conversion resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<I::Error>> {
        RESOLUTION.write(&mut self.interface, resolution as u32)
    }

    /// Read an alert limit in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn limit(&mut self, limit: Limit) -> Result<f32, Error<I::Error>> {
        Ok(limit_from_raw(limit.field().read(&mut self.interface)?))
    }

    /// Set an alert limit in °C
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `celsius` cannot be represented (see
    /// [`limit_to_raw`]), or an error if communication fails.
    pub fn set_limit(&mut self, limit: Limit, celsius: f32) -> Result<(), Error<I::Error>> {
        let raw = limit_to_raw(celsius).map_err(Error::<I::Error>::InvalidConfig)?;
        limit.field().write(&mut self.interface, raw)
    }
}

#[cfg(feature = "async")]
impl<I> Mcp9808<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a driver and verify the device ID
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the device ID read if it is not an MCP9808,
    /// or an error if communication fails.
    pub async fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self { interface };
        let device_id = driver.device_id().await?;
        if device_id != DEVICE_ID_VALUE {
            return Err(Error::InvalidDevice(device_id));
        }
        Ok(driver)
    }

    /// Ambient temperature in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(ambient_from_raw(AMBIENT.read(&mut self.interface).await?))
    }

    /// Ambient temperature in °F
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_temperature_fahrenheit(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(self.read_temperature().await? * 9.0 / 5.0 + 32.0)
    }

    /// Manufacturer ID (0x0054)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn manufacturer_id(&mut self) -> Result<u16, Error<I::Error>> {
        MANUFACTURER_ID.read(&mut self.interface).await
    }

    /// Device ID (0x04)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn device_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(DEVICE_ID.read(&mut self.interface).await? as u8)
    }

    /// Silicon revision
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn revision(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(REVISION.read(&mut self.interface).await? as u8)
    }

    /// Current conversion resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn resolution(&mut self) -> Result<Resolution, Error<I::Error>> {
        Ok(Resolution::from_bits(
            RESOLUTION.read(&mut self.interface).await?,
        ))
    }

    /// Set the conversion resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<I::Error>> {
        RESOLUTION
            .write(&mut self.interface, resolution as u32)
            .await
    }

    /// Read an alert limit in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn limit(&mut self, limit: Limit) -> Result<f32, Error<I::Error>> {
        Ok(limit_from_raw(limit.field().read(&mut self.interface).await?))
    }

    /// Set an alert limit in °C
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `celsius` cannot be represented (see
    /// [`limit_to_raw`]), or an error if communication fails.
    pub async fn set_limit(&mut self, limit: Limit, celsius: f32) -> Result<(), Error<I::Error>> {
        let raw = limit_to_raw(celsius).map_err(Error::<I::Error>::InvalidConfig)?;
        limit.field().write(&mut self.interface, raw).await
    }
}
