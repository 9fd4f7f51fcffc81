//! LIS2MDL 3-axis magnetometer
//!
//! Output and offset registers are little-endian (low byte at the lower address), unlike
//! the other devices in this crate.

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

use super::Vector3;
use crate::field::{
    Bit, Bits, ByteOrder, Int, ReadOnly, ReadWrite, RegisterField, WritableField,
};
use crate::Error;

/// Fixed I2C address
pub const LIS2MDL_ADDRESS: u8 = 0x1E;

/// Expected `WHO_AM_I` value
pub const WHO_AM_I_VALUE: u8 = 0x40;

/// Magnetic sensitivity in milligauss per LSB
pub const MILLIGAUSS_PER_LSB: f32 = 1.5;

/// Time for the registers to settle after a soft reset
const RESET_DELAY_MS: u32 = 5;

/// LIS2MDL register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Hard-iron offset X (low byte)
    OffsetXL = 0x45,
    /// Hard-iron offset Y (low byte)
    OffsetYL = 0x47,
    /// Hard-iron offset Z (low byte)
    OffsetZL = 0x49,
    /// Device identity
    WhoAmI = 0x4F,
    /// Mode, data rate, low power, reset, temperature compensation
    CfgA = 0x60,
    /// Low-pass filter and offset cancellation
    CfgB = 0x61,
    /// Interface and data-update options
    CfgC = 0x62,
    /// Data status
    Status = 0x67,
    /// Magnetic output X (low byte)
    OutXL = 0x68,
    /// Magnetic output Y (low byte)
    OutYL = 0x6A,
    /// Magnetic output Z (low byte)
    OutZL = 0x6C,
    /// Temperature output (low byte)
    TempOutL = 0x6E,
}

impl Register {
    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

const fn le_i16<A: crate::field::Access>(register: Register) -> Int<i16, A> {
    Int::new(register.addr()).with_order(ByteOrder::LittleEndian)
}

const OFFSET_X: Int<i16, ReadWrite> = le_i16(Register::OffsetXL);
const OFFSET_Y: Int<i16, ReadWrite> = le_i16(Register::OffsetYL);
const OFFSET_Z: Int<i16, ReadWrite> = le_i16(Register::OffsetZL);

const WHO_AM_I: Bits<ReadOnly> = Bits::new(Register::WhoAmI.addr(), 1, 0, 7);

const MD: Bits<ReadWrite> = Bits::new(Register::CfgA.addr(), 1, 0, 1);
const ODR: Bits<ReadWrite> = Bits::new(Register::CfgA.addr(), 1, 2, 3);
const LP: Bit<ReadWrite> = Bit::new(Register::CfgA.addr(), 1, 4);
const SOFT_RST: Bit<ReadWrite> = Bit::new(Register::CfgA.addr(), 1, 5);
const COMP_TEMP_EN: Bit<ReadWrite> = Bit::new(Register::CfgA.addr(), 1, 7);

const LPF: Bit<ReadWrite> = Bit::new(Register::CfgB.addr(), 1, 0);
const OFF_CANC: Bit<ReadWrite> = Bit::new(Register::CfgB.addr(), 1, 1);

const BDU: Bit<ReadWrite> = Bit::new(Register::CfgC.addr(), 1, 4);

const ZYXDA: Bit<ReadOnly> = Bit::new(Register::Status.addr(), 1, 3);

const OUT_X: Int<i16, ReadOnly> = le_i16(Register::OutXL);
const OUT_Y: Int<i16, ReadOnly> = le_i16(Register::OutYL);
const OUT_Z: Int<i16, ReadOnly> = le_i16(Register::OutZL);
const TEMP_OUT: Int<i16, ReadOnly> = le_i16(Register::TempOutL);

/// Operating mode, `MD`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Continuous conversion
    Continuous = 0,
    /// One conversion, then idle
    Single = 1,
    /// Idle (power-on default)
    Idle = 3,
}

/// Output data rate, `ODR`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 10 Hz
    Hz10 = 0,
    /// 20 Hz
    Hz20 = 1,
    /// 50 Hz
    Hz50 = 2,
    /// 100 Hz
    Hz100 = 3,
}

/// Convert a raw magnetic count to milligauss
#[must_use]
pub fn milligauss_from_raw(raw: i16) -> f32 {
    f32::from(raw) * MILLIGAUSS_PER_LSB
}

/// Convert a raw temperature count to °C
///
/// The output is relative: 8 LSB/°C around an uncalibrated 25 °C.
#[must_use]
pub fn temperature_from_raw(raw: i16) -> f32 {
    f32::from(raw) / 8.0 + 25.0
}

/// Compass heading in degrees, `[0, 360)`, from the horizontal field components
#[must_use]
pub fn heading_degrees(x: f32, y: f32) -> f32 {
    let heading = libm::atan2f(y, x).to_degrees();
    if heading < 0.0 { heading + 360.0 } else { heading }
}

/// LIS2MDL driver
pub struct Lis2mdl<I> {
    interface: I,
}

impl<I> Lis2mdl<I> {
    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.interface
    }
}

#[cfg(not(feature = "async"))]
impl<I> Lis2mdl<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a driver and verify `WHO_AM_I`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if `WHO_AM_I` is not 0x40, or an error if
    /// communication fails.
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self { interface };
        let who_am_i = WHO_AM_I.read(&mut driver.interface)? as u8;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }
        Ok(driver)
    }

    /// Reset the configuration registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        SOFT_RST.write(&mut self.interface, true)?;
        delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Set the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<I::Error>> {
        MD.write(&mut self.interface, mode as u32)
    }

    /// Set the output data rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<I::Error>> {
        ODR.write(&mut self.interface, rate as u32)
    }

    /// Enable low-power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_low_power(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        LP.write(&mut self.interface, enable)
    }

    /// Enable temperature compensation of the magnetic outputs
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_temperature_compensation(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        COMP_TEMP_EN.write(&mut self.interface, enable)
    }

    /// Enable the digital low-pass filter
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_low_pass_filter(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        LPF.write(&mut self.interface, enable)
    }

    /// Enable offset cancellation
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_offset_cancellation(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        OFF_CANC.write(&mut self.interface, enable)
    }

    /// Enable block data update (outputs not updated until both bytes are read)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_block_data_update(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        BDU.write(&mut self.interface, enable)
    }

    /// Whether a new X/Y/Z sample is available
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        ZYXDA.read(&mut self.interface)
    }

    /// Raw magnetic counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_raw(&mut self) -> Result<[i16; 3], Error<I::Error>> {
        Ok([
            OUT_X.read(&mut self.interface)?,
            OUT_Y.read(&mut self.interface)?,
            OUT_Z.read(&mut self.interface)?,
        ])
    }

    /// Magnetic field in milligauss
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_magnetic_field(&mut self) -> Result<Vector3, Error<I::Error>> {
        let [x, y, z] = self.read_raw()?;
        Ok(Vector3::new(
            milligauss_from_raw(x),
            milligauss_from_raw(y),
            milligauss_from_raw(z),
        ))
    }

    /// Compass heading in degrees, assuming the device is level
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_heading(&mut self) -> Result<f32, Error<I::Error>> {
        let field = self.read_magnetic_field()?;
        Ok(heading_degrees(field.x, field.y))
    }

    /// Die temperature in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(temperature_from_raw(TEMP_OUT.read(&mut self.interface)?))
    }

    /// Hard-iron offsets in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn hard_iron_offset(&mut self) -> Result<[i16; 3], Error<I::Error>> {
        Ok([
            OFFSET_X.read(&mut self.interface)?,
            OFFSET_Y.read(&mut self.interface)?,
            OFFSET_Z.read(&mut self.interface)?,
        ])
    }

    /// Set the hard-iron offsets in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_hard_iron_offset(&mut self, offset: [i16; 3]) -> Result<(), Error<I::Error>> {
        let [x, y, z] = offset;
        OFFSET_X.write(&mut self.interface, x)?;
        OFFSET_Y.write(&mut self.interface, y)?;
        OFFSET_Z.write(&mut self.interface, z)
    }
}

#[cfg(feature = "async")]
impl<I> Lis2mdl<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a driver and verify `WHO_AM_I`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if `WHO_AM_I` is not 0x40, or an error if
    /// communication fails.
    pub async fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self { interface };
        let who_am_i = WHO_AM_I.read(&mut driver.interface).await? as u8;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }
        Ok(driver)
    }

    /// Reset the configuration registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        SOFT_RST.write(&mut self.interface, true).await?;
        delay.delay_ms(RESET_DELAY_MS).await;
        Ok(())
    }

    /// Set the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Error<I::Error>> {
        MD.write(&mut self.interface, mode as u32).await
    }

    /// Set the output data rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<I::Error>> {
        ODR.write(&mut self.interface, rate as u32).await
    }

    /// Enable low-power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_low_power(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        LP.write(&mut self.interface, enable).await
    }

    /// Enable temperature compensation of the magnetic outputs
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_temperature_compensation(
        &mut self,
        enable: bool,
    ) -> Result<(), Error<I::Error>> {
        COMP_TEMP_EN.write(&mut self.interface, enable).await
    }

    /// Enable the digital low-pass filter
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_low_pass_filter(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        LPF.write(&mut self.interface, enable).await
    }

    /// Enable offset cancellation
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_offset_cancellation(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        OFF_CANC.write(&mut self.interface, enable).await
    }

    /// Enable block data update
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_block_data_update(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        BDU.write(&mut self.interface, enable).await
    }

    /// Whether a new X/Y/Z sample is available
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        ZYXDA.read(&mut self.interface).await
    }

    /// Raw magnetic counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_raw(&mut self) -> Result<[i16; 3], Error<I::Error>> {
        let x = OUT_X.read(&mut self.interface).await?;
        let y = OUT_Y.read(&mut self.interface).await?;
        let z = OUT_Z.read(&mut self.interface).await?;
        Ok([x, y, z])
    }

    /// Magnetic field in milligauss
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_magnetic_field(&mut self) -> Result<Vector3, Error<I::Error>> {
        let [x, y, z] = self.read_raw().await?;
        Ok(Vector3::new(
            milligauss_from_raw(x),
            milligauss_from_raw(y),
            milligauss_from_raw(z),
        ))
    }

    /// Compass heading in degrees, assuming the device is level
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_heading(&mut self) -> Result<f32, Error<I::Error>> {
        let field = self.read_magnetic_field().await?;
        Ok(heading_degrees(field.x, field.y))
    }

    /// Die temperature in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(temperature_from_raw(
            TEMP_OUT.read(&mut self.interface).await?,
        ))
    }

    /// Hard-iron offsets in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn hard_iron_offset(&mut self) -> Result<[i16; 3], Error<I::Error>> {
        let x = OFFSET_X.read(&mut self.interface).await?;
        let y = OFFSET_Y.read(&mut self.interface).await?;
        let z = OFFSET_Z.read(&mut self.interface).await?;
        Ok([x, y, z])
    }

    /// Set the hard-iron offsets in raw counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_hard_iron_offset(&mut self, offset: [i16; 3]) -> Result<(), Error<I::Error>> {
        let [x, y, z] = offset;
        OFFSET_X.write(&mut self.interface, x).await?;
        OFFSET_Y.write(&mut self.interface, y).await?;
        OFFSET_Z.write(&mut self.interface, z).await
    }
}
