//! MPU6050 6-axis IMU
//!
//! Outputs are 16-bit big-endian two's complement registers. The full-scale settings are
//! cached in the driver so a reading costs one bus transaction per axis.

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

use super::Vector3;
use crate::batch::TransactionBatch;
use crate::field::{Bit, Bits, FieldValue, Int, ReadOnly, ReadWrite, RegisterField, WritableField};
use crate::interface::Addressed;
use crate::{ConfigError, Error};

/// Default I2C address (AD0 low)
pub const MPU6050_ADDRESS: u8 = 0x68;

/// Alternative I2C address (AD0 high)
pub const MPU6050_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Expected `WHO_AM_I` value
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// Time for the device to come back after a reset
const RESET_DELAY_MS: u32 = 100;

/// MPU6050 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Sample rate divider
    SmplrtDiv = 25,
    /// Digital low-pass filter
    Config = 26,
    /// Gyroscope full scale
    GyroConfig = 27,
    /// Accelerometer full scale
    AccelConfig = 28,
    /// Accelerometer X output
    AccelXout = 59,
    /// Accelerometer Y output
    AccelYout = 61,
    /// Accelerometer Z output
    AccelZout = 63,
    /// Temperature output
    TempOut = 65,
    /// Gyroscope X output
    GyroXout = 67,
    /// Gyroscope Y output
    GyroYout = 69,
    /// Gyroscope Z output
    GyroZout = 71,
    /// Power management and clock source
    PwrMgmt1 = 107,
    /// Device identity
    WhoAmI = 117,
}

impl Register {
    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

const SMPLRT_DIV: Int<u8, ReadWrite> = Int::new(Register::SmplrtDiv.addr());
const DLPF_CFG: Bits<ReadWrite> = Bits::new(Register::Config.addr(), 1, 0, 2);
const FS_SEL: Bits<ReadWrite> = Bits::new(Register::GyroConfig.addr(), 1, 3, 4);
const AFS_SEL: Bits<ReadWrite> = Bits::new(Register::AccelConfig.addr(), 1, 3, 4);

const ACCEL_X: Int<i16, ReadOnly> = Int::new(Register::AccelXout.addr());
const ACCEL_Y: Int<i16, ReadOnly> = Int::new(Register::AccelYout.addr());
const ACCEL_Z: Int<i16, ReadOnly> = Int::new(Register::AccelZout.addr());
const TEMP_OUT: Int<i16, ReadOnly> = Int::new(Register::TempOut.addr());
const GYRO_X: Int<i16, ReadOnly> = Int::new(Register::GyroXout.addr());
const GYRO_Y: Int<i16, ReadOnly> = Int::new(Register::GyroYout.addr());
const GYRO_Z: Int<i16, ReadOnly> = Int::new(Register::GyroZout.addr());

const CLKSEL: Bits<ReadWrite> = Bits::new(Register::PwrMgmt1.addr(), 1, 0, 2);
const SLEEP: Bit<ReadWrite> = Bit::new(Register::PwrMgmt1.addr(), 1, 6);
const DEVICE_RESET: Bit<ReadWrite> = Bit::new(Register::PwrMgmt1.addr(), 1, 7);

const WHO_AM_I: Bits<ReadOnly> = Bits::new(Register::WhoAmI.addr(), 1, 0, 6);

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroFullScale {
    /// ±250 °/s
    #[default]
    Dps250 = 0,
    /// ±500 °/s
    Dps500 = 1,
    /// ±1000 °/s
    Dps1000 = 2,
    /// ±2000 °/s
    Dps2000 = 3,
}

impl GyroFullScale {
    /// Sensitivity in LSB per °/s (131 / 2^setting)
    #[must_use]
    pub fn sensitivity(self) -> f32 {
        131.0 / f32::from(1u8 << (self as u8))
    }

    const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Dps250,
            1 => Self::Dps500,
            2 => Self::Dps1000,
            _ => Self::Dps2000,
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelFullScale {
    /// ±2 g
    #[default]
    G2 = 0,
    /// ±4 g
    G4 = 1,
    /// ±8 g
    G8 = 2,
    /// ±16 g
    G16 = 3,
}

impl AccelFullScale {
    /// Sensitivity in LSB per g (16384 / 2^setting)
    #[must_use]
    pub fn sensitivity(self) -> f32 {
        16384.0 / f32::from(1u8 << (self as u8))
    }

    const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::G2,
            1 => Self::G4,
            2 => Self::G8,
            _ => Self::G16,
        }
    }
}

/// Clock source, `CLKSEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal 8 MHz oscillator
    Internal = 0,
    /// PLL with X gyro reference
    PllGyroX = 1,
    /// PLL with Y gyro reference
    PllGyroY = 2,
    /// PLL with Z gyro reference
    PllGyroZ = 3,
    /// PLL with external 32.768 kHz reference
    PllExternal32k = 4,
    /// PLL with external 19.2 MHz reference
    PllExternal19M = 5,
    /// Clock stopped, timing generator in reset
    Stopped = 7,
}

/// Digital low-pass filter, `DLPF_CFG` (accelerometer bandwidth)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dlpf {
    /// 260 Hz
    Hz260 = 0,
    /// 184 Hz
    Hz184 = 1,
    /// 94 Hz
    Hz94 = 2,
    /// 44 Hz
    Hz44 = 3,
    /// 21 Hz
    Hz21 = 4,
    /// 10 Hz
    Hz10 = 5,
    /// 5 Hz
    Hz5 = 6,
}

/// Accelerometer, gyroscope and temperature from one read
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuReading {
    /// Acceleration in g
    pub accel: Vector3,
    /// Angular rate in °/s
    pub gyro: Vector3,
    /// Die temperature in °C
    pub temperature: f32,
}

/// Convert a raw temperature count to °C
#[must_use]
pub fn temperature_from_raw(raw: i16) -> f32 {
    f32::from(raw) / 340.0 + 36.53
}

fn scaled(x: i16, y: i16, z: i16, sensitivity: f32) -> Vector3 {
    Vector3::new(
        f32::from(x) / sensitivity,
        f32::from(y) / sensitivity,
        f32::from(z) / sensitivity,
    )
}

/// Batch of the seven output registers, in address order
fn output_batch(device: u8) -> Result<TransactionBatch<7>, ConfigError> {
    let mut batch = TransactionBatch::new(device);
    for field in [
        ACCEL_X, ACCEL_Y, ACCEL_Z, TEMP_OUT, GYRO_X, GYRO_Y, GYRO_Z,
    ] {
        batch.add(device, field)?;
    }
    Ok(batch)
}

fn raw_outputs(values: &[FieldValue]) -> Result<[i16; 7], ConfigError> {
    let mut raw = [0i16; 7];
    if values.len() != raw.len() {
        return Err(ConfigError::InvalidField);
    }
    for (slot, value) in raw.iter_mut().zip(values) {
        *slot = value
            .as_i64()
            .and_then(|v| i16::try_from(v).ok())
            .ok_or(ConfigError::InvalidField)?;
    }
    Ok(raw)
}

/// MPU6050 driver
pub struct Mpu6050<I> {
    interface: I,
    accel_scale: AccelFullScale,
    gyro_scale: GyroFullScale,
}

impl<I> Mpu6050<I> {
    /// Cached accelerometer full scale
    pub const fn accel_full_scale(&self) -> AccelFullScale {
        self.accel_scale
    }

    /// Cached gyroscope full scale
    pub const fn gyro_full_scale(&self) -> GyroFullScale {
        self.gyro_scale
    }

    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn reading(&self, raw: [i16; 7]) -> ImuReading {
        let [ax, ay, az, temperature, gx, gy, gz] = raw;
        ImuReading {
            accel: scaled(ax, ay, az, self.accel_scale.sensitivity()),
            gyro: scaled(gx, gy, gz, self.gyro_scale.sensitivity()),
            temperature: temperature_from_raw(temperature),
        }
    }
}

#[cfg(not(feature = "async"))]
impl<I> Mpu6050<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a driver, verify `WHO_AM_I`, cache the full-scale settings and wake the
    /// device
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if `WHO_AM_I` is not 0x68, or an error if
    /// communication fails.
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            interface,
            accel_scale: AccelFullScale::G2,
            gyro_scale: GyroFullScale::Dps250,
        };

        let who_am_i = WHO_AM_I.read(&mut driver.interface)? as u8;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }

        driver.accel_scale = AccelFullScale::from_bits(AFS_SEL.read(&mut driver.interface)?);
        driver.gyro_scale = GyroFullScale::from_bits(FS_SEL.read(&mut driver.interface)?);
        driver.set_sleep(false)?;
        Ok(driver)
    }

    /// Reset every register to its power-on value
    ///
    /// The device comes back asleep with ±2 g / ±250 °/s.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        DEVICE_RESET.write(&mut self.interface, true)?;
        delay.delay_ms(RESET_DELAY_MS);
        self.accel_scale = AccelFullScale::G2;
        self.gyro_scale = GyroFullScale::Dps250;
        Ok(())
    }

    /// Enter or leave sleep mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sleep(&mut self, sleep: bool) -> Result<(), Error<I::Error>> {
        SLEEP.write(&mut self.interface, sleep)
    }

    /// Select the clock source
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_clock_source(&mut self, source: ClockSource) -> Result<(), Error<I::Error>> {
        CLKSEL.write(&mut self.interface, source as u32)
    }

    /// Set the gyroscope range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_gyro_full_scale(&mut self, scale: GyroFullScale) -> Result<(), Error<I::Error>> {
        FS_SEL.write(&mut self.interface, scale as u32)?;
        self.gyro_scale = scale;
        Ok(())
    }

    /// Set the accelerometer range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_accel_full_scale(&mut self, scale: AccelFullScale) -> Result<(), Error<I::Error>> {
        AFS_SEL.write(&mut self.interface, scale as u32)?;
        self.accel_scale = scale;
        Ok(())
    }

    /// Configure the digital low-pass filter
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_dlpf(&mut self, dlpf: Dlpf) -> Result<(), Error<I::Error>> {
        DLPF_CFG.write(&mut self.interface, dlpf as u32)
    }

    /// Set the sample rate divider
    ///
    /// Sample rate = gyroscope output rate / (1 + `divider`).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sample_rate_divider(&mut self, divider: u8) -> Result<(), Error<I::Error>> {
        SMPLRT_DIV.write(&mut self.interface, divider)
    }

    /// Acceleration in g
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel(&mut self) -> Result<Vector3, Error<I::Error>> {
        let x = ACCEL_X.read(&mut self.interface)?;
        let y = ACCEL_Y.read(&mut self.interface)?;
        let z = ACCEL_Z.read(&mut self.interface)?;
        Ok(scaled(x, y, z, self.accel_scale.sensitivity()))
    }

    /// Angular rate in °/s
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_gyro(&mut self) -> Result<Vector3, Error<I::Error>> {
        let x = GYRO_X.read(&mut self.interface)?;
        let y = GYRO_Y.read(&mut self.interface)?;
        let z = GYRO_Z.read(&mut self.interface)?;
        Ok(scaled(x, y, z, self.gyro_scale.sensitivity()))
    }

    /// Die temperature in °C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_temperature(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(temperature_from_raw(TEMP_OUT.read(&mut self.interface)?))
    }

    /// Read every output through a [`TransactionBatch`]
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_all(&mut self) -> Result<ImuReading, Error<I::Error>>
    where
        I: Addressed,
    {
        let batch = output_batch(self.interface.device_address())
            .map_err(Error::<I::Error>::InvalidConfig)?;
        let values = batch.read(&mut self.interface)?;
        let raw = raw_outputs(&values).map_err(Error::<I::Error>::InvalidConfig)?;
        Ok(self.reading(raw))
    }
}

#[cfg(feature = "async")]
impl<I> Mpu6050<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a driver, verify `WHO_AM_I`, cache the full-scale settings and wake the
    /// device
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] if `WHO_AM_I` is not 0x68, or an error if
    /// communication fails.
    pub async fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            interface,
            accel_scale: AccelFullScale::G2,
            gyro_scale: GyroFullScale::Dps250,
        };

        let who_am_i = WHO_AM_I.read(&mut driver.interface).await? as u8;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }

        driver.accel_scale =
            AccelFullScale::from_bits(AFS_SEL.read(&mut driver.interface).await?);
        driver.gyro_scale = GyroFullScale::from_bits(FS_SEL.read(&mut driver.interface).await?);
        driver.set_sleep(false).await?;
        Ok(driver)
    }

    /// Reset every register to its power-on value
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        DEVICE_RESET.write(&mut self.interface, true).await?;
        delay.delay_ms(RESET_DELAY_MS).await;
        self.accel_scale = AccelFullScale::G2;
        self.gyro_scale = GyroFullScale::Dps250;
        Ok(())
    }

    /// Enter or leave sleep mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_sleep(&mut self, sleep: bool) -> Result<(), Error<I::Error>> {
        SLEEP.write(&mut self.interface, sleep).await
    }

    /// Select the clock source
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_clock_source(&mut self, source: ClockSource) -> Result<(), Error<I::Error>> {
        CLKSEL.write(&mut self.interface, source as u32).await
    }

    /// Set the gyroscope range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_gyro_full_scale(
        &mut self,
        scale: GyroFullScale,
    ) -> Result<(), Error<I::Error>> {
        FS_SEL.write(&mut self.interface, scale as u32).await?;
        self.gyro_scale = scale;
        Ok(())
    }

    /// Set the accelerometer range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_accel_full_scale(
        &mut self,
        scale: AccelFullScale,
    ) -> Result<(), Error<I::Error>> {
        AFS_SEL.write(&mut self.interface, scale as u32).await?;
        self.accel_scale = scale;
        Ok(())
    }

    /// Configure the digital low-pass filter
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_dlpf(&mut self, dlpf: Dlpf) -> Result<(), Error<I::Error>> {
        DLPF_CFG.write(&mut self.interface, dlpf as u32).await
    }

    /// Set the sample rate divider
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_sample_rate_divider(&mut self, divider: u8) -> Result<(), Error<I::Error>> {
        SMPLRT_DIV.write(&mut self.interface, divider).await
    }

    /// Acceleration in g
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_accel(&mut self) -> Result<Vector3, Error<I::Error>> {
        let x = ACCEL_X.read(&mut self.interface).await?;
        let y = ACCEL_Y.read(&mut self.interface).await?;
        let z = ACCEL_Z.read(&mut self.interface).await?;
        Ok(scaled(x, y, z, self.accel_scale.sensitivity()))
    }

    /// Angular rate in °/s
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_gyro(&mut self) -> Result<Vector3, Error<I::Error>> {
        let x = GYRO_X.read(&mut self.interface).await?;
        let y = GYRO_Y.read(&mut self.interface).await?;
        let z = GYRO_Z.read(&mut self.interface).await?;
        Ok(scaled(x, y, z, self.gyro_scale.sensitivity()))
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

    /// Read every output through a [`TransactionBatch`]
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_all(&mut self) -> Result<ImuReading, Error<I::Error>>
    where
        I: Addressed,
    {
        let batch = output_batch(self.interface.device_address())
            .map_err(Error::<I::Error>::InvalidConfig)?;
        let values = batch.read(&mut self.interface).await?;
        let raw = raw_outputs(&values).map_err(Error::<I::Error>::InvalidConfig)?;
        Ok(self.reading(raw))
    }
}
