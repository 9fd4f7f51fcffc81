//! DPS310 barometric pressure sensor
//!
//! The driver walks a fixed calibration sequence before it will produce readings:
//!
//! ```text
//! Uninitialized -> AwaitingCoefficientReady -> CoefficientsLoaded -> Ready
//! ```
//!
//! - [`Dps310::new`] checks the product ID and writes the configuration. The driver is
//!   returned in `AwaitingCoefficientReady`.
//! - [`Dps310::load_coefficients`] polls `SENSOR_RDY` and `COEF_RDY` with a bounded
//!   delay loop, then reads and decodes the 18-byte coefficient block.
//! - [`Dps310::resolve_scale_factors`] reads the oversampling settings back, derives the
//!   scale factors and writes the matching result-shift bits.
//!
//! [`Dps310::init`] runs the last two steps. [`Dps310::read_measurement`] fails with
//! [`Error::NotReady`] until the driver is `Ready`.

pub mod coefficients;
pub mod compensation;
pub mod config;
pub mod registers;

pub use coefficients::Coefficients;
pub use compensation::{compensate, Measurement, PressureUnit, RawSample, ScaleFactors};
pub use config::{Dps310Config, MeasurementMode, MeasurementRate, Oversampling};

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

use crate::field::{Bit, ReadOnly, RegisterField, WritableField};
use crate::Error;
use registers::{
    Register, COEF_BLOCK_LEN, COEF_RDY, FIFO_EMPTY, FIFO_EN, FIFO_FLUSH, FIFO_FULL, FIFO_STS,
    INT_FIFO_FULL, INT_PRS, INT_STS, INT_TMP, MEAS_CFG, MEAS_CTRL, PM_PRC, PM_RATE, PRODUCT_ID,
    PRODUCT_ID_VALUE, PRS_RDY, P_SHIFT, RESULT_BLOCK_LEN, REVISION_ID, SENSOR_RDY,
    SOFT_RESET_VALUE, SOFT_RST, TMP_COEF_SRCE, TMP_EXT, TMP_PRC, TMP_RATE, TMP_RDY, T_SHIFT,
};

/// Time for the device to come back after a soft reset, before `SENSOR_RDY` is polled
const SOFT_RESET_DELAY_MS: u32 = 40;

/// Calibration progress of a [`Dps310`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    /// Configuration not yet written
    Uninitialized,
    /// Waiting for the device to report its coefficients
    AwaitingCoefficientReady,
    /// Coefficients cached, scale factors not yet resolved
    CoefficientsLoaded,
    /// Measurements can be compensated
    Ready,
}

/// Ready flags from `MEAS_CFG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementStatus {
    /// Calibration coefficients can be read
    pub coefficients_ready: bool,
    /// Sensor initialization complete
    pub sensor_ready: bool,
    /// New temperature result available
    pub temperature_ready: bool,
    /// New pressure result available
    pub pressure_ready: bool,
}

/// Interrupt flags from `INT_STS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Pressure measurement finished
    pub pressure: bool,
    /// Temperature measurement finished
    pub temperature: bool,
    /// FIFO full
    pub fifo_full: bool,
}

/// FIFO flags from `FIFO_STS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// FIFO holds no results
    pub empty: bool,
    /// FIFO is full
    pub full: bool,
}

/// DPS310 driver
pub struct Dps310<I> {
    interface: I,
    config: Dps310Config,
    state: CalibrationState,
    coefficients: Option<Coefficients>,
    scale: Option<ScaleFactors>,
}

impl<I> Dps310<I> {
    /// Current calibration state
    pub const fn state(&self) -> CalibrationState {
        self.state
    }

    /// Active configuration
    pub const fn config(&self) -> &Dps310Config {
        &self.config
    }

    /// Cached calibration coefficients, once loaded
    pub const fn coefficients(&self) -> Option<&Coefficients> {
        self.coefficients.as_ref()
    }

    /// Resolved scale factors, once `Ready`
    pub const fn scale_factors(&self) -> Option<&ScaleFactors> {
        self.scale.as_ref()
    }

    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn transition(&mut self, state: CalibrationState) {
        #[cfg(feature = "defmt")]
        defmt::debug!("DPS310: {} -> {}", self.state, state);
        self.state = state;
    }

    fn forget_calibration(&mut self) {
        self.coefficients = None;
        self.scale = None;
    }

    fn calibration(&self) -> Option<(Coefficients, ScaleFactors)> {
        match (self.state, self.coefficients, self.scale) {
            (CalibrationState::Ready, Some(coefficients), Some(scale)) => {
                Some((coefficients, scale))
            }
            _ => None,
        }
    }

    /// Length of the next poll delay, or `None` once `waited_ms` has used up the timeout
    ///
    /// The step is at least 1 ms and never runs past `ready_timeout_ms`.
    fn next_poll_delay(&self, waited_ms: u32, flag: Bit<ReadOnly>) -> Option<u32> {
        let remaining = self.config.ready_timeout_ms.saturating_sub(waited_ms);
        if remaining == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "DPS310: flag {=u8:#x}.{=u8} not set after {=u32} ms",
                flag.register(),
                flag.position(),
                waited_ms
            );
            #[cfg(not(feature = "defmt"))]
            let _ = flag;
            return None;
        }
        Some(self.config.poll_interval_ms.max(1).min(remaining))
    }
}

fn oversampling_setting(raw: u32) -> Result<Oversampling, crate::ConfigError> {
    let value = u8::try_from(raw).unwrap_or(u8::MAX);
    Oversampling::try_from(value)
}

fn measurement_status(raw: u8) -> MeasurementStatus {
    let raw = u32::from(raw);
    MeasurementStatus {
        coefficients_ready: COEF_RDY.decode(raw),
        sensor_ready: SENSOR_RDY.decode(raw),
        temperature_ready: TMP_RDY.decode(raw),
        pressure_ready: PRS_RDY.decode(raw),
    }
}

fn interrupt_status(raw: u8) -> InterruptStatus {
    let raw = u32::from(raw);
    InterruptStatus {
        pressure: INT_PRS.decode(raw),
        temperature: INT_TMP.decode(raw),
        fifo_full: INT_FIFO_FULL.decode(raw),
    }
}

fn fifo_status(raw: u8) -> FifoStatus {
    let raw = u32::from(raw);
    FifoStatus {
        empty: FIFO_EMPTY.decode(raw),
        full: FIFO_FULL.decode(raw),
    }
}

#[cfg(not(feature = "async"))]
impl<I> Dps310<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a driver, verify the product ID and write the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The product ID is not a DPS310 ([`Error::InvalidDevice`])
    pub fn new(interface: I, config: Dps310Config) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            interface,
            config,
            state: CalibrationState::Uninitialized,
            coefficients: None,
            scale: None,
        };

        let product = driver.product_id()?;
        if product != PRODUCT_ID_VALUE {
            return Err(Error::InvalidDevice(product));
        }

        driver.apply_config()?;
        driver.transition(CalibrationState::AwaitingCoefficientReady);
        Ok(driver)
    }

    /// Load coefficients and resolve scale factors
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if a ready flag does not assert within
    /// `ready_timeout_ms`, or an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut baro = Dps310::new(interface, Dps310Config::default())?;
    /// baro.init(&mut delay)?;
    /// let measurement = baro.read_measurement()?;
    /// ```
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.load_coefficients(delay)?;
        self.resolve_scale_factors()
    }

    /// Wait for the coefficients and cache them
    ///
    /// Polls `SENSOR_RDY` and then `COEF_RDY`, for at most `ready_timeout_ms` in total. The
    /// temperature sensor the coefficients were calibrated against (`COEF_SRCE`) is copied
    /// into `TMP_EXT` before the block is read.
    ///
    /// On timeout the driver stays in `AwaitingCoefficientReady` and the call can be
    /// retried. Calling it again after a successful load re-reads the block and drops the
    /// resolved scale factors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] on timeout, or an error if communication fails.
    pub fn load_coefficients<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let mut waited_ms = 0;
        self.wait_for(SENSOR_RDY, &mut waited_ms, delay)?;
        self.wait_for(COEF_RDY, &mut waited_ms, delay)?;

        let external = TMP_COEF_SRCE.read(&mut self.interface)?;
        TMP_EXT.write(&mut self.interface, external)?;

        let mut block = [0u8; COEF_BLOCK_LEN];
        self.interface.read_register(
            Register::Coef.addr(),
            (COEF_BLOCK_LEN * 8) as u32,
            &mut block,
        )?;
        let coefficients = Coefficients::from_bytes(&block, self.config.sign_convention);

        #[cfg(feature = "defmt")]
        defmt::debug!("DPS310: coefficients {}", coefficients);

        self.coefficients = Some(coefficients);
        self.scale = None;
        self.transition(CalibrationState::CoefficientsLoaded);
        Ok(())
    }

    /// Derive scale factors from the device's oversampling settings
    ///
    /// Writes `P_SHIFT` / `T_SHIFT` to match and moves to `Ready`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] before coefficients are loaded,
    /// [`Error::InvalidConfig`] if a setting reads back above 7, or an error if
    /// communication fails.
    pub fn resolve_scale_factors(&mut self) -> Result<(), Error<I::Error>> {
        if self.coefficients.is_none() {
            return Err(Error::NotReady);
        }

        let pressure = oversampling_setting(PM_PRC.read(&mut self.interface)?)
            .map_err(Error::<I::Error>::InvalidConfig)?;
        let temperature = oversampling_setting(TMP_PRC.read(&mut self.interface)?)
            .map_err(Error::<I::Error>::InvalidConfig)?;

        let scale = ScaleFactors::resolve(pressure, temperature);
        P_SHIFT.write(&mut self.interface, scale.pressure_shift)?;
        T_SHIFT.write(&mut self.interface, scale.temperature_shift)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("DPS310: scale factors {}", scale);

        self.scale = Some(scale);
        self.transition(CalibrationState::Ready);
        Ok(())
    }

    /// Read the raw pressure and temperature counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        let mut bytes = [0u8; RESULT_BLOCK_LEN];
        self.interface.read_register(
            Register::PsrB2.addr(),
            (RESULT_BLOCK_LEN * 8) as u32,
            &mut bytes,
        )?;
        Ok(RawSample::from_bytes(&bytes, self.config.sign_convention))
    }

    /// Read and compensate one measurement
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] unless the driver is `Ready`, or an error if
    /// communication with the device fails.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<I::Error>> {
        let Some((coefficients, scale)) = self.calibration() else {
            return Err(Error::NotReady);
        };
        let sample = self.read_raw()?;
        Ok(compensate(&coefficients, &scale, sample))
    }

    /// Change pressure and temperature oversampling
    ///
    /// Once coefficients are loaded the scale factors and shift bits are resolved again.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure_oversampling(
        &mut self,
        pressure: Oversampling,
        temperature: Oversampling,
    ) -> Result<(), Error<I::Error>> {
        PM_PRC.write(&mut self.interface, u32::from(pressure.bits()))?;
        TMP_PRC.write(&mut self.interface, u32::from(temperature.bits()))?;
        self.config.pressure_oversampling = pressure;
        self.config.temperature_oversampling = temperature;

        if self.coefficients.is_some() {
            self.resolve_scale_factors()?;
        }
        Ok(())
    }

    /// Set the measurement mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_measurement_mode(&mut self, mode: MeasurementMode) -> Result<(), Error<I::Error>> {
        MEAS_CTRL.write(&mut self.interface, u32::from(mode.bits()))?;
        self.config.mode = mode;
        Ok(())
    }

    /// Read the ready flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn status(&mut self) -> Result<MeasurementStatus, Error<I::Error>> {
        Ok(measurement_status(MEAS_CFG.read(&mut self.interface)?))
    }

    /// Read the interrupt flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn interrupt_status(&mut self) -> Result<InterruptStatus, Error<I::Error>> {
        Ok(interrupt_status(INT_STS.read(&mut self.interface)?))
    }

    /// Read the FIFO flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn fifo_status(&mut self) -> Result<FifoStatus, Error<I::Error>> {
        Ok(fifo_status(FIFO_STS.read(&mut self.interface)?))
    }

    /// Enable or disable the result FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_fifo_enabled(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        FIFO_EN.write(&mut self.interface, enable)
    }

    /// Discard every result in the FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn flush_fifo(&mut self) -> Result<(), Error<I::Error>> {
        FIFO_FLUSH.write(&mut self.interface, true)
    }

    /// Read the product ID (0 on a DPS310)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn product_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(PRODUCT_ID.read(&mut self.interface)? as u8)
    }

    /// Read the silicon revision
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn revision_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(REVISION_ID.read(&mut self.interface)? as u8)
    }

    /// Soft reset the device and write the configuration again
    ///
    /// Cached coefficients and scale factors are dropped; call
    /// [`init`](Self::init) again before reading measurements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if `SENSOR_RDY` is not set within `ready_timeout_ms` after
    /// the 40 ms reset time, or an error if communication fails.
    pub fn soft_reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        SOFT_RST.write(&mut self.interface, SOFT_RESET_VALUE)?;
        self.forget_calibration();
        self.transition(CalibrationState::AwaitingCoefficientReady);

        delay.delay_ms(SOFT_RESET_DELAY_MS);
        let mut waited_ms = 0;
        self.wait_for(SENSOR_RDY, &mut waited_ms, delay)?;
        self.apply_config()
    }

    fn apply_config(&mut self) -> Result<(), Error<I::Error>> {
        let config = self.config;
        PM_RATE.write(&mut self.interface, u32::from(config.pressure_rate.bits()))?;
        PM_PRC.write(
            &mut self.interface,
            u32::from(config.pressure_oversampling.bits()),
        )?;
        TMP_RATE.write(&mut self.interface, u32::from(config.temperature_rate.bits()))?;
        TMP_PRC.write(
            &mut self.interface,
            u32::from(config.temperature_oversampling.bits()),
        )?;
        MEAS_CTRL.write(&mut self.interface, u32::from(config.mode.bits()))
    }

    /// Poll `flag`, adding the time spent to `waited_ms`
    fn wait_for<D>(
        &mut self,
        flag: Bit<ReadOnly>,
        waited_ms: &mut u32,
        delay: &mut D,
    ) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        loop {
            if flag.read(&mut self.interface)? {
                return Ok(());
            }
            let Some(step) = self.next_poll_delay(*waited_ms, flag) else {
                return Err(Error::NotReady);
            };
            delay.delay_ms(step);
            *waited_ms += step;
        }
    }
}

#[cfg(feature = "async")]
impl<I> Dps310<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a driver, verify the product ID and write the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The product ID is not a DPS310 ([`Error::InvalidDevice`])
    pub async fn new(interface: I, config: Dps310Config) -> Result<Self, Error<I::Error>> {
        let mut driver = Self {
            interface,
            config,
            state: CalibrationState::Uninitialized,
            coefficients: None,
            scale: None,
        };

        let product = driver.product_id().await?;
        if product != PRODUCT_ID_VALUE {
            return Err(Error::InvalidDevice(product));
        }

        driver.apply_config().await?;
        driver.transition(CalibrationState::AwaitingCoefficientReady);
        Ok(driver)
    }

    /// Load coefficients and resolve scale factors
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if a ready flag does not assert within
    /// `ready_timeout_ms`, or an error if communication with the device fails.
    pub async fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.load_coefficients(delay).await?;
        self.resolve_scale_factors().await
    }

    /// Wait for the coefficients and cache them
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] on timeout, or an error if communication fails.
    pub async fn load_coefficients<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let mut waited_ms = 0;
        self.wait_for(SENSOR_RDY, &mut waited_ms, delay).await?;
        self.wait_for(COEF_RDY, &mut waited_ms, delay).await?;

        let external = TMP_COEF_SRCE.read(&mut self.interface).await?;
        TMP_EXT.write(&mut self.interface, external).await?;

        let mut block = [0u8; COEF_BLOCK_LEN];
        self.interface
            .read_register(
                Register::Coef.addr(),
                (COEF_BLOCK_LEN * 8) as u32,
                &mut block,
            )
            .await?;
        let coefficients = Coefficients::from_bytes(&block, self.config.sign_convention);

        #[cfg(feature = "defmt")]
        defmt::debug!("DPS310: coefficients {}", coefficients);

        self.coefficients = Some(coefficients);
        self.scale = None;
        self.transition(CalibrationState::CoefficientsLoaded);
        Ok(())
    }

    /// Derive scale factors from the device's oversampling settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] before coefficients are loaded,
    /// [`Error::InvalidConfig`] if a setting reads back above 7, or an error if
    /// communication fails.
    pub async fn resolve_scale_factors(&mut self) -> Result<(), Error<I::Error>> {
        if self.coefficients.is_none() {
            return Err(Error::NotReady);
        }

        let pressure = oversampling_setting(PM_PRC.read(&mut self.interface).await?)
            .map_err(Error::<I::Error>::InvalidConfig)?;
        let temperature = oversampling_setting(TMP_PRC.read(&mut self.interface).await?)
            .map_err(Error::<I::Error>::InvalidConfig)?;

        let scale = ScaleFactors::resolve(pressure, temperature);
        P_SHIFT
            .write(&mut self.interface, scale.pressure_shift)
            .await?;
        T_SHIFT
            .write(&mut self.interface, scale.temperature_shift)
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("DPS310: scale factors {}", scale);

        self.scale = Some(scale);
        self.transition(CalibrationState::Ready);
        Ok(())
    }

    /// Read the raw pressure and temperature counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        let mut bytes = [0u8; RESULT_BLOCK_LEN];
        self.interface
            .read_register(
                Register::PsrB2.addr(),
                (RESULT_BLOCK_LEN * 8) as u32,
                &mut bytes,
            )
            .await?;
        Ok(RawSample::from_bytes(&bytes, self.config.sign_convention))
    }

    /// Read and compensate one measurement
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] unless the driver is `Ready`, or an error if
    /// communication with the device fails.
    pub async fn read_measurement(&mut self) -> Result<Measurement, Error<I::Error>> {
        let Some((coefficients, scale)) = self.calibration() else {
            return Err(Error::NotReady);
        };
        let sample = self.read_raw().await?;
        Ok(compensate(&coefficients, &scale, sample))
    }

    /// Change pressure and temperature oversampling
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure_oversampling(
        &mut self,
        pressure: Oversampling,
        temperature: Oversampling,
    ) -> Result<(), Error<I::Error>> {
        PM_PRC
            .write(&mut self.interface, u32::from(pressure.bits()))
            .await?;
        TMP_PRC
            .write(&mut self.interface, u32::from(temperature.bits()))
            .await?;
        self.config.pressure_oversampling = pressure;
        self.config.temperature_oversampling = temperature;

        if self.coefficients.is_some() {
            self.resolve_scale_factors().await?;
        }
        Ok(())
    }

    /// Set the measurement mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_measurement_mode(
        &mut self,
        mode: MeasurementMode,
    ) -> Result<(), Error<I::Error>> {
        MEAS_CTRL
            .write(&mut self.interface, u32::from(mode.bits()))
            .await?;
        self.config.mode = mode;
        Ok(())
    }

    /// Read the ready flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn status(&mut self) -> Result<MeasurementStatus, Error<I::Error>> {
        Ok(measurement_status(MEAS_CFG.read(&mut self.interface).await?))
    }

    /// Read the interrupt flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn interrupt_status(&mut self) -> Result<InterruptStatus, Error<I::Error>> {
        Ok(interrupt_status(INT_STS.read(&mut self.interface).await?))
    }

    /// Read the FIFO flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn fifo_status(&mut self) -> Result<FifoStatus, Error<I::Error>> {
        Ok(fifo_status(FIFO_STS.read(&mut self.interface).await?))
    }

    /// Enable or disable the result FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_fifo_enabled(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        FIFO_EN.write(&mut self.interface, enable).await
    }

    /// Discard every result in the FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn flush_fifo(&mut self) -> Result<(), Error<I::Error>> {
        FIFO_FLUSH.write(&mut self.interface, true).await
    }

    /// Read the product ID (0 on a DPS310)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn product_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(PRODUCT_ID.read(&mut self.interface).await? as u8)
    }

    /// Read the silicon revision
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn revision_id(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(REVISION_ID.read(&mut self.interface).await? as u8)
    }

    /// Soft reset the device and write the configuration again
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if `SENSOR_RDY` is not set within `ready_timeout_ms` after
    /// the 40 ms reset time, or an error if communication fails.
    pub async fn soft_reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        SOFT_RST
            .write(&mut self.interface, SOFT_RESET_VALUE)
            .await?;
        self.forget_calibration();
        self.transition(CalibrationState::AwaitingCoefficientReady);

        delay.delay_ms(SOFT_RESET_DELAY_MS).await;
        let mut waited_ms = 0;
        self.wait_for(SENSOR_RDY, &mut waited_ms, delay).await?;
        self.apply_config().await
    }

    async fn apply_config(&mut self) -> Result<(), Error<I::Error>> {
        let config = self.config;
        PM_RATE
            .write(&mut self.interface, u32::from(config.pressure_rate.bits()))
            .await?;
        PM_PRC
            .write(
                &mut self.interface,
                u32::from(config.pressure_oversampling.bits()),
            )
            .await?;
        TMP_RATE
            .write(&mut self.interface, u32::from(config.temperature_rate.bits()))
            .await?;
        TMP_PRC
            .write(
                &mut self.interface,
                u32::from(config.temperature_oversampling.bits()),
            )
            .await?;
        MEAS_CTRL
            .write(&mut self.interface, u32::from(config.mode.bits()))
            .await
    }

    async fn wait_for<D>(
        &mut self,
        flag: Bit<ReadOnly>,
        waited_ms: &mut u32,
        delay: &mut D,
    ) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        loop {
            if flag.read(&mut self.interface).await? {
                return Ok(());
            }
            let Some(step) = self.next_poll_delay(*waited_ms, flag) else {
                return Err(Error::NotReady);
            };
            delay.delay_ms(step).await;
            *waited_ms += step;
        }
    }
}
