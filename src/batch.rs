//! Ordered multi-field reads against a single device
//!
//! A [`TransactionBatch`] collects up to `N` field definitions for one I2C device and
//! reads them in insertion order, one transport operation per field. Results come back in
//! the same order as the fields.
//!
//! ```ignore
//! use i2c_regfield::{TransactionBatch, DPS310_ADDRESS};
//! use i2c_regfield::dps310::registers::{PRODUCT_ID, COEF_RDY};
//!
//! let mut batch = TransactionBatch::<4>::new(DPS310_ADDRESS);
//! batch.add(DPS310_ADDRESS, PRODUCT_ID)?;
//! batch.add(DPS310_ADDRESS, COEF_RDY)?;
//! let values = batch.read(&mut interface)?;
//! ```

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;
use heapless::Vec;

use crate::field::{AnyField, FieldValue, RegisterField};
use crate::interface::Addressed;
use crate::{ConfigError, Error};

/// Up to `N` fields of one device, read in order
#[derive(Debug, Clone)]
pub struct TransactionBatch<const N: usize> {
    device: u8,
    fields: Vec<AnyField, N>,
}

impl<const N: usize> TransactionBatch<N> {
    /// Create an empty batch for the device at `device`
    #[must_use]
    pub const fn new(device: u8) -> Self {
        Self {
            device,
            fields: Vec::new(),
        }
    }

    /// Device address every field in this batch belongs to
    #[must_use]
    pub const fn device(&self) -> u8 {
        self.device
    }

    /// Append a field and return its slot index
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MixedDevices`] if `device` is not the batch's device,
    /// [`ConfigError::InvalidField`] for a field that does not fit its register, or
    /// [`ConfigError::BatchFull`] once `N` fields have been added.
    pub fn add(&mut self, device: u8, field: impl Into<AnyField>) -> Result<usize, ConfigError> {
        self.check_device(device)?;
        let field = field.into();
        if !field.is_valid() {
            return Err(ConfigError::InvalidField);
        }
        let index = self.fields.len();
        self.fields
            .push(field)
            .map_err(|_| ConfigError::BatchFull)?;
        Ok(index)
    }

    /// Remove the field at `index`, shifting later fields down
    pub fn remove(&mut self, index: usize) -> Option<AnyField> {
        if index < self.fields.len() {
            Some(self.fields.remove(index))
        } else {
            None
        }
    }

    /// Fields in read order
    #[must_use]
    pub fn fields(&self) -> &[AnyField] {
        &self.fields
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the batch has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove every field
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    fn check_device(&self, found: u8) -> Result<(), ConfigError> {
        if found != self.device {
            return Err(ConfigError::MixedDevices {
                expected: self.device,
                found,
            });
        }
        Ok(())
    }

    /// Read every field in order
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MixedDevices`] (as [`Error::InvalidConfig`]) if `interface` is
    /// bound to another device, or the first [`Error::Bus`] raised. A bus failure aborts the
    /// batch; fields after it are not read.
    #[cfg(not(feature = "async"))]
    pub fn read<I>(&self, interface: &mut I) -> Result<Vec<FieldValue, N>, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8> + Addressed,
    {
        if let Err(error) = self.check_device(interface.device_address()) {
            return Err(Error::InvalidConfig(error));
        }

        let mut values = Vec::new();
        for field in &self.fields {
            let value = field.read(interface)?;
            if values.push(value).is_err() {
                return Err(Error::InvalidConfig(ConfigError::BatchFull));
            }
        }
        Ok(values)
    }

    /// Read every field in order
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MixedDevices`] (as [`Error::InvalidConfig`]) if `interface` is
    /// bound to another device, or the first [`Error::Bus`] raised. A bus failure aborts the
    /// batch; fields after it are not read.
    #[cfg(feature = "async")]
    pub async fn read<I>(&self, interface: &mut I) -> Result<Vec<FieldValue, N>, Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8> + Addressed,
    {
        if let Err(error) = self.check_device(interface.device_address()) {
            return Err(Error::InvalidConfig(error));
        }

        let mut values = Vec::new();
        for field in &self.fields {
            let value = field.read(interface).await?;
            if values.push(value).is_err() {
                return Err(Error::InvalidConfig(ConfigError::BatchFull));
            }
        }
        Ok(values)
    }
}
