//! Bus interface for register-mapped I2C peripherals
//!
//! [`I2cInterface`] binds an I2C bus to one 7-bit device address and implements the
//! `device-driver` register traits on top of it:
//!
//! - register read: `write_read(device, [register], buffer)`
//! - register write: `write(device, [register, data...])`
//!
//! Every field primitive in [`crate::field`] and every driver in this crate talks to the
//! device exclusively through these two operations.

use device_driver::RegisterInterface;

/// Largest payload accepted by a single register write
pub const MAX_WRITE_BYTES: usize = 32;

/// Errors from [`I2cInterface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<E> {
    /// Error reported by the I2C bus
    Bus(E),
    /// Register write longer than [`MAX_WRITE_BYTES`]; nothing was sent
    WriteTooLong {
        /// Payload length that was rejected
        len: usize,
    },
}

/// An interface that is bound to a single peripheral on the bus
///
/// Used by [`TransactionBatch`](crate::TransactionBatch) to reject reads against a
/// different device than the one its fields were collected for.
pub trait Addressed {
    /// 7-bit I2C address of the bound device
    fn device_address(&self) -> u8;
}

/// I2C interface for one register-mapped device
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface for the device at `address`
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral (or a shared-bus device from `embedded-hal-bus`)
    /// * `address` - The 7-bit I2C device address
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c, i2c_regfield::DPS310_ADDRESS);
    /// let mut baro = Dps310::new(interface, Dps310Config::default())?;
    /// ```
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address this interface talks to
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Addressed for I2cInterface<I2C> {
    fn device_address(&self) -> u8 {
        self.address
    }
}

/// Build the `[register, data...]` frame for a register write
///
/// Returns the payload length, or `None` if it does not fit in one frame.
fn write_frame(
    address: u8,
    write_data: &[u8],
    buffer: &mut [u8; MAX_WRITE_BYTES + 1],
) -> Option<usize> {
    let len = write_data.len();
    if len > MAX_WRITE_BYTES {
        return None;
    }
    buffer[0] = address;
    buffer[1..=len].copy_from_slice(write_data);
    Some(len)
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = InterfaceError<E>;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c
            .write_read(self.address, &[address], read_data)
            .map_err(InterfaceError::Bus)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let mut buffer = [0u8; MAX_WRITE_BYTES + 1];
        let len = write_frame(address, write_data, &mut buffer).ok_or(
            InterfaceError::WriteTooLong {
                len: write_data.len(),
            },
        )?;

        self.i2c
            .write(self.address, &buffer[..=len])
            .map_err(InterfaceError::Bus)
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = InterfaceError<E>;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
            .map_err(InterfaceError::Bus)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let mut buffer = [0u8; MAX_WRITE_BYTES + 1];
        let len = write_frame(address, write_data, &mut buffer).ok_or(
            InterfaceError::WriteTooLong {
                len: write_data.len(),
            },
        )?;

        self.i2c
            .write(self.address, &buffer[..=len])
            .await
            .map_err(InterfaceError::Bus)
    }
}
