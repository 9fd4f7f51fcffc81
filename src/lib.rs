#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod batch;
pub mod field;
pub mod interface;
pub mod sign;

pub mod dps310;
pub mod drivers;

// Re-export main types
pub use batch::TransactionBatch;
pub use dps310::{Dps310, Dps310Config};
pub use field::{
    AnyField, Bit, Bits, ByteOrder, FieldValue, Int, ReadOnly, ReadWrite, RegisterField,
    WritableField,
};
pub use interface::{Addressed, I2cInterface, InterfaceError};
pub use sign::SignConvention;

/// DPS310 I2C address when SDO is high or floating (default: 0x77)
pub const DPS310_ADDRESS: u8 = 0x77;

/// DPS310 I2C address when SDO is pulled low (alternative: 0x76)
pub const DPS310_ADDRESS_SDO_LOW: u8 = 0x76;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device (NACK, arbitration loss, timeout)
    Bus(E),
    /// Unexpected identification register value (contains the actual value read)
    InvalidDevice(u8),
    /// A hardware ready flag did not assert within the configured timeout,
    /// or the driver has not finished loading its calibration
    NotReady,
    /// Invalid field definition, setting or batch composition
    InvalidConfig(ConfigError),
    /// Value does not fit in the destination field
    FieldRange {
        /// Value that was rejected
        value: u32,
        /// Width of the destination field in bits
        bits: u8,
    },
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// Configuration errors that do not involve the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Field definition violates `lsb <= msb < 8 * width` or the register width limit
    InvalidField,
    /// Oversampling or rate setting outside 0-7 (contains the rejected setting)
    InvalidOversampling(u8),
    /// Field belongs to a different device than the batch
    MixedDevices {
        /// Device address the batch was created for
        expected: u8,
        /// Device address that was offered
        found: u8,
    },
    /// Batch capacity exhausted
    BatchFull,
    /// Physical value outside the range the register can represent
    OutOfRange,
}
