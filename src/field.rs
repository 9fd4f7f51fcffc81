//! Register field primitives
//!
//! A field is an immutable description of where a value lives in a device's register
//! space. It holds no bus handle; every access takes the interface as an argument and
//! issues a fresh transport operation, nothing is cached.
//!
//! | Type | Value | Access |
//! |------|-------|--------|
//! | [`Bit`] | `bool` | one bit of a 1-4 byte register |
//! | [`Bits`] | `u32` | inclusive bit range `[lsb, msb]` of a 1-4 byte register |
//! | [`Int`] | `u8`..`i32` | whole multi-byte register decoded as a fixed-width integer |
//!
//! Each comes in a [`ReadOnly`] and a [`ReadWrite`] flavour. Writes to [`Bit`] and [`Bits`]
//! are read-modify-write: the register is read, only the target bits are replaced, and the
//! result is written back. The sequence is not atomic; callers sharing a device with an
//! interrupt handler must serialize access around the interface.
//!
//! ```ignore
//! use i2c_regfield::{Bits, ReadWrite, RegisterField, WritableField};
//!
//! const PM_RATE: Bits<ReadWrite> = Bits::new(0x06, 1, 4, 6);
//!
//! PM_RATE.write(&mut interface, 3)?;
//! assert_eq!(PM_RATE.read(&mut interface)?, 3);
//! ```

use core::marker::PhantomData;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

use crate::{ConfigError, Error};
use crate::sign::twos_complement;

/// Widest register a [`Bit`] or [`Bits`] field can span
pub const MAX_REGISTER_BYTES: usize = 4;

mod sealed {
    pub trait Sealed {}
}

/// Access marker for field types
///
/// [`Bit`], [`Bits`] and [`Int`] are [`ReadOnly`] unless declared [`ReadWrite`].
pub trait Access: sealed::Sealed {}

/// Field can only be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOnly;

/// Field can be read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWrite;

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}
impl Access for ReadOnly {}
impl Access for ReadWrite {}

/// Byte order of a multi-byte register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// Most significant byte at the lowest register address
    #[default]
    BigEndian,
    /// Least significant byte at the lowest register address
    LittleEndian,
}

impl ByteOrder {
    /// Assemble up to four bytes into a raw register value
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> u32 {
        match self {
            Self::BigEndian => bytes
                .iter()
                .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte)),
            Self::LittleEndian => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte)),
        }
    }

    /// Split a raw register value into `out.len()` bytes
    pub fn encode(self, value: u32, out: &mut [u8]) {
        let len = out.len();
        for (i, byte) in out.iter_mut().enumerate() {
            let shift = match self {
                Self::BigEndian => 8 * (len - 1 - i),
                Self::LittleEndian => 8 * i,
            };
            *byte = (value >> shift) as u8;
        }
    }
}

/// Mask covering the inclusive bit range `[lsb, msb]`, right-aligned
///
/// Empty for a range that is inverted or reaches past bit 31.
const fn field_mask(lsb: u8, msb: u8) -> u32 {
    if lsb > msb || msb > 31 {
        return 0;
    }
    let bits = (msb - lsb + 1) as u32;
    if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 }
}

/// Extract the inclusive bit range `[lsb, msb]` from a raw register value
const fn extract_bits(raw: u32, lsb: u8, msb: u8) -> u32 {
    let mask = field_mask(lsb, msb);
    if mask == 0 {
        return 0;
    }
    (raw >> lsb) & mask
}

/// Replace the inclusive bit range `[lsb, msb]` of `raw` with `value`
///
/// Bits of `value` above the field width are discarded; bits of `raw` outside the range
/// are returned unchanged.
const fn insert_bits(raw: u32, lsb: u8, msb: u8, value: u32) -> u32 {
    let mask = field_mask(lsb, msb);
    if mask == 0 {
        return raw;
    }
    let mask = mask << lsb;
    (raw & !mask) | ((value << lsb) & mask)
}

const fn valid_range(width: u8, lsb: u8, msb: u8) -> bool {
    width != 0 && width as usize <= MAX_REGISTER_BYTES && lsb <= msb && msb < width * 8
}

/// A register field that can be read
#[allow(async_fn_in_trait)]
pub trait RegisterField {
    /// Decoded value type
    type Value;

    /// Read the field from the device
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transport fails.
    #[cfg(not(feature = "async"))]
    fn read<I>(&self, interface: &mut I) -> Result<Self::Value, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>;

    /// Read the field from the device
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transport fails.
    #[cfg(feature = "async")]
    async fn read<I>(&self, interface: &mut I) -> Result<Self::Value, Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>;
}

/// A register field that can also be written
#[allow(async_fn_in_trait)]
pub trait WritableField: RegisterField {
    /// Write the field, preserving every bit outside it
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldRange`] if `value` does not fit, or [`Error::Bus`] if the
    /// transport fails.
    #[cfg(not(feature = "async"))]
    fn write<I>(&self, interface: &mut I, value: Self::Value) -> Result<(), Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>;

    /// Write the field, preserving every bit outside it
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldRange`] if `value` does not fit, or [`Error::Bus`] if the
    /// transport fails.
    #[cfg(feature = "async")]
    async fn write<I>(&self, interface: &mut I, value: Self::Value) -> Result<(), Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>;
}

#[cfg(not(feature = "async"))]
fn read_raw<I>(
    interface: &mut I,
    register: u8,
    width: u8,
    order: ByteOrder,
) -> Result<u32, Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    let mut buffer = [0u8; MAX_REGISTER_BYTES];
    let bytes = &mut buffer[..usize::from(width)];
    interface.read_register(register, u32::from(width) * 8, bytes)?;
    Ok(order.decode(bytes))
}

#[cfg(not(feature = "async"))]
fn write_raw<I>(
    interface: &mut I,
    register: u8,
    width: u8,
    order: ByteOrder,
    value: u32,
) -> Result<(), Error<I::Error>>
where
    I: RegisterInterface<AddressType = u8>,
{
    let mut buffer = [0u8; MAX_REGISTER_BYTES];
    let bytes = &mut buffer[..usize::from(width)];
    order.encode(value, bytes);
    interface.write_register(register, u32::from(width) * 8, bytes)?;
    Ok(())
}

#[cfg(feature = "async")]
async fn read_raw<I>(
    interface: &mut I,
    register: u8,
    width: u8,
    order: ByteOrder,
) -> Result<u32, Error<I::Error>>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    let mut buffer = [0u8; MAX_REGISTER_BYTES];
    let bytes = &mut buffer[..usize::from(width)];
    interface
        .read_register(register, u32::from(width) * 8, bytes)
        .await?;
    Ok(order.decode(bytes))
}

#[cfg(feature = "async")]
async fn write_raw<I>(
    interface: &mut I,
    register: u8,
    width: u8,
    order: ByteOrder,
    value: u32,
) -> Result<(), Error<I::Error>>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    let mut buffer = [0u8; MAX_REGISTER_BYTES];
    let bytes = &mut buffer[..usize::from(width)];
    order.encode(value, bytes);
    interface
        .write_register(register, u32::from(width) * 8, bytes)
        .await?;
    Ok(())
}

// ==================== SINGLE BIT ====================

/// A single bit of a 1-4 byte register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bit<A = ReadOnly> {
    register: u8,
    width: u8,
    position: u8,
    order: ByteOrder,
    _access: PhantomData<A>,
}

/// Read-only single bit
pub type RoBit = Bit<ReadOnly>;
/// Read-write single bit
pub type RwBit = Bit<ReadWrite>;

impl<A: Access> Bit<A> {
    /// Define a bit, or `None` if `position` lies outside a `width`-byte register
    #[must_use]
    pub const fn try_new(register: u8, width: u8, position: u8) -> Option<Self> {
        if !valid_range(width, position, position) {
            return None;
        }
        Some(Self {
            register,
            width,
            position,
            order: ByteOrder::BigEndian,
            _access: PhantomData,
        })
    }

    /// Define a bit
    ///
    /// # Panics
    ///
    /// Panics (at compile time in `const` items) if `position` lies outside the register.
    #[must_use]
    pub const fn new(register: u8, width: u8, position: u8) -> Self {
        match Self::try_new(register, width, position) {
            Some(bit) => bit,
            None => panic!("bit position outside register"),
        }
    }

    /// Use a different byte order for a multi-byte register
    #[must_use]
    pub const fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Register address
    #[must_use]
    pub const fn register(&self) -> u8 {
        self.register
    }

    /// Bit position within the assembled register value
    #[must_use]
    pub const fn position(&self) -> u8 {
        self.position
    }

    /// Extract the bit from a raw register value
    #[must_use]
    pub const fn decode(&self, raw: u32) -> bool {
        extract_bits(raw, self.position, self.position) != 0
    }

    /// Set or clear the bit in a raw register value
    #[must_use]
    pub const fn encode(&self, raw: u32, value: bool) -> u32 {
        insert_bits(raw, self.position, self.position, value as u32)
    }
}

impl<A: Access> RegisterField for Bit<A> {
    type Value = bool;

    #[cfg(not(feature = "async"))]
    fn read<I>(&self, interface: &mut I) -> Result<bool, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let raw = read_raw(interface, self.register, self.width, self.order)?;
        Ok(self.decode(raw))
    }

    #[cfg(feature = "async")]
    async fn read<I>(&self, interface: &mut I) -> Result<bool, Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        let raw = read_raw(interface, self.register, self.width, self.order).await?;
        Ok(self.decode(raw))
    }
}

impl WritableField for Bit<ReadWrite> {
    #[cfg(not(feature = "async"))]
    fn write<I>(&self, interface: &mut I, value: bool) -> Result<(), Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let raw = read_raw(interface, self.register, self.width, self.order)?;
        write_raw(
            interface,
            self.register,
            self.width,
            self.order,
            self.encode(raw, value),
        )
    }

    #[cfg(feature = "async")]
    async fn write<I>(&self, interface: &mut I, value: bool) -> Result<(), Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        let raw = read_raw(interface, self.register, self.width, self.order).await?;
        write_raw(
            interface,
            self.register,
            self.width,
            self.order,
            self.encode(raw, value),
        )
        .await
    }
}

// ==================== BIT RANGE ====================

/// Inclusive bit range `[lsb, msb]` of a 1-4 byte register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bits<A = ReadOnly> {
    register: u8,
    width: u8,
    lsb: u8,
    msb: u8,
    order: ByteOrder,
    _access: PhantomData<A>,
}

/// Read-only bit range
pub type RoBits = Bits<ReadOnly>;
/// Read-write bit range
pub type RwBits = Bits<ReadWrite>;

impl<A: Access> Bits<A> {
    /// Define a bit range, or `None` unless `lsb <= msb < 8 * width` and `width <= 4`
    #[must_use]
    pub const fn try_new(register: u8, width: u8, lsb: u8, msb: u8) -> Option<Self> {
        if !valid_range(width, lsb, msb) {
            return None;
        }
        Some(Self {
            register,
            width,
            lsb,
            msb,
            order: ByteOrder::BigEndian,
            _access: PhantomData,
        })
    }

    /// Define a bit range
    ///
    /// # Panics
    ///
    /// Panics (at compile time in `const` items) if the range is invalid.
    #[must_use]
    pub const fn new(register: u8, width: u8, lsb: u8, msb: u8) -> Self {
        match Self::try_new(register, width, lsb, msb) {
            Some(bits) => bits,
            None => panic!("bit range outside register"),
        }
    }

    /// Use a different byte order for a multi-byte register
    #[must_use]
    pub const fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Register address
    #[must_use]
    pub const fn register(&self) -> u8 {
        self.register
    }

    /// Number of bits in the field (`msb - lsb + 1`)
    #[must_use]
    pub const fn bit_count(&self) -> u8 {
        self.msb - self.lsb + 1
    }

    /// Largest value the field can hold
    #[must_use]
    pub const fn max_value(&self) -> u32 {
        field_mask(self.lsb, self.msb)
    }

    /// Extract the field from a raw register value
    #[must_use]
    pub const fn decode(&self, raw: u32) -> u32 {
        extract_bits(raw, self.lsb, self.msb)
    }

    /// Insert `value` into a raw register value, or `None` if it does not fit
    #[must_use]
    pub const fn encode(&self, raw: u32, value: u32) -> Option<u32> {
        if value > self.max_value() {
            return None;
        }
        Some(insert_bits(raw, self.lsb, self.msb, value))
    }

    fn check<E>(&self, value: u32) -> Result<(), Error<E>> {
        if value > self.max_value() {
            return Err(Error::FieldRange {
                value,
                bits: self.bit_count(),
            });
        }
        Ok(())
    }
}

impl<A: Access> RegisterField for Bits<A> {
    type Value = u32;

    #[cfg(not(feature = "async"))]
    fn read<I>(&self, interface: &mut I) -> Result<u32, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let raw = read_raw(interface, self.register, self.width, self.order)?;
        Ok(self.decode(raw))
    }

    #[cfg(feature = "async")]
    async fn read<I>(&self, interface: &mut I) -> Result<u32, Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        let raw = read_raw(interface, self.register, self.width, self.order).await?;
        Ok(self.decode(raw))
    }
}

impl WritableField for Bits<ReadWrite> {
    #[cfg(not(feature = "async"))]
    fn write<I>(&self, interface: &mut I, value: u32) -> Result<(), Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        // Reject before touching the bus
        self.check::<I::Error>(value)?;
        let raw = read_raw(interface, self.register, self.width, self.order)?;
        let updated = insert_bits(raw, self.lsb, self.msb, value);
        write_raw(interface, self.register, self.width, self.order, updated)
    }

    #[cfg(feature = "async")]
    async fn write<I>(&self, interface: &mut I, value: u32) -> Result<(), Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        // Reject before touching the bus
        self.check::<I::Error>(value)?;
        let raw = read_raw(interface, self.register, self.width, self.order).await?;
        let updated = insert_bits(raw, self.lsb, self.msb, value);
        write_raw(interface, self.register, self.width, self.order, updated).await
    }
}

// ==================== FIXED-WIDTH INTEGER ====================

/// Integer types an [`Int`] field can decode to
pub trait Primitive: Copy + Into<i64> + sealed::Sealed {
    /// Size in bytes (register width)
    const SIZE: usize;
    /// Whether the type is signed (two's complement)
    const SIGNED: bool;

    /// Decode from exactly `SIZE` bytes
    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self;

    /// Encode into the first `SIZE` bytes of `out`
    fn write_bytes(self, order: ByteOrder, out: &mut [u8]);
}

macro_rules! impl_primitive {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Primitive for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();
                const SIGNED: bool = $signed;

                fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self {
                    let mut array = [0u8; core::mem::size_of::<$ty>()];
                    array.copy_from_slice(&bytes[..Self::SIZE]);
                    match order {
                        ByteOrder::BigEndian => <$ty>::from_be_bytes(array),
                        ByteOrder::LittleEndian => <$ty>::from_le_bytes(array),
                    }
                }

                fn write_bytes(self, order: ByteOrder, out: &mut [u8]) {
                    let array = match order {
                        ByteOrder::BigEndian => self.to_be_bytes(),
                        ByteOrder::LittleEndian => self.to_le_bytes(),
                    };
                    out[..Self::SIZE].copy_from_slice(&array);
                }
            }
        )*
    };
}

impl_primitive!(u8 => false, i8 => true, u16 => false, i16 => true, u32 => false, i32 => true);

/// A whole register (1, 2 or 4 bytes) decoded as a fixed-width integer
///
/// Byte width and signedness come from `T`; the byte order defaults to big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int<T, A = ReadOnly> {
    register: u8,
    order: ByteOrder,
    _marker: PhantomData<(T, A)>,
}

impl<T: Primitive, A: Access> Int<T, A> {
    /// Define a big-endian integer register
    #[must_use]
    pub const fn new(register: u8) -> Self {
        Self {
            register,
            order: ByteOrder::BigEndian,
            _marker: PhantomData,
        }
    }

    /// Use a different byte order
    #[must_use]
    pub const fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Register address of the first byte
    #[must_use]
    pub const fn register(&self) -> u8 {
        self.register
    }

    /// Byte order of the register
    #[must_use]
    pub const fn order(&self) -> ByteOrder {
        self.order
    }
}

impl<T: Primitive, A: Access> RegisterField for Int<T, A> {
    type Value = T;

    #[cfg(not(feature = "async"))]
    fn read<I>(&self, interface: &mut I) -> Result<T, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let mut buffer = [0u8; MAX_REGISTER_BYTES];
        let bytes = &mut buffer[..T::SIZE];
        interface.read_register(self.register, (T::SIZE * 8) as u32, bytes)?;
        Ok(T::from_bytes(bytes, self.order))
    }

    #[cfg(feature = "async")]
    async fn read<I>(&self, interface: &mut I) -> Result<T, Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        let mut buffer = [0u8; MAX_REGISTER_BYTES];
        let bytes = &mut buffer[..T::SIZE];
        interface
            .read_register(self.register, (T::SIZE * 8) as u32, bytes)
            .await?;
        Ok(T::from_bytes(bytes, self.order))
    }
}

impl<T: Primitive> WritableField for Int<T, ReadWrite> {
    #[cfg(not(feature = "async"))]
    fn write<I>(&self, interface: &mut I, value: T) -> Result<(), Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        let mut buffer = [0u8; MAX_REGISTER_BYTES];
        value.write_bytes(self.order, &mut buffer);
        interface.write_register(self.register, (T::SIZE * 8) as u32, &buffer[..T::SIZE])?;
        Ok(())
    }

    #[cfg(feature = "async")]
    async fn write<I>(&self, interface: &mut I, value: T) -> Result<(), Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        let mut buffer = [0u8; MAX_REGISTER_BYTES];
        value.write_bytes(self.order, &mut buffer);
        interface
            .write_register(self.register, (T::SIZE * 8) as u32, &buffer[..T::SIZE])
            .await?;
        Ok(())
    }
}

// ==================== TYPE-ERASED FIELD ====================

/// Any field definition, with its type erased
///
/// Lets fields of different kinds share one collection, see
/// [`TransactionBatch`](crate::TransactionBatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnyField {
    /// A [`Bit`] field
    Bit {
        /// Register address
        register: u8,
        /// Register width in bytes
        width: u8,
        /// Bit position
        position: u8,
        /// Byte order
        order: ByteOrder,
    },
    /// A [`Bits`] field
    Bits {
        /// Register address
        register: u8,
        /// Register width in bytes
        width: u8,
        /// Lowest bit of the field
        lsb: u8,
        /// Highest bit of the field (inclusive)
        msb: u8,
        /// Byte order
        order: ByteOrder,
    },
    /// An [`Int`] field
    Int {
        /// Register address
        register: u8,
        /// Register width in bytes
        width: u8,
        /// Two's complement decoding
        signed: bool,
        /// Byte order
        order: ByteOrder,
    },
}

/// Value read through an [`AnyField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldValue {
    /// From a [`Bit`] field
    Bit(bool),
    /// From a [`Bits`] field
    Bits(u32),
    /// From an [`Int`] field, widened
    Int(i64),
}

impl FieldValue {
    /// The bit value, if this came from a [`Bit`] field
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bit(value) => Some(value),
            _ => None,
        }
    }

    /// The field value, if this came from a [`Bits`] field
    #[must_use]
    pub const fn as_u32(self) -> Option<u32> {
        match self {
            Self::Bits(value) => Some(value),
            _ => None,
        }
    }

    /// The integer value, if this came from an [`Int`] field
    #[must_use]
    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }
}

impl AnyField {
    /// Register address
    #[must_use]
    pub const fn register(&self) -> u8 {
        match *self {
            Self::Bit { register, .. } | Self::Bits { register, .. } | Self::Int { register, .. } => {
                register
            }
        }
    }

    /// Register width in bytes
    #[must_use]
    pub const fn width(&self) -> u8 {
        match *self {
            Self::Bit { width, .. } | Self::Bits { width, .. } | Self::Int { width, .. } => width,
        }
    }

    const fn order(&self) -> ByteOrder {
        match *self {
            Self::Bit { order, .. } | Self::Bits { order, .. } | Self::Int { order, .. } => order,
        }
    }

    /// Whether the field fits its register, as the typed constructors require
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        match *self {
            Self::Bit {
                width, position, ..
            } => valid_range(width, position, position),
            Self::Bits {
                width, lsb, msb, ..
            } => valid_range(width, lsb, msb),
            Self::Int { width, .. } => matches!(width, 1 | 2 | 4),
        }
    }

    /// Decode a raw register value
    ///
    /// An invalid bit range decodes as zero.
    #[must_use]
    pub fn decode(&self, raw: u32) -> FieldValue {
        match *self {
            Self::Bit { position, .. } => FieldValue::Bit(extract_bits(raw, position, position) != 0),
            Self::Bits { lsb, msb, .. } => FieldValue::Bits(extract_bits(raw, lsb, msb)),
            Self::Int {
                width,
                signed: true,
                ..
            } => FieldValue::Int(i64::from(twos_complement(raw, u32::from(width) * 8))),
            Self::Int { signed: false, .. } => FieldValue::Int(i64::from(raw)),
        }
    }
}

impl<A: Access> From<Bit<A>> for AnyField {
    fn from(bit: Bit<A>) -> Self {
        Self::Bit {
            register: bit.register,
            width: bit.width,
            position: bit.position,
            order: bit.order,
        }
    }
}

impl<A: Access> From<Bits<A>> for AnyField {
    fn from(bits: Bits<A>) -> Self {
        Self::Bits {
            register: bits.register,
            width: bits.width,
            lsb: bits.lsb,
            msb: bits.msb,
            order: bits.order,
        }
    }
}

impl<T: Primitive, A: Access> From<Int<T, A>> for AnyField {
    fn from(int: Int<T, A>) -> Self {
        Self::Int {
            register: int.register,
            width: T::SIZE as u8,
            signed: T::SIGNED,
            order: int.order,
        }
    }
}

impl RegisterField for AnyField {
    type Value = FieldValue;

    #[cfg(not(feature = "async"))]
    fn read<I>(&self, interface: &mut I) -> Result<FieldValue, Error<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        if !self.is_valid() {
            return Err(Error::InvalidConfig(ConfigError::InvalidField));
        }
        let raw = read_raw(interface, self.register(), self.width(), self.order())?;
        Ok(self.decode(raw))
    }

    #[cfg(feature = "async")]
    async fn read<I>(&self, interface: &mut I) -> Result<FieldValue, Error<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        if !self.is_valid() {
            return Err(Error::InvalidConfig(ConfigError::InvalidField));
        }
        let raw = read_raw(interface, self.register(), self.width(), self.order()).await?;
        Ok(self.decode(raw))
    }
}
