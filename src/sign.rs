//! Signed interpretation of irregular-width fields
//!
//! Calibration words and raw ADC counts on the DPS310 are packed into 12, 16, 20 and 24
//! bit fields that straddle byte boundaries. The sign is always taken from the top bit of
//! the *field*, never from the byte container it was assembled in.
//!
//! Two conventions are supported:
//!
//! - [`sign_magnitude`]: bit `N-1` is a sign flag and bits `0..N-1` are the magnitude.
//!   This is the default.
//! - [`twos_complement`]: standard two's complement over `N` bits.
//!
//! The two agree for every non-negative value and disagree for every negative one, so
//! switching conventions changes hardware-observed readings.

/// How a driver interprets the top bit of a signed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignConvention {
    /// Top bit is a sign flag, lower `N-1` bits are the magnitude
    #[default]
    SignMagnitude,
    /// Standard two's complement
    TwosComplement,
}

impl SignConvention {
    /// Decode the low `bits` bits of `raw` as a signed value
    ///
    /// Bits above the field width are ignored. `bits` must be in `1..=32`.
    #[must_use]
    pub const fn decode(self, raw: u32, bits: u32) -> i32 {
        match self {
            Self::SignMagnitude => sign_magnitude(raw, bits),
            Self::TwosComplement => twos_complement(raw, bits),
        }
    }
}

/// Decode an `bits`-wide field whose top bit is a sign flag
///
/// The magnitude uses only the lower `bits - 1` bits, so `1 << (bits - 1)` decodes to 0
/// and `(1 << (bits - 1)) | m` decodes to `-m`.
#[must_use]
pub const fn sign_magnitude(raw: u32, bits: u32) -> i32 {
    let sign = 1u32 << (bits - 1);
    let magnitude = (raw & (sign - 1)) as i32;
    if raw & sign == 0 { magnitude } else { -magnitude }
}

/// Decode an `bits`-wide two's complement field
#[must_use]
pub const fn twos_complement(raw: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((raw << shift) as i32) >> shift
}
