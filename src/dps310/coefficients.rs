//! DPS310 calibration coefficients
//!
//! The 18-byte block at 0x10 packs nine factory coefficients into 12, 20 and 16 bit
//! fields. Layout (byte indices into the block):
//!
//! | Coefficient | Bits | Assembly |
//! |---|---|---|
//! | c0  | 12 | `(b0 << 5) \| (b1 >> 5)` |
//! | c1  | 12 | `((b1 & 0x0F) << 8) \| b2` |
//! | c00 | 20 | `(b3 << 12) \| (b4 << 4) \| (b5 >> 4)` |
//! | c10 | 20 | `((b5 & 0x0F) << 16) \| (b6 << 8) \| b7` |
//! | c01..c30 | 16 | big-endian words at bytes 8, 10, 12, 14, 16 |

use super::registers::COEF_BLOCK_LEN;
use crate::sign::SignConvention;

/// Decoded calibration coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coefficients {
    /// Temperature offset
    pub c0: i32,
    /// Temperature gain
    pub c1: i32,
    /// Pressure offset
    pub c00: i32,
    /// Pressure linear term
    pub c10: i32,
    /// Temperature cross term
    pub c01: i32,
    /// Pressure-temperature cross term
    pub c11: i32,
    /// Pressure quadratic term
    pub c20: i32,
    /// Pressure quadratic cross term
    pub c21: i32,
    /// Pressure cubic term
    pub c30: i32,
}

impl Coefficients {
    /// Decode the coefficient block, sign-extending each field with `convention`
    #[must_use]
    pub fn from_bytes(block: &[u8; COEF_BLOCK_LEN], convention: SignConvention) -> Self {
        let b = |i: usize| u32::from(block[i]);
        let word = |i: usize| (b(i) << 8) | b(i + 1);

        let c0 = ((b(0) << 5) | (b(1) >> 5)) & 0xFFF;
        let c1 = ((b(1) & 0x0F) << 8) | b(2);
        let c00 = (b(3) << 12) | (b(4) << 4) | (b(5) >> 4);
        let c10 = ((b(5) & 0x0F) << 16) | (b(6) << 8) | b(7);

        Self {
            c0: convention.decode(c0, 12),
            c1: convention.decode(c1, 12),
            c00: convention.decode(c00, 20),
            c10: convention.decode(c10, 20),
            c01: convention.decode(word(8), 16),
            c11: convention.decode(word(10), 16),
            c20: convention.decode(word(12), 16),
            c21: convention.decode(word(14), 16),
            c30: convention.decode(word(16), 16),
        }
    }
}
