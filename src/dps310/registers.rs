//! DPS310 register map
//!
//! Addresses and field layouts from the DPS310 datasheet, section 7. Every field is a
//! `const` item; none of them hold state.

use crate::field::{Bit, Bits, Int, ReadOnly, ReadWrite};

/// DPS310 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Pressure result, 24 bits over three registers
    PsrB2 = 0x00,
    /// Temperature result, 24 bits over three registers
    TmpB2 = 0x03,
    /// Pressure measurement rate and oversampling
    PrsCfg = 0x06,
    /// Temperature measurement rate, oversampling and source
    TmpCfg = 0x07,
    /// Measurement mode and ready flags
    MeasCfg = 0x08,
    /// Interrupt, FIFO and result shift configuration
    CfgReg = 0x09,
    /// Interrupt status
    IntSts = 0x0A,
    /// FIFO status
    FifoSts = 0x0B,
    /// Soft reset and FIFO flush
    Reset = 0x0C,
    /// Product and revision ID
    ProductId = 0x0D,
    /// First byte of the 18-byte calibration coefficient block
    Coef = 0x10,
    /// Temperature sensor used for the calibration coefficients
    CoefSrce = 0x28,
}

impl Register {
    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Length of the calibration coefficient block
pub const COEF_BLOCK_LEN: usize = 18;

/// Length of the pressure + temperature result block
pub const RESULT_BLOCK_LEN: usize = 6;

/// Value of PRODUCT_ID bits 0-3 on a DPS310
pub const PRODUCT_ID_VALUE: u8 = 0x0;

/// SOFT_RST pattern that triggers a reset
pub const SOFT_RESET_VALUE: u32 = 0b1001;

// PRS_CFG
/// Pressure oversampling (PM_PRC)
pub const PM_PRC: Bits<ReadWrite> = Bits::new(Register::PrsCfg.addr(), 1, 0, 3);
/// Pressure measurement rate (PM_RATE)
pub const PM_RATE: Bits<ReadWrite> = Bits::new(Register::PrsCfg.addr(), 1, 4, 6);

// TMP_CFG
/// Temperature oversampling (TMP_PRC)
pub const TMP_PRC: Bits<ReadWrite> = Bits::new(Register::TmpCfg.addr(), 1, 0, 3);
/// Temperature measurement rate (TMP_RATE)
pub const TMP_RATE: Bits<ReadWrite> = Bits::new(Register::TmpCfg.addr(), 1, 4, 6);
/// External (MEMS) temperature sensor select (TMP_EXT)
pub const TMP_EXT: Bit<ReadWrite> = Bit::new(Register::TmpCfg.addr(), 1, 7);

// MEAS_CFG
/// Whole `MEAS_CFG` register, for reading every ready flag at once
pub const MEAS_CFG: Int<u8, ReadOnly> = Int::new(Register::MeasCfg.addr());
/// Measurement mode (MEAS_CTRL)
pub const MEAS_CTRL: Bits<ReadWrite> = Bits::new(Register::MeasCfg.addr(), 1, 0, 2);
/// Pressure result ready
pub const PRS_RDY: Bit<ReadOnly> = Bit::new(Register::MeasCfg.addr(), 1, 4);
/// Temperature result ready
pub const TMP_RDY: Bit<ReadOnly> = Bit::new(Register::MeasCfg.addr(), 1, 5);
/// Sensor initialization complete
pub const SENSOR_RDY: Bit<ReadOnly> = Bit::new(Register::MeasCfg.addr(), 1, 6);
/// Calibration coefficients available
pub const COEF_RDY: Bit<ReadOnly> = Bit::new(Register::MeasCfg.addr(), 1, 7);

// CFG_REG
/// FIFO enable
pub const FIFO_EN: Bit<ReadWrite> = Bit::new(Register::CfgReg.addr(), 1, 1);
/// Pressure result bit-shift, required above 8x oversampling
pub const P_SHIFT: Bit<ReadWrite> = Bit::new(Register::CfgReg.addr(), 1, 2);
/// Temperature result bit-shift, required above 8x oversampling
pub const T_SHIFT: Bit<ReadWrite> = Bit::new(Register::CfgReg.addr(), 1, 3);

// INT_STS
/// Whole `INT_STS` register
pub const INT_STS: Int<u8, ReadOnly> = Int::new(Register::IntSts.addr());
/// Pressure measurement interrupt
pub const INT_PRS: Bit<ReadOnly> = Bit::new(Register::IntSts.addr(), 1, 0);
/// Temperature measurement interrupt
pub const INT_TMP: Bit<ReadOnly> = Bit::new(Register::IntSts.addr(), 1, 1);
/// FIFO full interrupt
pub const INT_FIFO_FULL: Bit<ReadOnly> = Bit::new(Register::IntSts.addr(), 1, 2);

// FIFO_STS
/// Whole `FIFO_STS` register
pub const FIFO_STS: Int<u8, ReadOnly> = Int::new(Register::FifoSts.addr());
/// FIFO empty
pub const FIFO_EMPTY: Bit<ReadOnly> = Bit::new(Register::FifoSts.addr(), 1, 0);
/// FIFO full
pub const FIFO_FULL: Bit<ReadOnly> = Bit::new(Register::FifoSts.addr(), 1, 1);

// RESET
/// Soft reset pattern
pub const SOFT_RST: Bits<ReadWrite> = Bits::new(Register::Reset.addr(), 1, 0, 3);
/// FIFO flush
pub const FIFO_FLUSH: Bit<ReadWrite> = Bit::new(Register::Reset.addr(), 1, 7);

// PRODUCT_ID
/// Product ID
pub const PRODUCT_ID: Bits<ReadOnly> = Bits::new(Register::ProductId.addr(), 1, 0, 3);
/// Revision ID
pub const REVISION_ID: Bits<ReadOnly> = Bits::new(Register::ProductId.addr(), 1, 4, 7);

// COEF_SRCE
/// Temperature sensor the coefficients were calibrated against (1 = external MEMS)
pub const TMP_COEF_SRCE: Bit<ReadOnly> = Bit::new(Register::CoefSrce.addr(), 1, 7);

/// Raw pressure result, 24 bits big-endian
pub const PRS_RAW: Bits<ReadOnly> = Bits::new(Register::PsrB2.addr(), 3, 0, 23);
/// Raw temperature result, 24 bits big-endian
pub const TMP_RAW: Bits<ReadOnly> = Bits::new(Register::TmpB2.addr(), 3, 0, 23);
