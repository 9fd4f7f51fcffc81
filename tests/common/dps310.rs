//! DPS310 register fixtures

use super::MockInterface;
use i2c_regfield::DPS310_ADDRESS;

pub const RESULT_ADDR: u8 = 0x00;
pub const PRS_CFG_ADDR: u8 = 0x06;
pub const TMP_CFG_ADDR: u8 = 0x07;
pub const MEAS_CFG_ADDR: u8 = 0x08;
pub const CFG_REG_ADDR: u8 = 0x09;
pub const RESET_ADDR: u8 = 0x0C;
pub const PRODUCT_ID_ADDR: u8 = 0x0D;
pub const COEF_ADDR: u8 = 0x10;
pub const COEF_SRCE_ADDR: u8 = 0x28;

/// `SENSOR_RDY | COEF_RDY`
pub const READY_FLAGS: u8 = 0b1100_0000;

/// Coefficient block with
/// c0 = 198, c1 = 500, c00 = 80000, c10 = 20000, c01 = 100, c11 = 10, c20 = 5, c21 = 2
/// and c30 = 0x8003 (-3 sign-magnitude, -32765 two's complement)
pub const COEFFICIENT_BLOCK: [u8; 18] = [
    0x06, 0xC1, 0xF4, 0x13, 0x88, 0x00, 0x4E, 0x20, 0x00, 0x64, 0x00, 0x0A, 0x00, 0x05, 0x00,
    0x02, 0x80, 0x03,
];

/// Raw pressure 524288 (one kP at 1x) and raw temperature 262144
pub const RESULT_BLOCK: [u8; 6] = [0x08, 0x00, 0x00, 0x04, 0x00, 0x00];

/// Compensated pressure for [`COEFFICIENT_BLOCK`] and [`RESULT_BLOCK`] at 1x oversampling:
/// 80000 + (20000 + 5 - 3) + 0.5 * (100 + 10 + 2)
pub const EXPECTED_PRESSURE_PA: f64 = 100_058.0;

/// A DPS310 that has finished its power-on sequence
pub fn ready_device() -> MockInterface {
    let interface = MockInterface::new(DPS310_ADDRESS);
    // Revision 1, product 0
    interface.set_register(PRODUCT_ID_ADDR, 0x10);
    interface.set_register(MEAS_CFG_ADDR, READY_FLAGS);
    interface.set_registers(COEF_ADDR, &COEFFICIENT_BLOCK);
    interface.set_registers(RESULT_ADDR, &RESULT_BLOCK);
    interface
}
