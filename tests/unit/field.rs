//! Unit tests for field reads and read-modify-write

use crate::common::{MockError, MockInterface, Operation};
use i2c_regfield::field::MAX_REGISTER_BYTES;
use i2c_regfield::{
    AnyField, Bit, Bits, ByteOrder, ConfigError, Error, FieldValue, Int, ReadOnly, ReadWrite,
    RegisterField, WritableField,
};

const DEVICE: u8 = 0x40;

#[test]
fn test_bits_write_preserves_neighbours() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_register(0x20, 0b1010_0101);

    let field: Bits<ReadWrite> = Bits::new(0x20, 1, 2, 4);
    field.write(&mut interface, 0b011).unwrap();

    assert_eq!(interface.register(0x20), 0b1010_1101);
    assert_eq!(field.read(&mut interface).unwrap(), 0b011);
}

#[test]
fn test_bit_write_sets_and_clears() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_register(0x21, 0xF0);

    let low: Bit<ReadWrite> = Bit::new(0x21, 1, 0);
    let high: Bit<ReadWrite> = Bit::new(0x21, 1, 7);

    low.write(&mut interface, true).unwrap();
    assert_eq!(interface.register(0x21), 0xF1);

    high.write(&mut interface, false).unwrap();
    assert_eq!(interface.register(0x21), 0x71);

    assert!(low.read(&mut interface).unwrap());
    assert!(!high.read(&mut interface).unwrap());
}

#[test]
fn test_write_is_read_then_single_write() {
    let mut interface = MockInterface::new(DEVICE);
    let field: Bits<ReadWrite> = Bits::new(0x22, 1, 0, 3);

    field.write(&mut interface, 5).unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: 0x22,
                len: 1
            },
            Operation::Write {
                address: 0x22,
                data: vec![5]
            },
        ]
    );
}

#[test]
fn test_out_of_range_write_never_touches_bus() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_register(0x23, 0xAA);
    let field: Bits<ReadWrite> = Bits::new(0x23, 1, 0, 2);

    let result = field.write(&mut interface, 8);

    assert_eq!(result, Err(Error::FieldRange { value: 8, bits: 3 }));
    assert!(interface.operations().is_empty());
    assert_eq!(interface.register(0x23), 0xAA);
}

#[test]
fn test_largest_value_fits() {
    let mut interface = MockInterface::new(DEVICE);
    let field: Bits<ReadWrite> = Bits::new(0x24, 1, 5, 7);

    field.write(&mut interface, field.max_value()).unwrap();
    assert_eq!(interface.register(0x24), 0b1110_0000);
}

#[test]
fn test_multi_byte_field_byte_order() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_registers(0x30, &[0x12, 0x34]);

    let big: Bits<ReadOnly> = Bits::new(0x30, 2, 4, 11);
    let little: Bits<ReadOnly> = Bits::new(0x30, 2, 4, 11).with_order(ByteOrder::LittleEndian);

    // 0x1234 and 0x3412
    assert_eq!(big.read(&mut interface).unwrap(), 0x23);
    assert_eq!(little.read(&mut interface).unwrap(), 0x41);
}

#[test]
fn test_three_byte_field_spans_registers() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_registers(0x00, &[0xAB, 0xCD, 0xEF]);

    let field: Bits<ReadOnly> = Bits::new(0x00, 3, 0, 23);
    assert_eq!(field.read(&mut interface).unwrap(), 0x00AB_CDEF);
    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            address: 0x00,
            len: 3
        }]
    );
}

#[test]
fn test_multi_byte_write_preserves_other_byte() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_registers(0x38, &[0xFF, 0xFF]);

    // Bits 4..=11 of a big-endian word straddle both bytes
    let field: Bits<ReadWrite> = Bits::new(0x38, 2, 4, 11);
    field.write(&mut interface, 0).unwrap();

    assert_eq!(interface.register(0x38), 0xF0);
    assert_eq!(interface.register(0x39), 0x0F);
}

#[test]
fn test_int_fields() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_registers(0x40, &[0xFF, 0xFE]);
    interface.set_register(0x42, 0x80);

    let word: Int<i16> = Int::new(0x40);
    let byte: Int<i8> = Int::new(0x42);
    let unsigned: Int<u8> = Int::new(0x42);

    assert_eq!(word.read(&mut interface).unwrap(), -2);
    assert_eq!(byte.read(&mut interface).unwrap(), -128);
    assert_eq!(unsigned.read(&mut interface).unwrap(), 0x80);
}

#[test]
fn test_int_write_covers_whole_register() {
    let mut interface = MockInterface::new(DEVICE);
    let field: Int<u16, ReadWrite> = Int::new(0x44).with_order(ByteOrder::LittleEndian);

    field.write(&mut interface, 0x1234).unwrap();

    assert_eq!(interface.register(0x44), 0x34);
    assert_eq!(interface.register(0x45), 0x12);
    // Whole-register writes skip the read
    assert_eq!(
        interface.operations(),
        vec![Operation::Write {
            address: 0x44,
            data: vec![0x34, 0x12]
        }]
    );
}

#[test]
fn test_read_error_propagates() {
    let mut interface = MockInterface::new(DEVICE);
    let field: Bit<ReadOnly> = Bit::new(0x50, 1, 0);

    interface.fail_next_read();
    assert_eq!(
        field.read(&mut interface),
        Err(Error::Bus(MockError::Communication))
    );

    // Recovers on the next call
    assert_eq!(field.read(&mut interface), Ok(false));
}

#[test]
fn test_failed_write_leaves_register() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_register(0x51, 0x0F);
    let field: Bit<ReadWrite> = Bit::new(0x51, 1, 7);

    interface.fail_next_write();
    assert_eq!(
        field.write(&mut interface, true),
        Err(Error::Bus(MockError::Communication))
    );
    assert_eq!(interface.register(0x51), 0x0F);
}

#[test]
fn test_failed_read_aborts_modify_write() {
    let mut interface = MockInterface::new(DEVICE);
    let field: Bits<ReadWrite> = Bits::new(0x52, 1, 0, 3);

    interface.fail_next_read();
    assert!(field.write(&mut interface, 1).is_err());
    assert!(interface.writes_to(0x52).is_empty());
}

#[test]
fn test_any_field_reads_like_its_source() {
    let mut interface = MockInterface::new(DEVICE);
    interface.set_registers(0x60, &[0x80, 0x01]);

    let bit: AnyField = Bit::<ReadOnly>::new(0x60, 1, 7).into();
    let bits: AnyField = Bits::<ReadOnly>::new(0x60, 2, 0, 8).into();
    let int: AnyField = Int::<i16>::new(0x60).into();

    assert_eq!(bit.read(&mut interface).unwrap(), FieldValue::Bit(true));
    assert_eq!(bits.read(&mut interface).unwrap(), FieldValue::Bits(0x001));
    assert_eq!(int.read(&mut interface).unwrap(), FieldValue::Int(-32767));
    assert_eq!(int.width(), 2);
}

#[test]
fn test_malformed_any_field_is_refused_before_bus() {
    let mut interface = MockInterface::new(DEVICE);
    let inverted = AnyField::Bits {
        register: 0x60,
        width: 1,
        lsb: 5,
        msb: 3,
        order: ByteOrder::BigEndian,
    };
    let too_wide = AnyField::Int {
        register: 0x60,
        width: 8,
        signed: false,
        order: ByteOrder::BigEndian,
    };

    for field in [inverted, too_wide] {
        assert!(!field.is_valid());
        assert_eq!(
            field.read(&mut interface),
            Err(Error::InvalidConfig(ConfigError::InvalidField))
        );
    }
    assert!(interface.operations().is_empty());
}

#[test]
fn test_invalid_definitions_rejected() {
    assert!(Bits::<ReadOnly>::try_new(0x00, 1, 3, 2).is_none());
    assert!(Bits::<ReadOnly>::try_new(0x00, 1, 0, 8).is_none());
    assert!(Bits::<ReadOnly>::try_new(0x00, 0, 0, 0).is_none());
    assert!(
        Bits::<ReadOnly>::try_new(0x00, MAX_REGISTER_BYTES as u8 + 1, 0, 0).is_none()
    );
    assert!(Bit::<ReadOnly>::try_new(0x00, 2, 16).is_none());
    assert!(Bit::<ReadOnly>::try_new(0x00, 2, 15).is_some());
}
