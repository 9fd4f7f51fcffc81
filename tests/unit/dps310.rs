//! Unit tests for the DPS310 calibration sequence

use crate::common::dps310::{
    ready_device, CFG_REG_ADDR, COEF_ADDR, COEF_SRCE_ADDR,
    EXPECTED_PRESSURE_PA, MEAS_CFG_ADDR, PRODUCT_ID_ADDR, PRS_CFG_ADDR, READY_FLAGS,
    RESET_ADDR, TMP_CFG_ADDR,
};
use crate::common::{assert_float_eq, MockDelay, MockError, MockInterface};
use i2c_regfield::dps310::{
    CalibrationState, Coefficients, MeasurementMode, MeasurementRate, Oversampling,
    PressureUnit, ScaleFactors,
};
use i2c_regfield::{ConfigError, Dps310, Dps310Config, Error, SignConvention};

fn create_driver(config: Dps310Config) -> (Dps310<MockInterface>, MockInterface) {
    let interface = ready_device();
    let handle = interface.clone();
    let driver = Dps310::new(interface, config).expect("Failed to create mock driver");
    (driver, handle)
}

fn create_ready_driver() -> (Dps310<MockInterface>, MockInterface) {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    driver.init(&mut MockDelay::new()).unwrap();
    (driver, interface)
}

#[test]
fn test_new_rejects_wrong_product() {
    let interface = ready_device();
    interface.set_register(PRODUCT_ID_ADDR, 0x13);

    let result = Dps310::new(interface, Dps310Config::default());
    assert!(matches!(result, Err(Error::InvalidDevice(3))));
}

#[test]
fn test_new_writes_configuration() {
    let config = Dps310Config {
        pressure_oversampling: Oversampling::X64,
        pressure_rate: MeasurementRate::Hz8,
        temperature_oversampling: Oversampling::X2,
        temperature_rate: MeasurementRate::Hz4,
        ..Dps310Config::default()
    };
    let (driver, interface) = create_driver(config);

    assert_eq!(driver.state(), CalibrationState::AwaitingCoefficientReady);
    assert_eq!(interface.register(PRS_CFG_ADDR), 0x36);
    assert_eq!(interface.register(TMP_CFG_ADDR), 0x21);
    // Ready flags survive the MEAS_CTRL update
    assert_eq!(interface.register(MEAS_CFG_ADDR), READY_FLAGS | 0b111);
    assert!(driver.coefficients().is_none());
    assert!(driver.scale_factors().is_none());
}

#[test]
fn test_init_reaches_ready() {
    let (driver, _interface) = create_ready_driver();

    assert_eq!(driver.state(), CalibrationState::Ready);
    assert_eq!(
        driver.coefficients(),
        Some(&Coefficients {
            c0: 198,
            c1: 500,
            c00: 80_000,
            c10: 20_000,
            c01: 100,
            c11: 10,
            c20: 5,
            c21: 2,
            c30: -3,
        })
    );
    assert_eq!(
        driver.scale_factors(),
        Some(&ScaleFactors::resolve(Oversampling::X1, Oversampling::X1))
    );
}

#[test]
fn test_coefficients_read_as_one_block() {
    let (_driver, interface) = create_ready_driver();
    assert_eq!(interface.read_count(COEF_ADDR), 1);
}

#[test]
fn test_twos_complement_convention() {
    let config = Dps310Config {
        sign_convention: SignConvention::TwosComplement,
        ..Dps310Config::default()
    };
    let (mut driver, _interface) = create_driver(config);
    driver.init(&mut MockDelay::new()).unwrap();

    let coefficients = driver.coefficients().copied().unwrap();
    assert_eq!(coefficients.c30, -32765);
    assert_eq!(coefficients.c00, 80_000);
}

#[test]
fn test_read_measurement_compensates() {
    let (mut driver, _interface) = create_ready_driver();

    let measurement = driver.read_measurement().unwrap();

    assert_float_eq(measurement.pressure_pa, EXPECTED_PRESSURE_PA, 1e-6);
    assert_float_eq(measurement.temperature, 0.5, 1e-12);
    assert_float_eq(
        measurement.pressure_in(PressureUnit::Hectopascal),
        1000.58,
        1e-9,
    );
    assert_float_eq(
        measurement.display_pressure(),
        EXPECTED_PRESSURE_PA / 68.948,
        1e-9,
    );
}

#[test]
fn test_measurement_before_ready_is_refused() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.clear_operations();

    assert_eq!(driver.read_measurement().unwrap_err(), Error::NotReady);
    assert!(interface.operations().is_empty());

    driver.load_coefficients(&mut MockDelay::new()).unwrap();
    assert_eq!(driver.state(), CalibrationState::CoefficientsLoaded);
    assert_eq!(driver.read_measurement().unwrap_err(), Error::NotReady);
}

#[test]
fn test_resolve_before_coefficients_is_refused() {
    let (mut driver, _interface) = create_driver(Dps310Config::default());
    assert_eq!(driver.resolve_scale_factors(), Err(Error::NotReady));
    assert_eq!(driver.state(), CalibrationState::AwaitingCoefficientReady);
}

#[test]
fn test_sensor_ready_timeout_is_bounded() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    interface.clear_operations();
    let delay = MockDelay::new();

    let result = driver.init(&mut delay.clone());

    assert_eq!(result, Err(Error::NotReady));
    assert_eq!(delay.calls(), 50);
    assert_eq!(delay.total_ms(), 500);
    assert_eq!(interface.read_count(MEAS_CFG_ADDR), 51);
    assert_eq!(interface.read_count(COEF_ADDR), 0);
    assert_eq!(driver.state(), CalibrationState::AwaitingCoefficientReady);
}

#[test]
fn test_coefficient_ready_timeout() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    // SENSOR_RDY only
    interface.set_register(MEAS_CFG_ADDR, 0b0100_0000);
    let delay = MockDelay::new();

    let result = driver.load_coefficients(&mut delay.clone());

    assert_eq!(result, Err(Error::NotReady));
    assert_eq!(delay.calls(), 50);
    assert_eq!(delay.total_ms(), 500);
    assert!(driver.coefficients().is_none());
}

#[test]
fn test_custom_timeout_and_interval() {
    let config = Dps310Config {
        ready_timeout_ms: 35,
        poll_interval_ms: 10,
        ..Dps310Config::default()
    };
    let (mut driver, interface) = create_driver(config);
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    let delay = MockDelay::new();

    assert_eq!(
        driver.load_coefficients(&mut delay.clone()),
        Err(Error::NotReady)
    );
    // 10 + 10 + 10 + 5
    assert_eq!(delay.calls(), 4);
    assert_eq!(delay.total_ms(), 35);
}

#[test]
fn test_last_poll_delay_is_cut_to_timeout() {
    let config = Dps310Config {
        ready_timeout_ms: 35,
        poll_interval_ms: 30,
        ..Dps310Config::default()
    };
    let (mut driver, interface) = create_driver(config);
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    let delay = MockDelay::new();

    assert_eq!(
        driver.load_coefficients(&mut delay.clone()),
        Err(Error::NotReady)
    );
    assert_eq!(delay.calls(), 2);
    assert!(delay.total_ms() <= 35);
}

#[test]
fn test_timeout_covers_both_ready_flags() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    // SENSOR_RDY comes up after 200 ms, COEF_RDY never does
    interface.set_register_after_reads(MEAS_CFG_ADDR, 20, 0b0100_0000);
    interface.clear_operations();
    let delay = MockDelay::new();

    let result = driver.load_coefficients(&mut delay.clone());

    assert_eq!(result, Err(Error::NotReady));
    assert_eq!(delay.calls(), 50);
    assert_eq!(delay.total_ms(), 500);
    assert_eq!(interface.read_count(MEAS_CFG_ADDR), 52);
    assert_eq!(interface.read_count(COEF_ADDR), 0);
}

#[test]
fn test_late_sensor_ready_still_loads() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    interface.set_register_after_reads(MEAS_CFG_ADDR, 30, READY_FLAGS);
    let delay = MockDelay::new();

    driver.init(&mut delay.clone()).unwrap();

    assert_eq!(driver.state(), CalibrationState::Ready);
    assert_eq!(delay.total_ms(), 300);
}

#[test]
fn test_zero_poll_interval_still_terminates() {
    let config = Dps310Config {
        ready_timeout_ms: 5,
        poll_interval_ms: 0,
        ..Dps310Config::default()
    };
    let (mut driver, interface) = create_driver(config);
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    let delay = MockDelay::new();

    assert_eq!(
        driver.load_coefficients(&mut delay.clone()),
        Err(Error::NotReady)
    );
    // Each poll still waits the 1 ms it is counted as
    assert_eq!(delay.calls(), 5);
    assert_eq!(delay.total_ms(), 5);
}

#[test]
fn test_load_can_be_retried_after_timeout() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    assert!(driver.init(&mut MockDelay::new()).is_err());

    interface.set_register(MEAS_CFG_ADDR, READY_FLAGS);
    driver.init(&mut MockDelay::new()).unwrap();
    assert_eq!(driver.state(), CalibrationState::Ready);
}

#[test]
fn test_flags_already_set_skip_delays() {
    let (mut driver, _interface) = create_driver(Dps310Config::default());
    let delay = MockDelay::new();

    driver.init(&mut delay.clone()).unwrap();
    assert_eq!(delay.calls(), 0);
}

#[test]
fn test_bus_error_during_coefficient_read() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.fail_reads_at(COEF_ADDR);

    let result = driver.init(&mut MockDelay::new());

    assert_eq!(result, Err(Error::Bus(MockError::Communication)));
    assert_eq!(driver.state(), CalibrationState::AwaitingCoefficientReady);
    assert!(driver.coefficients().is_none());
}

#[test]
fn test_shift_bits_follow_oversampling() {
    let config = Dps310Config {
        pressure_oversampling: Oversampling::X16,
        temperature_oversampling: Oversampling::X8,
        ..Dps310Config::default()
    };
    let (mut driver, interface) = create_driver(config);
    driver.init(&mut MockDelay::new()).unwrap();

    let scale = driver.scale_factors().copied().unwrap();
    assert_eq!(scale.kp, 253_952);
    assert_eq!(scale.kt, 7_864_320);
    // P_SHIFT set, T_SHIFT clear
    assert_eq!(interface.register(CFG_REG_ADDR) & 0b1100, 0b0100);
}

#[test]
fn test_scale_factors_come_from_device() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    driver.load_coefficients(&mut MockDelay::new()).unwrap();
    // Oversampling changed behind the driver's back: 32x pressure, 64x temperature
    interface.set_register(PRS_CFG_ADDR, 0x05);
    interface.set_register(TMP_CFG_ADDR, 0x06);

    driver.resolve_scale_factors().unwrap();

    assert_eq!(
        driver.scale_factors(),
        Some(&ScaleFactors::resolve(Oversampling::X32, Oversampling::X64))
    );
    assert_eq!(interface.register(CFG_REG_ADDR) & 0b1100, 0b1100);
}

#[test]
fn test_reserved_oversampling_rejected() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    driver.load_coefficients(&mut MockDelay::new()).unwrap();
    interface.set_register(PRS_CFG_ADDR, 0x0F);

    assert_eq!(
        driver.resolve_scale_factors(),
        Err(Error::InvalidConfig(ConfigError::InvalidOversampling(15)))
    );
    assert_eq!(driver.state(), CalibrationState::CoefficientsLoaded);
}

#[test]
fn test_configure_oversampling_when_ready() {
    let (mut driver, interface) = create_ready_driver();

    driver
        .configure_oversampling(Oversampling::X128, Oversampling::X2)
        .unwrap();

    assert_eq!(driver.state(), CalibrationState::Ready);
    assert_eq!(interface.register(PRS_CFG_ADDR) & 0x0F, 7);
    assert_eq!(interface.register(TMP_CFG_ADDR) & 0x0F, 1);
    assert_eq!(driver.config().pressure_oversampling, Oversampling::X128);
    assert_eq!(
        driver.scale_factors(),
        Some(&ScaleFactors::resolve(Oversampling::X128, Oversampling::X2))
    );
    assert_eq!(interface.register(CFG_REG_ADDR) & 0b1100, 0b0100);
}

#[test]
fn test_configure_oversampling_before_coefficients() {
    let (mut driver, interface) = create_driver(Dps310Config::default());

    driver
        .configure_oversampling(Oversampling::X4, Oversampling::X4)
        .unwrap();

    assert_eq!(driver.state(), CalibrationState::AwaitingCoefficientReady);
    assert!(driver.scale_factors().is_none());
    assert_eq!(interface.register(PRS_CFG_ADDR) & 0x0F, 2);
}

#[test]
fn test_coefficient_source_copied_to_tmp_ext() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.set_register(COEF_SRCE_ADDR, 0x80);

    driver.load_coefficients(&mut MockDelay::new()).unwrap();
    assert_eq!(interface.register(TMP_CFG_ADDR) & 0x80, 0x80);

    interface.set_register(COEF_SRCE_ADDR, 0x00);
    driver.load_coefficients(&mut MockDelay::new()).unwrap();
    assert_eq!(interface.register(TMP_CFG_ADDR) & 0x80, 0x00);
}

#[test]
fn test_reload_drops_scale_factors() {
    let (mut driver, _interface) = create_ready_driver();

    driver.load_coefficients(&mut MockDelay::new()).unwrap();

    assert_eq!(driver.state(), CalibrationState::CoefficientsLoaded);
    assert!(driver.scale_factors().is_none());
    assert_eq!(driver.read_measurement().unwrap_err(), Error::NotReady);
}

#[test]
fn test_soft_reset_requires_init_again() {
    let (mut driver, interface) = create_ready_driver();
    interface.clear_operations();
    let delay = MockDelay::new();

    driver.soft_reset(&mut delay.clone()).unwrap();

    assert_eq!(interface.writes_to(RESET_ADDR), vec![vec![0x09]]);
    assert_eq!(delay.total_ms(), 40);
    assert_eq!(driver.state(), CalibrationState::AwaitingCoefficientReady);
    assert!(driver.coefficients().is_none());
    assert_eq!(driver.read_measurement().unwrap_err(), Error::NotReady);

    driver.init(&mut MockDelay::new()).unwrap();
    assert_eq!(driver.state(), CalibrationState::Ready);
}

#[test]
fn test_soft_reset_times_out() {
    let (mut driver, interface) = create_ready_driver();
    interface.set_register(MEAS_CFG_ADDR, 0x00);
    let delay = MockDelay::new();

    assert_eq!(driver.soft_reset(&mut delay.clone()), Err(Error::NotReady));
    // Reset settle time plus the bounded poll
    assert_eq!(delay.total_ms(), 540);
}

#[test]
fn test_status_registers() {
    let (mut driver, interface) = create_driver(Dps310Config::default());
    interface.set_register(MEAS_CFG_ADDR, 0xF0);
    interface.set_register(0x0A, 0b011);
    interface.set_register(0x0B, 0b10);

    let status = driver.status().unwrap();
    assert!(status.coefficients_ready && status.sensor_ready);
    assert!(status.temperature_ready && status.pressure_ready);

    let interrupts = driver.interrupt_status().unwrap();
    assert!(interrupts.pressure && interrupts.temperature && !interrupts.fifo_full);

    let fifo = driver.fifo_status().unwrap();
    assert!(!fifo.empty && fifo.full);
}

#[test]
fn test_fifo_control() {
    let (mut driver, interface) = create_driver(Dps310Config::default());

    driver.set_fifo_enabled(true).unwrap();
    assert_eq!(interface.register(CFG_REG_ADDR) & 0b10, 0b10);

    driver.flush_fifo().unwrap();
    assert_eq!(interface.register(RESET_ADDR) & 0x80, 0x80);
}

#[test]
fn test_measurement_mode_and_ids() {
    let (mut driver, interface) = create_driver(Dps310Config::default());

    driver.set_measurement_mode(MeasurementMode::Idle).unwrap();
    assert_eq!(interface.register(MEAS_CFG_ADDR), READY_FLAGS);
    assert_eq!(driver.config().mode, MeasurementMode::Idle);

    assert_eq!(driver.product_id().unwrap(), 0);
    assert_eq!(driver.revision_id().unwrap(), 1);
}

#[test]
fn test_raw_sample_matches_result_registers() {
    let (mut driver, _interface) = create_driver(Dps310Config::default());
    let raw = driver.read_raw().unwrap();
    assert_eq!(raw.pressure, 524_288);
    assert_eq!(raw.temperature, 262_144);
}
