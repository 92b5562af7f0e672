use ccs811_driver::error::{BusPhase, Ccs811Error};
use ccs811_driver::{
    Booted, Ccs811, Ccs811Builder, DriveMode, ErrorCode, FirmwareMode, MeasurementSample,
    Milliseconds, Register, DEFAULT_ADDRESS,
};
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

const ADDR: u8 = DEFAULT_ADDRESS;

/// STATUS with the application running and a valid image.
const STATUS_APP: u8 = 0b1001_0000;
/// Same as `STATUS_APP` plus data ready.
const STATUS_APP_READY: u8 = 0b1001_1000;
/// Boot loader with a valid image waiting to be started.
const STATUS_BOOT_VALID: u8 = 0b0001_0000;

fn status_read(raw: u8) -> [Transaction; 2] {
    [
        Transaction::write(ADDR, vec![0x00]),
        Transaction::read(ADDR, vec![raw]),
    ]
}

/// Boots a driver whose sensor already runs its application, then queues
/// `expectations` behind the boot status read.
fn booted(expectations: &[Transaction]) -> (Ccs811<I2cMock, Booted>, I2cMock) {
    let mut all = status_read(STATUS_APP).to_vec();
    all.extend_from_slice(expectations);

    let i2c = I2cMock::new(&all);
    let sensor = Ccs811::new(i2c.clone(), ADDR).boot().unwrap();
    (sensor, i2c)
}

#[test]
fn boot_is_a_no_op_when_application_runs() {
    let mut i2c = I2cMock::new(&status_read(STATUS_APP));

    let sensor = Ccs811::new(i2c.clone(), ADDR);
    let sensor = sensor.boot().unwrap();
    assert_eq!(sensor.address(), ADDR);

    // Only the status select went out, no APP_START.
    i2c.done();
}

#[test]
fn boot_sends_app_start_from_boot_loader() {
    let mut expectations = status_read(STATUS_BOOT_VALID).to_vec();
    expectations.push(Transaction::write(ADDR, vec![0xF4]));
    expectations.extend_from_slice(&status_read(STATUS_APP));
    let mut i2c = I2cMock::new(&expectations);

    let mut sensor = Ccs811::new(i2c.clone(), ADDR).boot().unwrap();
    let status = sensor.check_and_raise().unwrap();
    assert_eq!(status.firmware_mode, FirmwareMode::Application);

    i2c.done();
}

#[test]
fn boot_refuses_invalid_application() {
    let mut i2c = I2cMock::new(&status_read(0b0000_0000));

    let result = Ccs811::new(i2c.clone(), ADDR).boot();
    assert!(matches!(result, Err(Ccs811Error::InvalidApp)));

    // No APP_START write was attempted.
    i2c.done();
}

#[test]
fn boot_aborts_on_select_failure() {
    let expectations = [Transaction::write(ADDR, vec![0x00]).with_error(ErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);

    let result = Ccs811::new(i2c.clone(), ADDR).boot();
    assert!(matches!(
        result,
        Err(Ccs811Error::I2CError {
            register: Register::Status,
            phase: BusPhase::Select,
            source: ErrorKind::Other,
        })
    ));

    i2c.done();
}

#[test]
fn boot_reports_failed_app_start_write() {
    let mut expectations = status_read(STATUS_BOOT_VALID).to_vec();
    expectations.push(Transaction::write(ADDR, vec![0xF4]).with_error(ErrorKind::Other));
    let mut i2c = I2cMock::new(&expectations);

    let result = Ccs811::new(i2c.clone(), ADDR).boot();
    assert!(matches!(
        result,
        Err(Ccs811Error::I2CError {
            register: Register::AppStart,
            phase: BusPhase::Write,
            ..
        })
    ));

    i2c.done();
}

#[test]
fn check_and_raise_reports_sensor_fault() {
    let mut expectations = status_read(0b1001_0001).to_vec();
    expectations.push(Transaction::write(ADDR, vec![0xE0]));
    expectations.push(Transaction::read(ADDR, vec![0x04]));
    let (mut sensor, mut i2c) = booted(&expectations);

    let err = sensor.check_and_raise().unwrap_err();
    assert_eq!(err, Ccs811Error::SensorFault(ErrorCode::HeaterFault));
    assert_eq!(
        err.to_string(),
        "sensor fault: the heater's current was not in range"
    );

    i2c.done();
}

#[test]
fn check_and_raise_passes_status_through() {
    let (mut sensor, mut i2c) = booted(&status_read(STATUS_APP_READY));

    let status = sensor.check_and_raise().unwrap();
    assert!(status.data_ready);
    assert!(!status.error);
    assert_eq!(status.raw, STATUS_APP_READY);

    i2c.done();
}

#[test]
fn unknown_error_id_is_still_a_fault() {
    let mut expectations = status_read(0b1001_0001).to_vec();
    expectations.push(Transaction::write(ADDR, vec![0xE0]));
    expectations.push(Transaction::read(ADDR, vec![0xFF]));
    let (mut sensor, mut i2c) = booted(&expectations);

    assert_eq!(
        sensor.check_and_raise(),
        Err(Ccs811Error::SensorFault(ErrorCode::Unknown(0xFF)))
    );

    i2c.done();
}

#[test]
fn write_mode_preserves_other_bits() {
    // (register before, mode, register written)
    let cases = [
        (0b0000_0000, DriveMode::Mode1Sec, 0b0001_0000),
        (0b0000_1100, DriveMode::Mode1Sec, 0b0001_1100),
        (0b1011_1111, DriveMode::Idle, 0b1000_1111),
        (0b0100_0100, DriveMode::Mode60Sec, 0b0011_0100),
        (0b1111_1111, DriveMode::Mode250msRaw, 0b1100_1111),
    ];

    for (before, mode, written) in cases {
        let expectations = [
            Transaction::write(ADDR, vec![0x01]),
            Transaction::read(ADDR, vec![before]),
            Transaction::write(ADDR, vec![0x01, written]),
        ];
        let (mut sensor, mut i2c) = booted(&expectations);

        sensor.write_mode(mode).unwrap();

        i2c.done();
    }
}

#[test]
fn write_mode_stops_after_failed_read() {
    let expectations = [
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0x00]).with_error(ErrorKind::Other),
    ];
    let (mut sensor, mut i2c) = booted(&expectations);

    let err = sensor.write_mode(DriveMode::Mode1Sec).unwrap_err();
    assert!(matches!(
        err,
        Ccs811Error::I2CError {
            register: Register::MeasMode,
            phase: BusPhase::Read,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "failed to read MEAS_MODE register (0x01): Other"
    );

    // Nothing was written back.
    i2c.done();
}

#[test]
fn read_mode_decodes_field() {
    let expectations = [
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0b0010_1000]),
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0b0111_0000]),
    ];
    let (mut sensor, mut i2c) = booted(&expectations);

    assert_eq!(sensor.read_mode().unwrap(), DriveMode::Mode10Sec);
    assert_eq!(sensor.read_mode(), Err(Ccs811Error::InvalidDriveMode(7)));

    i2c.done();
}

#[test]
fn configure_writes_mode_and_checks_for_faults() {
    let mut expectations = vec![
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0x00]),
        Transaction::write(ADDR, vec![0x01, 0x30]),
    ];
    expectations.extend_from_slice(&status_read(STATUS_APP));
    let (mut sensor, mut i2c) = booted(&expectations);

    let config = Ccs811Builder::new().drive_mode(DriveMode::Mode60Sec).build();
    sensor.configure(&config).unwrap();

    i2c.done();
}

#[test]
fn configure_surfaces_bad_mode_fault() {
    let mut expectations = vec![
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0x00]),
        Transaction::write(ADDR, vec![0x01, 0x10]),
    ];
    expectations.extend_from_slice(&status_read(0b1001_0001));
    expectations.push(Transaction::write(ADDR, vec![0xE0]));
    expectations.push(Transaction::read(ADDR, vec![0x02]));
    let (mut sensor, mut i2c) = booted(&expectations);

    assert_eq!(
        sensor.configure(&Ccs811Builder::new().build()),
        Err(Ccs811Error::SensorFault(ErrorCode::BadMode))
    );

    i2c.done();
}

#[test]
fn read_measurement_decodes_result_block() {
    let expectations = [
        Transaction::write(ADDR, vec![0x02]),
        Transaction::read(ADDR, vec![0x02, 0x00, 0x00, 0x05]),
    ];
    let (mut sensor, mut i2c) = booted(&expectations);

    assert_eq!(
        sensor.read_measurement().unwrap(),
        MeasurementSample { eco2: 512, tvoc: 5 }
    );

    i2c.done();
}

#[test]
fn read_measurement_returns_implausible_samples() {
    let expectations = [
        Transaction::write(ADDR, vec![0x02]),
        Transaction::read(ADDR, vec![0x00, 0x00, 0x00, 0x00]),
    ];
    let (mut sensor, mut i2c) = booted(&expectations);

    let sample = sensor.read_measurement().unwrap();
    assert_eq!(sample, MeasurementSample { eco2: 0, tvoc: 0 });
    assert!(!sample.is_plausible());

    i2c.done();
}

#[test]
fn read_measurement_aborts_on_data_phase_failure() {
    let expectations = [
        Transaction::write(ADDR, vec![0x02]),
        Transaction::read(ADDR, vec![0x02, 0x00, 0x00, 0x05]).with_error(ErrorKind::Other),
    ];
    let (mut sensor, mut i2c) = booted(&expectations);

    assert_eq!(
        sensor.read_measurement(),
        Err(Ccs811Error::I2CError {
            register: Register::AlgResultData,
            phase: BusPhase::Read,
            source: ErrorKind::Other,
        })
    );

    i2c.done();
}

#[test]
fn read_new_data_polls_until_ready() {
    let mut expectations = status_read(STATUS_APP).to_vec();
    expectations.extend_from_slice(&status_read(STATUS_APP));
    expectations.extend_from_slice(&status_read(STATUS_APP_READY));
    expectations.push(Transaction::write(ADDR, vec![0x02]));
    expectations.push(Transaction::read(ADDR, vec![0x01, 0xF4, 0x00, 0x0A]));
    let (mut sensor, mut i2c) = booted(&expectations);

    let sample = sensor.read_new_data(&mut NoopDelay::new()).unwrap();
    assert_eq!(sample, MeasurementSample { eco2: 500, tvoc: 10 });

    i2c.done();
}

#[test]
fn read_new_data_times_out() {
    let mut expectations = vec![
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0x10]),
        Transaction::write(ADDR, vec![0x01, 0x10]),
    ];
    expectations.extend_from_slice(&status_read(STATUS_APP));
    // Polls at 0 ms, 500 ms and 1000 ms, then gives up.
    for _ in 0..3 {
        expectations.extend_from_slice(&status_read(STATUS_APP));
    }
    let (mut sensor, mut i2c) = booted(&expectations);

    let config = Ccs811Builder::new()
        .poll_interval(Milliseconds(500))
        .timeout(Milliseconds(1_000))
        .build();
    sensor.configure(&config).unwrap();

    assert_eq!(
        sensor.read_new_data(&mut NoopDelay::new()),
        Err(Ccs811Error::Timeout)
    );

    i2c.done();
}

#[test]
fn read_new_data_times_out_with_zero_poll_interval() {
    let mut expectations = vec![
        Transaction::write(ADDR, vec![0x01]),
        Transaction::read(ADDR, vec![0x10]),
        Transaction::write(ADDR, vec![0x01, 0x10]),
    ];
    expectations.extend_from_slice(&status_read(STATUS_APP));
    // Each poll counts as 1 ms: polls at 0, 1, 2 and 3 ms, then gives up.
    for _ in 0..4 {
        expectations.extend_from_slice(&status_read(STATUS_APP));
    }
    let (mut sensor, mut i2c) = booted(&expectations);

    let config = Ccs811Builder::new()
        .poll_interval(Milliseconds(0))
        .timeout(Milliseconds(3))
        .build();
    sensor.configure(&config).unwrap();

    assert_eq!(
        sensor.read_new_data(&mut NoopDelay::new()),
        Err(Ccs811Error::Timeout)
    );

    i2c.done();
}

#[test]
fn read_new_data_stops_on_fault_while_waiting() {
    let mut expectations = status_read(STATUS_APP).to_vec();
    expectations.extend_from_slice(&status_read(0b1001_0001));
    expectations.push(Transaction::write(ADDR, vec![0xE0]));
    expectations.push(Transaction::read(ADDR, vec![0x05]));
    let (mut sensor, mut i2c) = booted(&expectations);

    assert_eq!(
        sensor.read_new_data(&mut NoopDelay::new()),
        Err(Ccs811Error::SensorFault(ErrorCode::HeaterSupplyFault))
    );

    i2c.done();
}

#[test]
fn hardware_id_is_checked() {
    let expectations = [
        Transaction::write(ADDR, vec![0x20]),
        Transaction::read(ADDR, vec![0x81]),
        Transaction::write(ADDR, vec![0x20]),
        Transaction::read(ADDR, vec![0x55]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let mut sensor = Ccs811::new(i2c.clone(), ADDR);

    assert_eq!(sensor.read_hardware_id(), Ok(0x81));
    assert_eq!(
        sensor.read_hardware_id(),
        Err(Ccs811Error::UnexpectedHardwareId(0x55))
    );

    i2c.done();
}

#[test]
fn release_returns_the_bus() {
    let (sensor, _) = booted(&[]);

    let mut i2c = sensor.release();
    i2c.done();
}
