#![cfg_attr(not(test), no_std)]

//! # CCS811 Air Quality Sensor Driver
//!
//! A type-safe, `no_std` driver for the ams CCS811 digital gas sensor.
//! This driver uses the typestate pattern so the measurement API only
//! exists once the sensor application has been started.
//!
//! ## Features
//! - **Boot sequencing**: Starts the on-chip application from the boot loader,
//!   and is a no-op when the application already runs.
//! - **Fault reporting**: Sensor-latched faults surface as typed errors with
//!   the decoded `ERROR_ID` reason.
//! - **Mask-preserving mode writes**: Changing the drive mode keeps interrupt
//!   settings stored in the same register.
//! - **Typestate Pattern**: Prevents configuring or measuring before boot.
//!
//! ## Units
//! - **eCO2**: parts per million (ppm), 400 to 8192
//! - **TVOC**: parts per billion (ppb), 0 to 1187
//!
//! ## Usage
//! ```rust,no_run
//! use ccs811_driver::{Ccs811, Ccs811Builder, DriveMode, DEFAULT_ADDRESS};
//!
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();
//! let sensor = Ccs811::new(i2c, DEFAULT_ADDRESS);
//! let mut sensor = sensor.boot().unwrap();
//! sensor.check_and_raise().unwrap();
//!
//! let config = Ccs811Builder::new().drive_mode(DriveMode::Mode1Sec).build();
//! sensor.configure(&config).unwrap();
//!
//! let sample = sensor.read_new_data(&mut delay).unwrap();
//! println!("eCO2 {} ppm, TVOC {} ppb", sample.eco2, sample.tvoc);
//! ```

#[macro_use]
mod fmt;
mod measurement;
pub mod regs;
mod settings;
mod status;

use core::marker::PhantomData;
use embedded_hal::i2c;

pub use measurement::{MeasurementSample, ECO2_MAX, ECO2_MIN, TVOC_MAX};
pub use regs::{Register, ALTERNATE_ADDRESS, DEFAULT_ADDRESS};
pub use settings::{Ccs811Builder, Config, DriveMode, Milliseconds};
pub use status::{ErrorCode, FirmwareMode, StatusSnapshot};

// --- Typestates ---

/// Sensor has been created; its application may or may not be running yet.
pub struct Unbooted;
/// The boot command has been issued or the application was already running.
pub struct Booted;

/// Error types for the CCS811 driver.
pub mod error {
    use crate::{regs::Register, ErrorCode};

    /// Which half of a register transaction failed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum BusPhase {
        /// Writing the register selector before a read.
        Select,
        /// Reading the register contents.
        Read,
        /// Writing selector and payload in one transaction.
        Write,
    }

    /// Errors that can occur during communication or configuration.
    #[derive(Debug, Clone, Copy, PartialEq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Ccs811Error<E> {
        /// I2C bus error.
        I2CError {
            register: Register,
            phase: BusPhase,
            source: E,
        },
        /// The sensor latched a fault, decoded from `ERROR_ID`.
        SensorFault(ErrorCode),
        /// Boot refused: no valid application image is loaded.
        InvalidApp,
        /// `MEAS_MODE` holds one of the reserved drive mode values (5-7).
        InvalidDriveMode(u8),
        /// `HW_ID` does not identify a CCS811.
        UnexpectedHardwareId(u8),
        /// No new sample appeared within the configured timeout.
        Timeout,
    }

    impl<E: core::fmt::Debug> core::fmt::Display for Ccs811Error<E> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            match self {
                Ccs811Error::I2CError {
                    register,
                    phase,
                    source,
                } => {
                    let step = match phase {
                        BusPhase::Select => "select",
                        BusPhase::Read => "read",
                        BusPhase::Write => "write",
                    };
                    write!(
                        f,
                        "failed to {} {} register (0x{:02X}): {:?}",
                        step,
                        register.name(),
                        *register as u8,
                        source
                    )
                }
                Ccs811Error::SensorFault(code) => write!(f, "sensor fault: {}", code),
                Ccs811Error::InvalidApp => f.write_str("cannot boot, invalid app on device"),
                Ccs811Error::InvalidDriveMode(raw) => {
                    write!(f, "reserved drive mode {} in MEAS_MODE", raw)
                }
                Ccs811Error::UnexpectedHardwareId(id) => {
                    write!(f, "unexpected hardware id 0x{:02X}", id)
                }
                Ccs811Error::Timeout => f.write_str("timed out waiting for data ready"),
            }
        }
    }

    impl<E: core::fmt::Debug> core::error::Error for Ccs811Error<E> {}

    /// Result type alias for CCS811 operations.
    pub type Result<T, E> = core::result::Result<T, Ccs811Error<E>>;
}

/// The main CCS811 driver structure.
///
/// Use `Ccs811::new(...)` to start. The `STATE` generic uses the Typestate pattern
/// to track whether the sensor application has been booted.
#[derive(Debug)]
pub struct Ccs811<I2C, STATE> {
    i2c: I2C,
    address: u8,
    poll_interval: Milliseconds,
    timeout: Milliseconds,
    _state: PhantomData<STATE>,
}

impl<I2C, E> Ccs811<I2C, Unbooted>
where
    I2C: i2c::I2c<Error = E>,
{
    /// Creates a new driver instance in the `Unbooted` state.
    ///
    /// This does not communicate with the sensor yet.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus object.
    /// * `address` - The 7-bit I2C address of the sensor (`0x5A` or `0x5B`).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let defaults = Config::default();
        Ccs811 {
            i2c,
            address,
            poll_interval: defaults.poll_interval,
            timeout: defaults.timeout,
            _state: PhantomData,
        }
    }

    /// Starts the sensor application.
    ///
    /// - Application already running: returns at once without any write.
    /// - Boot loader with a valid image: sends `APP_START`.
    /// - Boot loader without a valid image: fails with
    ///   [`error::Ccs811Error::InvalidApp`]; only reflashing helps.
    ///
    /// Does not wait for the application to come up. Follow with
    /// [`Ccs811::check_and_raise`] before configuring the sensor.
    pub fn boot(mut self) -> error::Result<Ccs811<I2C, Booted>, E> {
        let status = self.read_status()?;

        if status.firmware_mode == FirmwareMode::Application {
            debug!("boot: application already running");
            return Ok(self.into_state());
        }

        if !status.app_valid {
            error!("boot: no valid application, status={=u8:#x}", status.raw);
            return Err(error::Ccs811Error::InvalidApp);
        }

        self.write_reg(Register::AppStart, None)?;
        debug!("boot: APP_START sent");

        Ok(self.into_state())
    }
}

impl<I2C, STATE, E> Ccs811<I2C, STATE>
where
    I2C: i2c::I2c<Error = E>,
{
    /// The 7-bit bus address this driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Reads `HW_ID` and checks that the device is a CCS811.
    pub fn read_hardware_id(&mut self) -> error::Result<u8, E> {
        let id = self.read_reg_byte(Register::HwId)?;
        if id != regs::HW_ID_CCS811 {
            return Err(error::Ccs811Error::UnexpectedHardwareId(id));
        }
        Ok(id)
    }

    /// Destroys the driver and hands the I2C bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn into_state<NEXT>(self) -> Ccs811<I2C, NEXT> {
        Ccs811 {
            i2c: self.i2c,
            address: self.address,
            poll_interval: self.poll_interval,
            timeout: self.timeout,
            _state: PhantomData,
        }
    }

    /// Selects `register`, then reads `buffer.len()` bytes from it.
    ///
    /// Two separate bus operations; a failure in either aborts the read and
    /// leaves `buffer` to be discarded by the caller.
    fn read_into(&mut self, register: Register, buffer: &mut [u8]) -> error::Result<(), E> {
        self.i2c
            .write(self.address, &[register as u8])
            .map_err(|e| error::Ccs811Error::I2CError {
                register,
                phase: error::BusPhase::Select,
                source: e,
            })?;

        self.i2c
            .read(self.address, buffer)
            .map_err(|e| error::Ccs811Error::I2CError {
                register,
                phase: error::BusPhase::Read,
                source: e,
            })?;

        trace!("read {=u8:#x}: {=[u8]:#x}", register as u8, &buffer[..]);
        Ok(())
    }

    /// Reads a single byte from a specific register.
    fn read_reg_byte(&mut self, register: Register) -> error::Result<u8, E> {
        let mut buffer = [0];
        self.read_into(register, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Writes the register selector, followed by `value` if any, in one transaction.
    fn write_reg(&mut self, register: Register, value: Option<u8>) -> error::Result<(), E> {
        let frame = [register as u8, value.unwrap_or_default()];
        let frame = match value {
            Some(_) => &frame[..],
            None => &frame[..1],
        };

        self.i2c
            .write(self.address, frame)
            .map_err(|e| error::Ccs811Error::I2CError {
                register,
                phase: error::BusPhase::Write,
                source: e,
            })?;

        trace!("write {=[u8]:#x}", frame);
        Ok(())
    }
}

impl<I2C, E> Ccs811<I2C, Booted>
where
    I2C: i2c::I2c<Error = E>,
{
    /// Applies a full driver configuration.
    ///
    /// Writes the drive mode, checks the sensor accepted it and stores the
    /// polling parameters used by `read_new_data`.
    pub fn configure(&mut self, config: &Config) -> error::Result<(), E> {
        self.write_mode(config.drive_mode)?;
        self.check_and_raise()?;

        self.poll_interval = config.poll_interval;
        self.timeout = config.timeout;

        Ok(())
    }

    /// Reads the drive mode currently set in `MEAS_MODE`.
    pub fn read_mode(&mut self) -> error::Result<DriveMode, E> {
        let register = self.read_reg_byte(Register::MeasMode)?;
        let bits =
            (register & regs::meas_mode::DRIVE_MODE) >> regs::meas_mode::DRIVE_MODE_SHIFT;

        DriveMode::from_bits(bits).ok_or(error::Ccs811Error::InvalidDriveMode(bits))
    }

    /// Sets the drive mode, keeping every other bit of `MEAS_MODE`.
    ///
    /// Read-modify-write: the register is read back first so interrupt
    /// settings survive the update.
    pub fn write_mode(&mut self, mode: DriveMode) -> error::Result<(), E> {
        let register = self.read_reg_byte(Register::MeasMode)?;
        let new_reg_val = mode.apply_to(register);

        self.write_reg(Register::MeasMode, Some(new_reg_val))?;
        debug!("drive mode set to {}", mode);

        Ok(())
    }
}
