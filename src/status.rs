use crate::{error, i2c, regs, regs::Register, Ccs811};

/// Which firmware the sensor is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareMode {
    /// Boot loader. Only boot, status and firmware update commands work here.
    Boot,
    /// Measurement application.
    Application,
}

/// Decoded view of a single `STATUS` register read.
///
/// Built fresh on every read and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub firmware_mode: FirmwareMode,
    pub app_valid: bool,
    pub data_ready: bool,
    pub error: bool,
    /// Undecoded register byte, kept for diagnostics.
    pub raw: u8,
}

impl StatusSnapshot {
    /// Decodes a raw `STATUS` byte.
    ///
    /// # Example
    /// ```rust
    /// use ccs811_driver::{FirmwareMode, StatusSnapshot};
    /// let status = StatusSnapshot::from_raw(0x98);
    /// assert_eq!(status.firmware_mode, FirmwareMode::Application);
    /// assert!(status.app_valid);
    /// assert!(status.data_ready);
    /// assert!(!status.error);
    /// ```
    pub fn from_raw(raw: u8) -> Self {
        let firmware_mode = if raw & regs::status::FW_MODE != 0 {
            FirmwareMode::Application
        } else {
            FirmwareMode::Boot
        };

        StatusSnapshot {
            firmware_mode,
            app_valid: raw & regs::status::APP_VALID != 0,
            data_ready: raw & regs::status::DATA_READY != 0,
            error: raw & regs::status::ERROR != 0,
            raw,
        }
    }
}

/// Fault source reported by the `ERROR_ID` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// A write addressed an invalid register.
    BadWrite,
    /// A read addressed an invalid register.
    BadRead,
    /// An unsupported drive mode was written to `MEAS_MODE`.
    BadMode,
    /// The sensor resistance reached the top of its range.
    MaxResistance,
    /// Heater current out of range.
    HeaterFault,
    /// Heater voltage not applied correctly.
    HeaterSupplyFault,
    /// Any other value; the raw byte is kept.
    Unknown(u8),
}

impl ErrorCode {
    /// Classifies a raw `ERROR_ID` byte.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => ErrorCode::BadWrite,
            0x01 => ErrorCode::BadRead,
            0x02 => ErrorCode::BadMode,
            0x03 => ErrorCode::MaxResistance,
            0x04 => ErrorCode::HeaterFault,
            0x05 => ErrorCode::HeaterSupplyFault,
            other => ErrorCode::Unknown(other),
        }
    }

    /// Human readable reason for the fault.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::BadWrite => "a write occurred for an invalid register address",
            ErrorCode::BadRead => "a read occurred for an invalid register address",
            ErrorCode::BadMode => "the measurement drive mode is invalid",
            ErrorCode::MaxResistance => "the resistance is set too high",
            ErrorCode::HeaterFault => "the heater's current was not in range",
            ErrorCode::HeaterSupplyFault => "the heater's voltage is not being applied correctly",
            ErrorCode::Unknown(_) => "unknown error",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorCode::Unknown(raw) => write!(f, "{} (0x{:02X})", self.description(), raw),
            _ => f.write_str(self.description()),
        }
    }
}

impl<I2C, STATE, E> Ccs811<I2C, STATE>
where
    I2C: i2c::I2c<Error = E>,
{
    /// Reads and decodes the `STATUS` register.
    pub fn read_status(&mut self) -> error::Result<StatusSnapshot, E> {
        let raw = self.read_reg_byte(Register::Status)?;
        let status = StatusSnapshot::from_raw(raw);
        trace!("status: raw={=u8:#x}", raw);
        Ok(status)
    }

    /// Reads and classifies the `ERROR_ID` register.
    ///
    /// Only meaningful when the last status read had `error` set.
    pub fn read_error_id(&mut self) -> error::Result<ErrorCode, E> {
        let raw = self.read_reg_byte(Register::ErrorId)?;
        Ok(ErrorCode::from_raw(raw))
    }

    /// Turns a fault latched by the sensor into an error.
    ///
    /// Reads `STATUS`; if its error flag is set, reads `ERROR_ID` and returns
    /// [`error::Ccs811Error::SensorFault`]. Otherwise hands back the status
    /// that was read, so poll loops need a single register read per cycle.
    /// Call this after every state changing command.
    pub fn check_and_raise(&mut self) -> error::Result<StatusSnapshot, E> {
        let status = self.read_status()?;

        if status.error {
            let code = self.read_error_id()?;
            error!("sensor fault: {}", code);
            return Err(error::Ccs811Error::SensorFault(code));
        }

        Ok(status)
    }
}
