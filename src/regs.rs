//! CCS811 register map and bit-field masks.
//!
//! All masks for a register live next to its address so that decode and
//! encode code never carries bare numbers.

/// Default 7-bit I2C address (ADDR pin low).
pub const DEFAULT_ADDRESS: u8 = 0x5A;
/// Alternate 7-bit I2C address (ADDR pin high).
pub const ALTERNATE_ADDRESS: u8 = 0x5B;

/// Registers the driver talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Status (R, 1 byte).
    Status = 0x00,
    /// Measurement and interrupt mode (R/W, 1 byte).
    MeasMode = 0x01,
    /// Algorithm result: eCO2 and TVOC (R, 4 bytes).
    AlgResultData = 0x02,
    /// Hardware ID (R, 1 byte).
    HwId = 0x20,
    /// Error source when `Status` reports an error (R, 1 byte).
    ErrorId = 0xE0,
    /// Boot loader command that starts the application (W, no payload).
    AppStart = 0xF4,
}

impl Register {
    /// Datasheet name of the register.
    pub fn name(self) -> &'static str {
        match self {
            Register::Status => "STATUS",
            Register::MeasMode => "MEAS_MODE",
            Register::AlgResultData => "ALG_RESULT_DATA",
            Register::HwId => "HW_ID",
            Register::ErrorId => "ERROR_ID",
            Register::AppStart => "APP_START",
        }
    }
}

/// Bits of the `STATUS` register.
pub mod status {
    /// 0 = boot loader, 1 = application.
    pub const FW_MODE: u8 = 0b1000_0000;
    /// A valid application image is loaded. Bit 4 only.
    pub const APP_VALID: u8 = 0b0001_0000;
    /// A new sample is waiting in `ALG_RESULT_DATA`.
    pub const DATA_READY: u8 = 0b0000_1000;
    /// The sensor recorded an error, see `ERROR_ID`.
    pub const ERROR: u8 = 0b0000_0001;
}

/// Bits of the `MEAS_MODE` register.
pub mod meas_mode {
    /// Drive mode field, bits 4..=6.
    pub const DRIVE_MODE: u8 = 0b0111_0000;
    pub const DRIVE_MODE_SHIFT: u8 = 4;
}

/// Size of the `ALG_RESULT_DATA` block the driver reads.
pub const ALG_RESULT_SIZE: usize = 4;

/// Value of `HW_ID` for every CCS811.
pub const HW_ID_CCS811: u8 = 0x81;
