use crate::regs;

/// Duration wrapper for type-safety. Stored in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Milliseconds(pub u32);

/// Measurement cadence, stored in bits 4..=6 of `MEAS_MODE`.
///
/// The sensor produces a new `ALG_RESULT_DATA` sample once per period and
/// raises the data-ready flag in `STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DriveMode {
    /// No measurements; lowest power. Reset value of `MEAS_MODE`.
    #[default]
    Idle = 0,
    /// Constant power mode, one sample per second.
    Mode1Sec = 1,
    /// Pulse heating mode, one sample every 10 seconds.
    Mode10Sec = 2,
    /// Low power pulse heating mode, one sample every 60 seconds.
    Mode60Sec = 3,
    /// Raw data only, every 250 ms. The algorithm result is not updated.
    Mode250msRaw = 4,
}

impl DriveMode {
    /// Maps the 3-bit field value (already shifted down) to a mode.
    ///
    /// Returns `None` for the reserved values 5 to 7.
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0 => Some(DriveMode::Idle),
            1 => Some(DriveMode::Mode1Sec),
            2 => Some(DriveMode::Mode10Sec),
            3 => Some(DriveMode::Mode60Sec),
            4 => Some(DriveMode::Mode250msRaw),
            _ => None,
        }
    }

    /// Returns `register` with its drive mode field replaced by `self`.
    ///
    /// Every bit outside the field (interrupt enables, reserved bits) is kept.
    ///
    /// # Example
    /// ```rust
    /// use ccs811_driver::DriveMode;
    /// assert_eq!(DriveMode::Mode1Sec.apply_to(0b0100_1100), 0b0001_1100);
    /// ```
    pub fn apply_to(self, register: u8) -> u8 {
        use regs::meas_mode::{DRIVE_MODE, DRIVE_MODE_SHIFT};

        let field = ((self as u8) << DRIVE_MODE_SHIFT) & DRIVE_MODE;
        (register & !DRIVE_MODE) | field
    }

    /// Time between two samples, `None` for `Idle`.
    pub fn sample_period(self) -> Option<Milliseconds> {
        match self {
            DriveMode::Idle => None,
            DriveMode::Mode1Sec => Some(Milliseconds(1_000)),
            DriveMode::Mode10Sec => Some(Milliseconds(10_000)),
            DriveMode::Mode60Sec => Some(Milliseconds(60_000)),
            DriveMode::Mode250msRaw => Some(Milliseconds(250)),
        }
    }
}

/// Complete driver configuration used for setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Drive mode written to `MEAS_MODE` by `configure`.
    pub drive_mode: DriveMode,
    /// Pause between two status polls in `read_new_data`.
    pub poll_interval: Milliseconds,
    /// Upper bound on the time `read_new_data` waits for data ready.
    pub timeout: Milliseconds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drive_mode: DriveMode::Mode1Sec,
            poll_interval: Milliseconds(500),
            timeout: Milliseconds(5_000),
        }
    }
}

/// Fluent builder for a [`Config`].
#[derive(Default)]
pub struct Ccs811Builder {
    config: Config,
}

impl Ccs811Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampling cadence.
    pub fn drive_mode(mut self, mode: DriveMode) -> Self {
        self.config.drive_mode = mode;
        self
    }

    /// Sets the pause between status polls.
    pub fn poll_interval(mut self, interval: Milliseconds) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Sets how long `read_new_data` waits before giving up.
    pub fn timeout(mut self, timeout: Milliseconds) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Finalizes the builder and returns the `Config`.
    pub fn build(self) -> Config {
        self.config
    }
}
