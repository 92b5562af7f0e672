use embedded_hal::delay::DelayNs;

use crate::{error, i2c, regs, regs::Register, Booted, Ccs811};

/// Lowest eCO2 value the algorithm reports, in ppm.
pub const ECO2_MIN: u16 = 400;
/// Highest eCO2 value the algorithm reports, in ppm.
pub const ECO2_MAX: u16 = 8192;
/// Highest TVOC value the algorithm reports, in ppb.
pub const TVOC_MAX: u16 = 1187;

/// One algorithm result read from `ALG_RESULT_DATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementSample {
    /// Equivalent CO2 in ppm.
    pub eco2: u16,
    /// Total volatile organic compounds in ppb.
    pub tvoc: u16,
}

impl MeasurementSample {
    /// Reassembles the two big-endian 16-bit values of the result block.
    ///
    /// # Example
    /// ```rust
    /// use ccs811_driver::MeasurementSample;
    /// let sample = MeasurementSample::from_bytes([0x02, 0x00, 0x00, 0x05]);
    /// assert_eq!(sample.eco2, 512);
    /// assert_eq!(sample.tvoc, 5);
    /// ```
    pub fn from_bytes(buffer: [u8; regs::ALG_RESULT_SIZE]) -> Self {
        MeasurementSample {
            eco2: u16::from_be_bytes([buffer[0], buffer[1]]),
            tvoc: u16::from_be_bytes([buffer[2], buffer[3]]),
        }
    }

    /// `true` if both values lie inside the range the algorithm can produce.
    ///
    /// Values outside of it point at a sensor or algorithm problem, not at a
    /// bus error, so the driver still returns such samples.
    pub fn is_plausible(&self) -> bool {
        (ECO2_MIN..=ECO2_MAX).contains(&self.eco2) && self.tvoc <= TVOC_MAX
    }
}

impl<I2C, E> Ccs811<I2C, Booted>
where
    I2C: i2c::I2c<Error = E>,
{
    /// Reads the latest algorithm result.
    ///
    /// Does not look at `STATUS`. Read it first and only call this when
    /// `data_ready` was set in that same read; the flag clears once the result
    /// has been consumed.
    pub fn read_measurement(&mut self) -> error::Result<MeasurementSample, E> {
        let mut buffer = [0u8; regs::ALG_RESULT_SIZE];
        self.read_into(Register::AlgResultData, &mut buffer)?;

        let sample = MeasurementSample::from_bytes(buffer);
        if !sample.is_plausible() {
            warn!(
                "implausible sample: eco2={=u16} ppm, tvoc={=u16} ppb",
                sample.eco2,
                sample.tvoc
            );
        }

        Ok(sample)
    }

    /// Polls `STATUS` until a new sample is ready, then reads it.
    ///
    /// Every poll cycle also checks the error flag, so a fault raised while
    /// waiting ends the wait with [`error::Ccs811Error::SensorFault`]. Gives up
    /// with [`error::Ccs811Error::Timeout`] once the configured timeout has
    /// been spent sleeping. A zero poll interval still counts 1 ms per poll,
    /// so the wait is always bounded.
    pub fn read_new_data(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> error::Result<MeasurementSample, E> {
        let mut waited_ms: u32 = 0;

        loop {
            if self.check_and_raise()?.data_ready {
                return self.read_measurement();
            }

            if waited_ms >= self.timeout.0 {
                return Err(error::Ccs811Error::Timeout);
            }

            trace!("waiting for data ready");
            delay.delay_ms(self.poll_interval.0);
            waited_ms = waited_ms.saturating_add(self.poll_interval.0.max(1));
        }
    }
}
