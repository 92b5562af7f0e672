//! Example: Air quality monitoring with the CCS811 on an STM32F407.
//!
//! This example demonstrates:
//! 1. **Initialization**: Setting up I2C and the CCS811 driver.
//! 2. **Boot**: Starting the sensor application and checking for faults.
//! 3. **Configuration**: Selecting the 1 second drive mode.
//! 4. **Measurement Loop**: Waiting for data ready and logging eCO2 / TVOC.

#![no_main]
#![no_std]
#![deny(unsafe_code)]

// The driver logs through defmt when its `defmt` feature is on.
use ccs811_driver::*;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4xx_hal::{self as hal, prelude::*};

#[cortex_m_rt::entry]
fn main() -> ! {
    // --- 1. Hardware Setup ---
    let dp = hal::pac::Peripherals::take().unwrap();
    let clock_cfg = hal::rcc::Config::default().sysclk(168.MHz());
    let mut rcc = dp.RCC.freeze(clock_cfg);

    // Setup I2C1 (SCL on PB6, SDA on PB7)
    let gpiob = dp.GPIOB.split(&mut rcc);
    let scl = gpiob.pb6.into_open_drain_output();
    let sda = gpiob.pb7.into_open_drain_output();

    let i2c = hal::i2c::I2c1::new(
        dp.I2C1,
        (scl, sda),
        hal::i2c::Mode::Standard {
            frequency: 100.kHz().into(),
        },
        &mut rcc,
    );

    // Delay provider (TIM6) for the status poll cadence
    let mut delay = dp.TIM6.delay_us(&mut rcc);

    // --- 2. Boot ---
    // ADDR pin tied low
    let ccs811 = Ccs811::new(i2c, DEFAULT_ADDRESS);

    defmt::println!("air: booting");
    let mut ccs811 = ccs811.boot().expect("air: boot failed");
    // The sensor needs a moment to leave the boot loader
    delay.delay_ms(20);
    ccs811.check_and_raise().expect("air: fault after boot");
    defmt::println!("air: booted");

    // --- 3. Configuration ---
    let config = Ccs811Builder::new()
        .drive_mode(DriveMode::Mode1Sec)
        .poll_interval(Milliseconds(500))
        .timeout(Milliseconds(5_000))
        .build();

    defmt::println!("air: setting measurement mode");
    ccs811
        .configure(&config)
        .expect("air: failed to set measurement mode");
    defmt::println!("air: set measurement mode");

    // --- 4. Measurement Loop ---
    loop {
        // Polls STATUS every 500 ms, checking for faults on each cycle
        match ccs811.read_new_data(&mut delay) {
            Ok(sample) => {
                defmt::println!("air: eco2={} ppm tvoc={} ppb", sample.eco2, sample.tvoc);
            }
            Err(error::Ccs811Error::Timeout) => {
                defmt::println!("air: no data yet");
            }
            Err(e) => defmt::panic!("air: {}", defmt::Debug2Format(&e)),
        }
    }
}
