//! Board wiring
//!
//! Raspberry Pi Pico with a 2.8" ILI9341/XPT2046 SPI module and a
//! two-input H-bridge (DRV8833 style) driving the ERM motor.
//!
//! | Function          | Pin    |
//! |-------------------|--------|
//! | Display SCK       | GPIO18 |
//! | Display MOSI      | GPIO19 |
//! | Display MISO      | GPIO16 |
//! | Display CS        | GPIO17 |
//! | Display D/C       | GPIO20 |
//! | Display RESET     | GPIO21 |
//! | Touch SCK         | GPIO10 |
//! | Touch MOSI        | GPIO11 |
//! | Touch MISO        | GPIO12 |
//! | Touch CS          | GPIO13 |
//! | Motor forward     | GPIO14 |
//! | Motor backward    | GPIO15 |

use core::convert::Infallible;

use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::Peripherals;
use embassy_time::Delay;
use embedded_hal::delay::DelayNs;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

use tremolo_drivers::actuator::ErmDrive;
use tremolo_drivers::display::{DisplayError, Ili9341};
use tremolo_drivers::touch::Xpt2046;

/// Display SPI clock; the panel accepts writes well above this
const DISPLAY_SPI_HZ: u32 = 32_000_000;
/// The XPT2046 conversion clock tops out near 2.5 MHz
const TOUCH_SPI_HZ: u32 = 2_000_000;

pub type Display = Ili9341<ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>, Output<'static>>;
pub type Touch = Xpt2046<ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, NoDelay>>;
pub type Motor = ErmDrive<Output<'static>, Output<'static>>;

/// Peripherals used by the firmware
pub struct Board {
    pub display: Display,
    pub touch: Touch,
    pub motor: Motor,
    display_reset: Output<'static>,
}

impl Board {
    /// Claim pins and buses; the motor starts released
    pub fn new(p: Peripherals) -> Self {
        let mut display_config = spi::Config::default();
        display_config.frequency = DISPLAY_SPI_HZ;
        let display_bus = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, display_config);
        let display_cs = Output::new(p.PIN_17, Level::High);
        let display_dc = Output::new(p.PIN_20, Level::Low);
        let display_reset = Output::new(p.PIN_21, Level::High);
        let display_dev = infallible(ExclusiveDevice::new_no_delay(display_bus, display_cs));

        let mut touch_config = spi::Config::default();
        touch_config.frequency = TOUCH_SPI_HZ;
        let touch_bus = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, touch_config);
        let touch_cs = Output::new(p.PIN_13, Level::High);
        let touch_dev = infallible(ExclusiveDevice::new_no_delay(touch_bus, touch_cs));

        let forward = Output::new(p.PIN_14, Level::Low);
        let backward = Output::new(p.PIN_15, Level::Low);

        Self {
            display: Ili9341::new(display_dev, display_dc),
            touch: Xpt2046::new(touch_dev),
            motor: ErmDrive::new(forward, backward),
            display_reset,
        }
    }

    /// Hardware-reset the panel and run its init sequence
    pub fn init_display(&mut self) -> Result<(), DisplayError> {
        let mut delay = Delay;
        self.display_reset.set_low();
        delay.delay_ms(10);
        self.display_reset.set_high();
        delay.delay_ms(120);
        self.display.init(&mut delay)
    }
}

/// Unwrap a result whose error type cannot exist
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
