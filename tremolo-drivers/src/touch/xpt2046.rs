//! XPT2046 resistive touch controller
//!
//! 12-bit differential conversions over SPI. Each conversion is one
//! 3-byte transfer: the control byte goes out first, and the result comes
//! back MSB-first in the following two bytes, left-aligned after one busy
//! bit.
//!
//! Pressure is estimated from the two Z conversions; it reads near zero
//! with nothing on the panel and grows with the applied force.

use embedded_hal::spi::SpiDevice;
use tremolo_core::traits::{RawTouch, TouchError, TouchPanel};

/// Control bytes (start bit, channel, 12-bit, differential, power-down between conversions)
const CMD_X: u8 = 0xD0;
const CMD_Y: u8 = 0x90;
const CMD_Z1: u8 = 0xB0;
const CMD_Z2: u8 = 0xC0;

const ADC_MAX: u32 = 4095;

/// XPT2046 driver
pub struct Xpt2046<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Xpt2046<SPI> {
    /// Create the driver on an SPI device (chip select owned by the device)
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Run one conversion
    fn read_channel(&mut self, command: u8) -> Result<u16, SPI::Error> {
        let mut buf = [command, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;
        let raw = (((buf[1] as u16) << 8) | buf[2] as u16) >> 3;
        Ok(raw & ADC_MAX as u16)
    }

    /// Pressure estimate from the Z conversions
    fn pressure(z1: u16, z2: u16) -> u16 {
        if z1 == 0 {
            return 0;
        }
        let p = (z1 as u32 + ADC_MAX).saturating_sub(z2 as u32) / 4;
        p.min(u16::MAX as u32) as u16
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> TouchPanel for Xpt2046<SPI> {
    fn read_touch_point(&mut self) -> Result<RawTouch, TouchError> {
        let z1 = self.read_channel(CMD_Z1).map_err(|_| TouchError::Bus)?;
        let z2 = self.read_channel(CMD_Z2).map_err(|_| TouchError::Bus)?;
        let x = self.read_channel(CMD_X).map_err(|_| TouchError::Bus)?;
        let y = self.read_channel(CMD_Y).map_err(|_| TouchError::Bus)?;

        Ok(RawTouch {
            x,
            y,
            pressure: Self::pressure(z1, z2),
        })
    }
}
