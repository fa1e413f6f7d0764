//! ILI9341 TFT panel over SPI
//!
//! 240x320 RGB565 controller, driven here in landscape (320x240). Writes
//! go through a column/page address window followed by a memory write;
//! solid fills stream the same color for the whole window, so rectangles
//! cost one window setup regardless of size.
//!
//! The driver implements both the `embedded-graphics` [`DrawTarget`] and
//! the core [`Canvas`] trait. Text rendering goes through
//! `embedded-graphics` with the 6x10 mono font.
//!
//! # Usage
//!
//! ```ignore
//! let mut display = Ili9341::new(spi_device, dc_pin);
//! display.init(&mut delay)?;
//! display.fill_rect(0, 0, 320, 240, Color::WHITE)?;
//! ```

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use tremolo_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use tremolo_core::traits::{Canvas, CanvasError, Color};

mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// Row/column exchange with BGR order: landscape, origin top-left
const MADCTL_LANDSCAPE: u8 = 0x28;
/// 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// Pixels per SPI write when streaming a fill
const CHUNK_PIXELS: usize = 32;

/// Errors that can occur while talking to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// SPI transfer failed
    Spi,
    /// Data/command pin could not be driven
    Pin,
}

/// ILI9341 driver
pub struct Ili9341<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI: SpiDevice, DC: OutputPin> Ili9341<SPI, DC> {
    /// Create the driver; call [`init`](Self::init) before drawing
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Bring the panel out of reset into landscape RGB565 mode
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);
        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[MADCTL_LANDSCAPE])?;
        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(20);
        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(&[command]).map_err(|_| DisplayError::Spi)?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        if !params.is_empty() {
            self.spi.write(params).map_err(|_| DisplayError::Spi)?;
        }
        Ok(())
    }

    /// Address an inclusive window and start a memory write
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::PASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR, &[])
    }

    /// Fill a rectangle with a raw RGB565 value
    ///
    /// The rectangle must already be clipped to the panel.
    pub fn fill_area(&mut self, x: u16, y: u16, w: u16, h: u16, color: u16) -> Result<(), DisplayError> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_window(x, y, x + w - 1, y + h - 1)?;

        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        for px in chunk.chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }

        let mut remaining = w as usize * h as usize;
        while remaining > 0 {
            let n = remaining.min(CHUNK_PIXELS);
            self.spi.write(&chunk[..n * 2]).map_err(|_| DisplayError::Spi)?;
            remaining -= n;
        }
        Ok(())
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

fn in_bounds(x: u16, y: u16, w: u16, h: u16) -> bool {
    x as u32 + w as u32 <= SCREEN_WIDTH as u32 && y as u32 + h as u32 <= SCREEN_HEIGHT as u32
}

fn rgb565(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color.0))
}

impl<SPI, DC> OriginDimensions for Ili9341<SPI, DC> {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
    }
}

impl<SPI: SpiDevice, DC: OutputPin> DrawTarget for Ili9341<SPI, DC> {
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
                self.fill_area(x, y, 1, 1, color.into_storage())?;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }
        self.fill_area(
            area.top_left.x as u16,
            area.top_left.y as u16,
            area.size.width as u16,
            area.size.height as u16,
            color.into_storage(),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_area(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, color.into_storage())
    }
}

impl<SPI: SpiDevice, DC: OutputPin> Canvas for Ili9341<SPI, DC> {
    fn draw_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), CanvasError> {
        self.fill_rect(x, y, 1, 1, color)
    }

    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) -> Result<(), CanvasError> {
        if !in_bounds(x, y, w, h) {
            return Err(CanvasError::OutOfBounds);
        }
        self.fill_area(x, y, w, h, color.0)
            .map_err(|_| CanvasError::Bus)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Color) -> Result<(), CanvasError> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return Err(CanvasError::OutOfBounds);
        }
        let style = MonoTextStyle::new(&FONT_6X10, rgb565(color));
        Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top)
            .draw(self)
            .map(|_| ())
            .map_err(|_| CanvasError::Bus)
    }
}
