//! Canvas trait for the TFT panel
//!
//! The renderer only needs pixels, solid rectangles and short text labels.
//! Drivers translate these into panel-specific commands.

/// RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Self = Self(0x0000);
    pub const BLUE: Self = Self(0x001F);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const CYAN: Self = Self(0x07FF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const WHITE: Self = Self(0xFFFF);
    pub const LIGHT_GRAY: Self = Self(0xF7DE);
    pub const DARK_GRAY: Self = Self(0xB5B6);
    pub const LIGHT_RED: Self = Self(0xFC4E);
    pub const LIGHT_GREEN: Self = Self(0x77F0);
}

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanvasError {
    /// Bus transfer failed
    Bus,
    /// Coordinates outside the panel
    OutOfBounds,
}

/// Drawing surface
///
/// Coordinates are landscape pixels with the origin in the top-left corner.
pub trait Canvas {
    /// Set a single pixel
    fn draw_pixel(&mut self, x: u16, y: u16, color: Color) -> Result<(), CanvasError>;

    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color)
        -> Result<(), CanvasError>;

    /// Draw ASCII text with its top-left corner at `(x, y)`
    fn draw_text(&mut self, x: u16, y: u16, text: &str, color: Color) -> Result<(), CanvasError>;
}

/// Helpers for common UI shapes
pub trait CanvasExt: Canvas {
    /// Draw a horizontal line of `len` pixels
    fn hline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), CanvasError> {
        self.fill_rect(x, y, len, 1, color)
    }

    /// Draw a vertical line of `len` pixels
    fn vline(&mut self, x: u16, y: u16, len: u16, color: Color) -> Result<(), CanvasError> {
        self.fill_rect(x, y, 1, len, color)
    }

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) -> Result<(), CanvasError> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.hline(x, y, w, color)?;
        self.hline(x, y + h - 1, w, color)?;
        self.vline(x, y, h, color)?;
        self.vline(x + w - 1, y, h, color)
    }

    /// Draw a filled, outlined button with a roughly centered label
    fn draw_button(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        label: &str,
        fill: Color,
    ) -> Result<(), CanvasError> {
        self.fill_rect(x, y, w, h, fill)?;
        self.draw_rect(x, y, w, h, Color::BLACK)?;

        // 6x10 font
        let text_w = (label.len() as u16).saturating_mul(6);
        let tx = x + w.saturating_sub(text_w) / 2;
        let ty = y + h.saturating_sub(10) / 2;
        self.draw_text(tx, ty, label, Color::BLACK)
    }
}

impl<T: Canvas + ?Sized> CanvasExt for T {}
