//! Configuration type definitions
//!
//! Screen geometry and touch calibration. Defaults match the 2.8" 320x240
//! panel with a 4-wire resistive overlay that the firmware ships for.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::limits::{DRAWN_LEFT_BOUND, PROFILE_LEN, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left column
    pub x: u16,
    /// Top row
    pub y: u16,
    /// Width in pixels
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Last column inside the rectangle
    pub const fn right(&self) -> u16 {
        self.x + self.w.saturating_sub(1)
    }

    /// Last row inside the rectangle
    pub const fn bottom(&self) -> u16 {
        self.y + self.h.saturating_sub(1)
    }

    /// Check whether a point lies inside (edges inclusive)
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.w > 0 && self.h > 0 && x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Placement of every touch target on the landscape screen
///
/// The left third holds the two sliders and the three buttons, the rest is
/// the drawing area with one column per profile sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// Drawing area (columns map 1:1 to profile samples)
    pub draw_area: Rect,
    /// Frequency slider track
    pub left_bar: Rect,
    /// Intensity slider track
    pub right_bar: Rect,
    /// Start/stop button
    pub start_stop: Rect,
    /// Save button
    pub save: Rect,
    /// Delete button
    pub delete: Rect,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            draw_area: Rect::new(DRAWN_LEFT_BOUND, 1, PROFILE_LEN as u16, SCREEN_HEIGHT - 2),
            left_bar: Rect::new(12, 24, 28, 128),
            right_bar: Rect::new(62, 24, 28, 128),
            start_stop: Rect::new(6, 162, 94, 34),
            save: Rect::new(6, 202, 44, 32),
            delete: Rect::new(56, 202, 44, 32),
        }
    }
}

/// Resistive touch calibration
///
/// Maps raw 12-bit controller readings onto screen pixels. The panel is
/// mounted in portrait, so landscape use swaps the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchCalibration {
    /// Raw X reading at the left edge of the panel
    pub raw_x_min: u16,
    /// Raw X reading at the right edge of the panel
    pub raw_x_max: u16,
    /// Raw Y reading at the top edge of the panel
    pub raw_y_min: u16,
    /// Raw Y reading at the bottom edge of the panel
    pub raw_y_max: u16,
    /// Use raw Y as screen X (landscape mounting)
    pub swap_xy: bool,
    /// Mirror the screen X axis
    pub invert_x: bool,
    /// Mirror the screen Y axis
    pub invert_y: bool,
}

/// Usable window of the 2.8" XPT2046 panel, in full 12-bit counts
impl Default for TouchCalibration {
    fn default() -> Self {
        Self {
            raw_x_min: 480,
            raw_x_max: 3600,
            raw_y_min: 280,
            raw_y_max: 3680,
            swap_xy: true,
            invert_x: false,
            invert_y: true,
        }
    }
}

impl TouchCalibration {
    /// Map a raw reading to screen coordinates
    ///
    /// Returns `None` when the reading falls outside the calibrated window.
    pub fn map(&self, raw_x: u16, raw_y: u16) -> Option<(u16, u16)> {
        let (sx, sx_min, sx_max, sy, sy_min, sy_max) = if self.swap_xy {
            (raw_y, self.raw_y_min, self.raw_y_max, raw_x, self.raw_x_min, self.raw_x_max)
        } else {
            (raw_x, self.raw_x_min, self.raw_x_max, raw_y, self.raw_y_min, self.raw_y_max)
        };

        let x = scale(sx, sx_min, sx_max, SCREEN_WIDTH)?;
        let y = scale(sy, sy_min, sy_max, SCREEN_HEIGHT)?;

        let x = if self.invert_x { SCREEN_WIDTH - 1 - x } else { x };
        let y = if self.invert_y { SCREEN_HEIGHT - 1 - y } else { y };

        Some((x, y))
    }
}

/// Linear map of `raw` in `[min, max]` onto `[0, size)`
fn scale(raw: u16, min: u16, max: u16, size: u16) -> Option<u16> {
    if max <= min || raw < min || raw > max {
        return None;
    }
    let span = (max - min) as u32;
    let scaled = (raw - min) as u32 * (size as u32 - 1) / span;
    Some(scaled as u16)
}
