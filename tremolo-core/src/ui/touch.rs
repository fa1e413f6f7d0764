//! Touch sample validation
//!
//! Raw readings outside the pressure band or the screen are noise and are
//! dropped here, so the state machine only ever sees real presses.

use crate::config::{TouchCalibration, MAX_PRESSURE, MIN_PRESSURE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::traits::RawTouch;

/// Validated touch position in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Column
    pub x: u16,
    /// Row
    pub y: u16,
}

impl TouchPoint {
    /// Create a touch point
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Check a pressure reading against the valid band
pub fn pressure_valid(pressure: u16) -> bool {
    (MIN_PRESSURE..=MAX_PRESSURE).contains(&pressure)
}

/// Convert a raw reading into a screen point
///
/// Returns `None` for touch noise.
pub fn to_screen(raw: RawTouch, calibration: &TouchCalibration) -> Option<TouchPoint> {
    if !pressure_valid(raw.pressure) {
        return None;
    }
    let (x, y) = calibration.map(raw.x, raw.y)?;
    if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
        return None;
    }
    Some(TouchPoint { x, y })
}
