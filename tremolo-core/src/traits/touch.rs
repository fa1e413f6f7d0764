//! Touch panel trait

/// Raw touch reading as reported by the controller
///
/// Coordinates are uncalibrated ADC values; `pressure` is 0 when nothing
/// touches the panel and grows with the applied force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouch {
    /// Raw X reading
    pub x: u16,
    /// Raw Y reading
    pub y: u16,
    /// Pressure estimate
    pub pressure: u16,
}

/// Errors that can occur while reading the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Bus transfer failed
    Bus,
}

/// Touch input source
pub trait TouchPanel {
    /// Sample the panel once
    ///
    /// Must return quickly; it is called on every loop iteration.
    fn read_touch_point(&mut self) -> Result<RawTouch, TouchError>;
}
