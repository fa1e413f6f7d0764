//! Compile-time limits
//!
//! Voltage, timing, backstop and debounce constants shared by the engine,
//! the PWM controller and the UI. All times are in milliseconds.

/// Smallest allowed profile peak voltage
///
/// This bounds the *maximum* voltage of a profile. Individual steps may
/// still be 0 V or negative (backstop pulses).
pub const MIN_VOLT: f32 = 5.0;

/// Absolute maximum output voltage of the drive circuit
pub const MAX_VOLT: f32 = 9.0;

/// Shortest hold time of a single profile sample
pub const MIN_TIME_MS: u16 = 10;

/// Longest hold time of a single profile sample
pub const MAX_TIME_MS: u16 = 100;

/// Length of one PWM cycle (empirically determined for the ERM motor)
pub const ON_TIME_MS: u32 = 35;

/// Backstop trigger fraction and pulse amplitude
///
/// A sample more than 60% above the previous one is followed by a pulse
/// of `BACKSTOP_VOLTAGE * max_voltage` volts.
pub const BACKSTOP_VOLTAGE: f32 = -0.6;

/// Hold time of a backstop pulse
pub const BACKSTOPPING_TIME_MS: u16 = 7;

/// Hold time for a button press to count
pub const BUTTON_TIME_MS: u32 = 200;

/// Hold time for a slider press to count
pub const SLIDER_TIME_MS: u32 = 25;

/// Lower bound of a valid touch pressure reading
pub const MIN_PRESSURE: u16 = 10;

/// Upper bound of a valid touch pressure reading
pub const MAX_PRESSURE: u16 = 1000;

/// Screen width in landscape orientation (pixels)
pub const SCREEN_WIDTH: u16 = 320;

/// Screen height in landscape orientation (pixels)
pub const SCREEN_HEIGHT: u16 = 240;

/// First drawable column
pub const DRAWN_LEFT_BOUND: u16 = SCREEN_WIDTH / 3 + 1;

/// Last drawable column
pub const DRAWN_RIGHT_BOUND: u16 = SCREEN_WIDTH - 2;

/// Number of drawable columns, one profile sample each
pub const PROFILE_LEN: usize = (DRAWN_RIGHT_BOUND - DRAWN_LEFT_BOUND + 1) as usize;

/// Capacity of a force sequence (every sample may be preceded by a backstop)
pub const SEQUENCE_CAPACITY: usize = PROFILE_LEN * 2;

/// Peak voltage used until the intensity slider is moved
pub const DEFAULT_MAX_VOLT: f32 = MIN_VOLT + (MAX_VOLT - MIN_VOLT) / 2.0;

/// Sample hold time used until the frequency slider is moved
pub const DEFAULT_TIME_MS: u16 = MIN_TIME_MS + (MAX_TIME_MS - MIN_TIME_MS) / 2;
