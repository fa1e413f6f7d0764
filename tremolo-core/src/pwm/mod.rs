//! PWM voltage controller

pub mod controller;

pub use controller::{duty_high_ms, BridgeLevels, PwmController, PwmPhase};
