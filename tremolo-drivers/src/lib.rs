//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tremolo-core, written against `embedded-hal` 1.0 so they work on
//! any HAL:
//!
//! - ERM motor drive on a two-input H-bridge (software PWM)
//! - XPT2046 resistive touch controller
//! - ILI9341 TFT panel (also an `embedded-graphics` draw target)

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod display;
pub mod touch;
