//! Board-agnostic core logic for the tremolo haptic firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (touch panel, canvas, voltage output)
//! - Force profile engine (drawn profile to timed voltage sequence)
//! - Software PWM controller for the H-bridge
//! - Touch UI state machine and screen renderer
//! - Controller running the polling loop steps
//! - Configuration limits and type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod profile;
pub mod pwm;
pub mod traits;
pub mod ui;
