//! Software PWM voltage controller
//!
//! Approximates an analog voltage on the ERM motor by switching one of two
//! H-bridge inputs on and off within a fixed `ON_TIME_MS` cycle:
//!
//! ```text
//!  |<------------- ON_TIME_MS ------------->|
//!  |‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|______________________|‾‾‾‾‾‾...
//!  |<- high_ms ----->|
//!     high_ms = round(ON_TIME_MS * |v| / MAX_VOLT)
//! ```
//!
//! The sign of the target picks the line: forward for positive voltages,
//! backward for negative ones (backstop pulses). The controller is pure
//! bookkeeping; pin writes happen in the driver that owns the lines.

use crate::config::{MAX_VOLT, ON_TIME_MS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase within the current PWM cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PwmPhase {
    /// Output deasserted
    #[default]
    Low,
    /// Output asserted on the line selected by the voltage sign
    High,
}

/// Requested levels of the two H-bridge inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BridgeLevels {
    /// Forward input level
    pub forward: bool,
    /// Backward input level
    pub backward: bool,
}

impl BridgeLevels {
    /// Both inputs low (motor coasting)
    pub const OFF: Self = Self {
        forward: false,
        backward: false,
    };
}

/// Absolute value without relying on `std`
fn magnitude(volts: f32) -> f32 {
    if volts < 0.0 {
        -volts
    } else {
        volts
    }
}

/// HIGH time per cycle for a target voltage
///
/// Magnitudes above `MAX_VOLT` saturate at a fully-on cycle.
pub fn duty_high_ms(volts: f32) -> u32 {
    if !volts.is_finite() {
        return 0;
    }
    let ratio = magnitude(volts).min(MAX_VOLT) / MAX_VOLT;
    let high = ON_TIME_MS as f32 * ratio + 0.5;
    (high as u32).min(ON_TIME_MS)
}

/// Software PWM state
#[derive(Debug, Clone)]
pub struct PwmController {
    /// Last requested voltage after clamping
    current_voltage: f32,
    /// Start of the current cycle (ms)
    begin_ms: u32,
    /// Current phase
    phase: PwmPhase,
}

impl Default for PwmController {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmController {
    /// Create a controller with the output low
    pub const fn new() -> Self {
        Self {
            current_voltage: 0.0,
            begin_ms: 0,
            phase: PwmPhase::Low,
        }
    }

    /// Advance the PWM for the current time and target voltage
    ///
    /// Call every loop iteration, much more often than once per
    /// `ON_TIME_MS`. Non-finite targets are treated as 0 V.
    pub fn update(&mut self, now_ms: u32, target: f32) -> BridgeLevels {
        self.current_voltage = if target.is_finite() {
            target.clamp(-MAX_VOLT, MAX_VOLT)
        } else {
            0.0
        };

        let mut elapsed = now_ms.wrapping_sub(self.begin_ms);
        if elapsed >= ON_TIME_MS {
            self.begin_ms = now_ms;
            elapsed = 0;
        }

        let want = if elapsed < duty_high_ms(self.current_voltage) {
            PwmPhase::High
        } else {
            PwmPhase::Low
        };
        if want != self.phase {
            self.phase = want;
        }

        self.levels()
    }

    /// Levels for the current phase and voltage sign
    pub fn levels(&self) -> BridgeLevels {
        if self.phase == PwmPhase::Low || self.current_voltage == 0.0 {
            return BridgeLevels::OFF;
        }
        BridgeLevels {
            forward: self.current_voltage > 0.0,
            backward: self.current_voltage < 0.0,
        }
    }

    /// Force the output low and restart the cycle on the next update
    pub fn stop(&mut self, now_ms: u32) {
        self.current_voltage = 0.0;
        self.phase = PwmPhase::Low;
        self.begin_ms = now_ms.wrapping_sub(ON_TIME_MS);
    }

    /// Last applied (clamped) voltage
    pub fn current_voltage(&self) -> f32 {
        self.current_voltage
    }

    /// Current phase
    pub fn phase(&self) -> PwmPhase {
        self.phase
    }

    /// Check if the output is asserted
    pub fn is_high(&self) -> bool {
        self.phase == PwmPhase::High
    }
}
