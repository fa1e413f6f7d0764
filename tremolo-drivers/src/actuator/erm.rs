//! ERM motor on a two-input H-bridge
//!
//! The bridge has one input per direction. Driving the forward input spins
//! the motor forward, the backward input brakes/reverses it for backstop
//! pulses. Both low lets it coast. Both high would short the supply through
//! the bridge and must never happen.
//!
//! # Usage
//!
//! ```ignore
//! let mut motor = ErmDrive::new(forward_pin, backward_pin);
//!
//! // Every loop iteration:
//! motor.set_voltage(now_ms, target);
//! ```

use embedded_hal::digital::OutputPin;
use tremolo_core::pwm::{BridgeLevels, PwmController};
use tremolo_core::traits::VoltageOutput;

/// Software-PWM ERM driver
pub struct ErmDrive<F, B> {
    forward: F,
    backward: B,
    pwm: PwmController,
    /// Levels last written to the pins
    levels: BridgeLevels,
}

impl<F: OutputPin, B: OutputPin> ErmDrive<F, B> {
    /// Create the driver and pull both inputs low
    pub fn new(forward: F, backward: B) -> Self {
        let mut drive = Self {
            forward,
            backward,
            pwm: PwmController::new(),
            levels: BridgeLevels::OFF,
        };
        // Pin state is unknown until written once
        let _ = drive.forward.set_low();
        let _ = drive.backward.set_low();
        drive
    }

    /// Release both inputs and restart the PWM cycle
    pub fn stop(&mut self, now_ms: u32) -> bool {
        self.pwm.stop(now_ms);
        self.apply(BridgeLevels::OFF)
    }

    /// Levels currently on the pins
    pub fn levels(&self) -> BridgeLevels {
        self.levels
    }

    /// Write changed levels, deasserting before asserting
    ///
    /// Nothing is asserted unless every deassert succeeded. `levels` only
    /// records writes that went through, so failed ones are retried on the
    /// next call.
    fn apply(&mut self, next: BridgeLevels) -> bool {
        let mut ok = true;

        if self.levels.forward && !next.forward {
            match self.forward.set_low() {
                Ok(()) => self.levels.forward = false,
                Err(_) => ok = false,
            }
        }
        if self.levels.backward && !next.backward {
            match self.backward.set_low() {
                Ok(()) => self.levels.backward = false,
                Err(_) => ok = false,
            }
        }
        if !ok {
            return false;
        }

        if !self.levels.forward && next.forward {
            match self.forward.set_high() {
                Ok(()) => self.levels.forward = true,
                Err(_) => ok = false,
            }
        }
        if !self.levels.backward && next.backward {
            match self.backward.set_high() {
                Ok(()) => self.levels.backward = true,
                Err(_) => ok = false,
            }
        }

        ok
    }

    /// Release the pins
    pub fn release(self) -> (F, B) {
        (self.forward, self.backward)
    }
}

impl<F: OutputPin, B: OutputPin> VoltageOutput for ErmDrive<F, B> {
    fn set_voltage(&mut self, now_ms: u32, volts: f32) -> bool {
        let next = self.pwm.update(now_ms, volts);
        let written = self.apply(next);
        volts.is_finite() && written
    }

    fn voltage(&self) -> f32 {
        self.pwm.current_voltage()
    }
}
