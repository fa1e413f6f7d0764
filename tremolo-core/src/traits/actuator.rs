//! Actuator output trait

/// Output stage that turns a target voltage into drive signals
///
/// Implementations run the software PWM and own the output lines.
pub trait VoltageOutput {
    /// Apply `volts` for the current time
    ///
    /// Called on every loop iteration and must never block. Returns `true`
    /// when the target was accepted and the outputs were updated.
    fn set_voltage(&mut self, now_ms: u32, volts: f32) -> bool;

    /// Voltage currently being synthesized
    fn voltage(&self) -> f32;
}
