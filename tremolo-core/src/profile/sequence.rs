//! Force sequences built from drawn profiles
//!
//! A sequence is the list of (voltage, hold time) pairs the engine plays
//! back. It holds one sample per drawn column plus the backstop pulses
//! inserted after steep voltage transitions.

use heapless::Vec;

use crate::config::{BACKSTOPPING_TIME_MS, BACKSTOP_VOLTAGE, SEQUENCE_CAPACITY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Origin of a sequence entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepKind {
    /// Scaled from a drawn column
    Sample,
    /// Reverse pulse arresting the rotor after a steep transition
    Backstop,
}

/// A single entry of a force sequence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForceStep {
    /// Output voltage (negative drives the motor backwards)
    pub voltage: f32,
    /// Hold time in ms
    pub duration_ms: u16,
    /// Where the entry came from
    pub kind: StepKind,
}

impl ForceStep {
    /// Create a step scaled from a drawn column
    pub const fn sample(voltage: f32, duration_ms: u16) -> Self {
        Self {
            voltage,
            duration_ms,
            kind: StepKind::Sample,
        }
    }

    /// Create the backstop pulse for a profile peaking at `max_voltage`
    pub fn backstop(max_voltage: f32) -> Self {
        Self {
            voltage: BACKSTOP_VOLTAGE * max_voltage,
            duration_ms: BACKSTOPPING_TIME_MS,
            kind: StepKind::Backstop,
        }
    }
}

/// Scale a normalized power (0-100) to volts
pub fn power_to_voltage(power: u8, max_voltage: f32) -> f32 {
    power as f32 * max_voltage / 100.0
}

/// Check whether going from `prev` to `curr` volts needs a backstop
///
/// Fires when `prev - curr < BACKSTOP_VOLTAGE * prev`. With the negative
/// `BACKSTOP_VOLTAGE` this holds when `curr` exceeds `prev` by more than
/// 60% of `prev`, and for any rise out of standstill.
pub fn needs_backstop(prev: f32, curr: f32) -> bool {
    prev - curr < BACKSTOP_VOLTAGE * prev
}

/// Owned, fixed-capacity force sequence
#[derive(Debug, Clone, Default)]
pub struct ForceSequence {
    steps: Vec<ForceStep, SEQUENCE_CAPACITY>,
}

impl ForceSequence {
    /// Build a sequence from a validated profile
    ///
    /// Returns `None` if the result would not fit, which cannot happen for
    /// profiles up to `PROFILE_LEN` samples.
    pub fn build(profile: &[u8], max_voltage: f32, interval_ms: u16) -> Option<Self> {
        let mut steps = Vec::new();
        let mut prev: Option<f32> = None;

        for &power in profile {
            let voltage = power_to_voltage(power, max_voltage);

            steps.push(ForceStep::sample(voltage, interval_ms)).ok()?;

            // The pulse follows the sample that triggered it. Only samples
            // are compared; a backstop never triggers another.
            if prev.is_some_and(|prev| needs_backstop(prev, voltage)) {
                steps.push(ForceStep::backstop(max_voltage)).ok()?;
            }
            prev = Some(voltage);
        }

        Some(Self { steps })
    }

    /// Number of entries, backstops included
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get an entry by index
    pub fn get(&self, index: usize) -> Option<&ForceStep> {
        self.steps.get(index)
    }

    /// All entries in playback order
    pub fn steps(&self) -> &[ForceStep] {
        &self.steps
    }

    /// Voltages in playback order
    pub fn forces(&self) -> impl Iterator<Item = f32> + '_ {
        self.steps.iter().map(|s| s.voltage)
    }

    /// Hold times in playback order
    pub fn times(&self) -> impl Iterator<Item = u16> + '_ {
        self.steps.iter().map(|s| s.duration_ms)
    }

    /// Number of inserted backstop pulses
    pub fn backstop_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::Backstop)
            .count()
    }
}
