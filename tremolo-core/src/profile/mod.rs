//! Force profile engine
//!
//! Converts drawn profiles into force sequences and plays them back.

pub mod engine;
pub mod sequence;

pub use engine::{ForceDistribution, ForceError, PlaybackCursor};
pub use sequence::{needs_backstop, power_to_voltage, ForceSequence, ForceStep, StepKind};
