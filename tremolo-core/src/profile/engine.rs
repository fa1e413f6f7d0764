//! Force profile engine
//!
//! Owns the force sequence built from the drawn profile and steps through
//! it in real time. The engine never blocks: [`ForceDistribution::step`] is
//! called every loop iteration and only compares the elapsed time against
//! the hold time of the active entry.
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = ForceDistribution::new();
//! engine.set_max_voltage(8.0)?;
//! engine.set_distribution(&drawn)?;
//!
//! // Every loop iteration:
//! let volts = engine.step(now_ms).unwrap_or(0.0);
//! ```

use core::fmt::Write;

use super::sequence::{ForceSequence, ForceStep};
use crate::config::{
    DEFAULT_MAX_VOLT, DEFAULT_TIME_MS, MAX_TIME_MS, MAX_VOLT, MIN_TIME_MS, MIN_VOLT, PROFILE_LEN,
};

/// Errors reported by the force profile engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ForceError {
    /// Peak voltage outside `MIN_VOLT..=MAX_VOLT`
    VoltageOutOfRange,
    /// Hold time outside `MIN_TIME_MS..=MAX_TIME_MS`
    IntervalOutOfRange,
    /// Profile has no samples
    EmptyProfile,
    /// Profile longer than the drawable width
    ProfileTooLong,
    /// Profile value above 100
    PowerOutOfRange,
    /// No sequence loaded
    NoSequence,
}

/// Playback position within the loaded sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackCursor {
    /// Index of the active entry (equal to the length once finished)
    pub current: usize,
    /// Activation time of the active entry (ms)
    pub started_ms: u32,
    /// Next step starts the sequence from the beginning
    pub start_run: bool,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self {
            current: 0,
            started_ms: 0,
            start_run: true,
        }
    }
}

/// Force profile engine
pub struct ForceDistribution {
    /// Loaded sequence, if any
    sequence: Option<ForceSequence>,
    /// Peak voltage applied to the next build
    max_voltage: f32,
    /// Sample hold time applied to the next build
    time_per_interval_ms: u16,
    /// Playback position
    cursor: PlaybackCursor,
}

impl Default for ForceDistribution {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceDistribution {
    /// Create an engine with default settings and nothing loaded
    pub fn new() -> Self {
        Self {
            sequence: None,
            max_voltage: DEFAULT_MAX_VOLT,
            time_per_interval_ms: DEFAULT_TIME_MS,
            cursor: PlaybackCursor::default(),
        }
    }

    /// Set the peak voltage used by the next [`set_distribution`](Self::set_distribution)
    ///
    /// An already loaded sequence keeps its scaling.
    pub fn set_max_voltage(&mut self, volts: f32) -> Result<(), ForceError> {
        // NaN fails both comparisons and is rejected too
        if !(MIN_VOLT..=MAX_VOLT).contains(&volts) {
            return Err(ForceError::VoltageOutOfRange);
        }
        self.max_voltage = volts;
        Ok(())
    }

    /// Set the sample hold time used by the next build
    pub fn set_time_per_interval(&mut self, ms: u16) -> Result<(), ForceError> {
        if !(MIN_TIME_MS..=MAX_TIME_MS).contains(&ms) {
            return Err(ForceError::IntervalOutOfRange);
        }
        self.time_per_interval_ms = ms;
        Ok(())
    }

    /// Load a drawn profile (values 0-100, one per column)
    ///
    /// Replaces any loaded sequence and rewinds playback. On error the
    /// previous sequence and cursor are left untouched.
    pub fn set_distribution(&mut self, profile: &[u8]) -> Result<(), ForceError> {
        if profile.is_empty() {
            return Err(ForceError::EmptyProfile);
        }
        if profile.len() > PROFILE_LEN {
            return Err(ForceError::ProfileTooLong);
        }
        if profile.iter().any(|&p| p > 100) {
            return Err(ForceError::PowerOutOfRange);
        }

        let sequence = ForceSequence::build(profile, self.max_voltage, self.time_per_interval_ms)
            .ok_or(ForceError::ProfileTooLong)?;

        self.sequence = Some(sequence);
        self.cursor = PlaybackCursor::default();
        Ok(())
    }

    /// Rewind playback to the first entry
    pub fn restart_forcing(&mut self) -> Result<(), ForceError> {
        if self.sequence.is_none() {
            return Err(ForceError::NoSequence);
        }
        self.cursor = PlaybackCursor::default();
        Ok(())
    }

    /// Advance playback and return the voltage that should be active now
    ///
    /// Advances at most one entry per call. Returns 0 V once the last
    /// entry has elapsed.
    pub fn step(&mut self, now_ms: u32) -> Result<f32, ForceError> {
        let sequence = self.sequence.as_ref().ok_or(ForceError::NoSequence)?;
        let cursor = &mut self.cursor;

        if cursor.start_run {
            cursor.start_run = false;
            cursor.current = 0;
            cursor.started_ms = now_ms;
        } else if let Some(active) = sequence.get(cursor.current) {
            if now_ms.wrapping_sub(cursor.started_ms) >= active.duration_ms as u32 {
                cursor.current += 1;
                cursor.started_ms = now_ms;
            }
        }

        Ok(sequence.get(cursor.current).map_or(0.0, |s| s.voltage))
    }

    /// Drop the loaded sequence and restore default settings
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Write the sequence as `index force time` lines
    pub fn print_list<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        let Some(sequence) = self.sequence.as_ref() else {
            return writeln!(out, "(no sequence)");
        };
        for (i, (force, time)) in sequence.forces().zip(sequence.times()).enumerate() {
            writeln!(out, "{} {} {}", i, force, time)?;
        }
        Ok(())
    }

    /// Peak voltage for the next build
    pub fn max_voltage(&self) -> f32 {
        self.max_voltage
    }

    /// Sample hold time for the next build
    pub fn time_per_interval(&self) -> u16 {
        self.time_per_interval_ms
    }

    /// Loaded sequence, if any
    pub fn sequence(&self) -> Option<&ForceSequence> {
        self.sequence.as_ref()
    }

    /// Entries of the loaded sequence (empty if none)
    pub fn steps(&self) -> &[ForceStep] {
        match &self.sequence {
            Some(sequence) => sequence.steps(),
            None => &[],
        }
    }

    /// Check if a sequence is loaded
    pub fn is_loaded(&self) -> bool {
        self.sequence.is_some()
    }

    /// Number of entries in the loaded sequence (0 if none)
    pub fn len(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.len())
    }

    /// Check if nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current playback position
    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    /// Index of the active entry
    pub fn current_index(&self) -> usize {
        self.cursor.current
    }

    /// Check if playback ran past the last entry
    pub fn is_complete(&self) -> bool {
        match self.sequence.as_ref() {
            Some(seq) => !self.cursor.start_run && self.cursor.current >= seq.len(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StepKind;

    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-4 && d > -1e-4
    }

    #[test]
    fn test_defaults() {
        let engine = ForceDistribution::new();
        assert_eq!(engine.max_voltage(), 7.0);
        assert_eq!(engine.time_per_interval(), 55);
        assert!(!engine.is_loaded());
        assert!(!engine.is_complete());
    }

    #[test]
    fn test_max_voltage_bounds() {
        let mut engine = ForceDistribution::new();

        assert_eq!(engine.set_max_voltage(3.0), Err(ForceError::VoltageOutOfRange));
        assert_eq!(engine.max_voltage(), 7.0);
        assert_eq!(engine.set_max_voltage(9.5), Err(ForceError::VoltageOutOfRange));
        assert_eq!(engine.set_max_voltage(f32::NAN), Err(ForceError::VoltageOutOfRange));
        assert_eq!(engine.max_voltage(), 7.0);

        assert!(engine.set_max_voltage(5.0).is_ok());
        assert!(engine.set_max_voltage(9.0).is_ok());
        assert_eq!(engine.max_voltage(), 9.0);
    }

    #[test]
    fn test_interval_bounds() {
        let mut engine = ForceDistribution::new();

        assert_eq!(engine.set_time_per_interval(9), Err(ForceError::IntervalOutOfRange));
        assert_eq!(engine.set_time_per_interval(101), Err(ForceError::IntervalOutOfRange));
        assert_eq!(engine.time_per_interval(), 55);

        assert!(engine.set_time_per_interval(10).is_ok());
        assert!(engine.set_time_per_interval(100).is_ok());
        assert_eq!(engine.time_per_interval(), 100);
    }

    #[test]
    fn test_set_distribution_rejects_bad_input() {
        let mut engine = ForceDistribution::new();
        engine.set_distribution(&[50, 50]).unwrap();

        assert_eq!(engine.set_distribution(&[]), Err(ForceError::EmptyProfile));
        assert_eq!(engine.set_distribution(&[10, 101]), Err(ForceError::PowerOutOfRange));
        let long = [0u8; PROFILE_LEN + 1];
        assert_eq!(engine.set_distribution(&long), Err(ForceError::ProfileTooLong));

        // Previous sequence survives
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_max_voltage_not_retroactive() {
        let mut engine = ForceDistribution::new();
        engine.set_distribution(&[100]).unwrap();
        engine.set_max_voltage(9.0).unwrap();

        assert!(close(engine.step(0).unwrap(), 7.0));

        engine.set_distribution(&[100]).unwrap();
        assert!(close(engine.step(0).unwrap(), 9.0));
    }

    #[test]
    fn test_step_without_sequence() {
        let mut engine = ForceDistribution::new();
        assert_eq!(engine.step(0), Err(ForceError::NoSequence));
        assert_eq!(engine.restart_forcing(), Err(ForceError::NoSequence));
    }

    #[test]
    fn test_step_holds_then_advances() {
        let mut engine = ForceDistribution::new();
        engine.set_time_per_interval(10).unwrap();
        engine.set_distribution(&[40, 50]).unwrap();

        assert!(close(engine.step(1000).unwrap(), 2.8));
        // Repeated calls inside the hold change nothing
        for t in 1001..1010 {
            assert!(close(engine.step(t).unwrap(), 2.8));
            assert_eq!(engine.current_index(), 0);
        }
        assert!(close(engine.step(1010).unwrap(), 3.5));
        assert_eq!(engine.current_index(), 1);

        assert!(close(engine.step(1020).unwrap(), 0.0));
        assert!(engine.is_complete());

        // Stays finished
        assert!(close(engine.step(5000).unwrap(), 0.0));
        assert_eq!(engine.current_index(), 2);
    }

    #[test]
    fn test_backstop_plays_for_its_own_time() {
        let mut engine = ForceDistribution::new();
        engine.set_time_per_interval(10).unwrap();
        engine.set_distribution(&[10, 90]).unwrap();

        let seq = engine.sequence().unwrap();
        assert_eq!(seq.get(2).unwrap().kind, StepKind::Backstop);

        assert!(close(engine.step(0).unwrap(), 0.7));
        assert!(close(engine.step(10).unwrap(), 6.3));
        assert!(close(engine.step(20).unwrap(), -4.2));
        assert!(close(engine.step(26).unwrap(), -4.2));
        assert!(close(engine.step(27).unwrap(), 0.0));
        assert!(engine.is_complete());
    }

    #[test]
    fn test_clock_wraparound() {
        let mut engine = ForceDistribution::new();
        engine.set_time_per_interval(10).unwrap();
        engine.set_distribution(&[20, 40]).unwrap();

        engine.step(u32::MAX - 4).unwrap();
        assert_eq!(engine.current_index(), 0);
        engine.step(5).unwrap();
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn test_restart_after_partial_playback() {
        let mut engine = ForceDistribution::new();
        engine.set_time_per_interval(10).unwrap();
        engine.set_distribution(&[20, 40, 60]).unwrap();

        engine.step(0).unwrap();
        engine.step(10).unwrap();
        assert_eq!(engine.current_index(), 1);

        engine.restart_forcing().unwrap();
        assert_eq!(engine.cursor(), PlaybackCursor::default());
        assert!(close(engine.step(500).unwrap(), 1.4));
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn test_reset() {
        let mut engine = ForceDistribution::new();
        engine.set_max_voltage(9.0).unwrap();
        engine.set_time_per_interval(10).unwrap();
        engine.set_distribution(&[20]).unwrap();
        engine.step(0).unwrap();

        engine.reset();

        assert!(!engine.is_loaded());
        assert_eq!(engine.max_voltage(), 7.0);
        assert_eq!(engine.time_per_interval(), 55);
        assert_eq!(engine.step(0), Err(ForceError::NoSequence));
    }

    #[test]
    fn test_print_list() {
        let mut engine = ForceDistribution::new();
        let mut out: heapless::String<128> = heapless::String::new();
        engine.print_list(&mut out).unwrap();
        assert_eq!(out.as_str(), "(no sequence)\n");

        engine.set_max_voltage(5.0).unwrap();
        engine.set_time_per_interval(20).unwrap();
        engine.set_distribution(&[0, 100]).unwrap();

        out.clear();
        engine.print_list(&mut out).unwrap();
        let mut lines = out.as_str().lines();
        assert_eq!(lines.next(), Some("0 0 20"));
        assert_eq!(lines.next(), Some("1 5 20"));
        assert!(lines.next().unwrap().ends_with(" 7"));
        assert_eq!(lines.next(), None);
    }
}
