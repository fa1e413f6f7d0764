//! Drawn profile buffer
//!
//! One slot per drawable column. Slots stay `None` until the finger passes
//! over them; a fast stroke skips columns, which
//! [`fill_in_drawn_distribution`](DrawnProfile::fill_in_drawn_distribution)
//! repairs before the profile is handed to the engine.

use crate::config::PROFILE_LEN;

/// User-drawn power profile (0-100 per column)
#[derive(Debug, Clone)]
pub struct DrawnProfile {
    columns: [Option<u8>; PROFILE_LEN],
}

impl Default for DrawnProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawnProfile {
    /// Create an empty profile
    pub const fn new() -> Self {
        Self {
            columns: [None; PROFILE_LEN],
        }
    }

    /// Record a drawn value; later writes to the same column win
    pub fn set(&mut self, column: usize, power: u8) {
        if let Some(slot) = self.columns.get_mut(column) {
            *slot = Some(power.min(100));
        }
    }

    /// Value of a column, if drawn
    pub fn get(&self, column: usize) -> Option<u8> {
        self.columns.get(column).copied().flatten()
    }

    /// Forget every drawn value
    pub fn clear(&mut self) {
        self.columns = [None; PROFILE_LEN];
    }

    /// Check if nothing has been drawn
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Option::is_none)
    }

    /// Check if every column holds a value
    pub fn is_complete(&self) -> bool {
        self.columns.iter().all(Option::is_some)
    }

    /// Fill undrawn columns with the previously drawn value
    ///
    /// Columns before the first drawn one take the first drawn value.
    /// Returns `false` and leaves the buffer untouched if nothing was drawn.
    pub fn fill_in_drawn_distribution(&mut self) -> bool {
        let Some(first) = self.columns.iter().copied().flatten().next() else {
            return false;
        };

        let mut last = first;
        for slot in self.columns.iter_mut() {
            match *slot {
                Some(value) => last = value,
                None => *slot = Some(last),
            }
        }
        true
    }

    /// Completed profile, ready for the engine
    ///
    /// Returns `None` until every column holds a value.
    pub fn values(&self) -> Option<[u8; PROFILE_LEN]> {
        let mut out = [0u8; PROFILE_LEN];
        for (dst, src) in out.iter_mut().zip(self.columns.iter()) {
            *dst = (*src)?;
        }
        Some(out)
    }

    /// Raw column slots
    pub fn columns(&self) -> &[Option<u8>] {
        &self.columns
    }
}
