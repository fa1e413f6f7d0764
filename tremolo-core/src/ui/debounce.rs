//! Hold-time debouncing for buttons and sliders
//!
//! A resistive panel reports a stream of samples while a finger rests on
//! it. A press only counts once it has stayed on the same target for the
//! threshold time:
//!
//! - buttons fire once per hold after `BUTTON_TIME_MS`
//! - sliders fire on every sample once held for `SLIDER_TIME_MS`

use super::layout::Target;
use crate::config::{BUTTON_TIME_MS, SLIDER_TIME_MS};

/// Push timer shared by all targets
#[derive(Debug, Clone, Copy, Default)]
pub struct PushTimer {
    /// Target under the finger
    target: Option<Target>,
    /// When the finger arrived on it (ms)
    began_ms: u32,
    /// Button already fired during this hold
    consumed: bool,
}

impl PushTimer {
    /// Create an idle timer
    pub const fn new() -> Self {
        Self {
            target: None,
            began_ms: 0,
            consumed: false,
        }
    }

    /// Record that `target` is touched at `now_ms`
    fn press(&mut self, target: Target, now_ms: u32) {
        if self.target != Some(target) {
            self.target = Some(target);
            self.began_ms = now_ms;
            self.consumed = false;
        }
    }

    /// Time the current target has been held
    pub fn held_ms(&self, now_ms: u32) -> u32 {
        match self.target {
            Some(_) => now_ms.wrapping_sub(self.began_ms),
            None => 0,
        }
    }

    /// Check for a deliberate button press
    ///
    /// Returns `true` exactly once per hold.
    pub fn button_proper_push(&mut self, target: Target, now_ms: u32) -> bool {
        self.press(target, now_ms);
        if !self.consumed && self.held_ms(now_ms) >= BUTTON_TIME_MS {
            self.consumed = true;
            return true;
        }
        false
    }

    /// Check for a deliberate slider press
    ///
    /// Returns `true` on every call once held long enough.
    pub fn slider_proper_push(&mut self, target: Target, now_ms: u32) -> bool {
        self.press(target, now_ms);
        self.held_ms(now_ms) >= SLIDER_TIME_MS
    }

    /// Finger lifted or left every target
    pub fn release(&mut self) {
        *self = Self::new();
    }

    /// Target currently held
    pub fn target(&self) -> Option<Target> {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_needs_hold() {
        let mut timer = PushTimer::new();

        assert!(!timer.button_proper_push(Target::Save, 1000));
        assert!(!timer.button_proper_push(Target::Save, 1199));
        assert!(timer.button_proper_push(Target::Save, 1200));
    }

    #[test]
    fn test_button_fires_once_per_hold() {
        let mut timer = PushTimer::new();

        timer.button_proper_push(Target::Save, 0);
        assert!(timer.button_proper_push(Target::Save, 250));
        assert!(!timer.button_proper_push(Target::Save, 300));
        assert!(!timer.button_proper_push(Target::Save, 2000));

        timer.release();
        timer.button_proper_push(Target::Save, 3000);
        assert!(timer.button_proper_push(Target::Save, 3200));
    }

    #[test]
    fn test_moving_to_another_target_restarts() {
        let mut timer = PushTimer::new();

        timer.button_proper_push(Target::Save, 0);
        assert!(!timer.button_proper_push(Target::Delete, 150));
        assert!(!timer.button_proper_push(Target::Delete, 300));
        assert!(timer.button_proper_push(Target::Delete, 350));
    }

    #[test]
    fn test_slider_repeats() {
        let mut timer = PushTimer::new();

        assert!(!timer.slider_proper_push(Target::LeftBar, 0));
        assert!(!timer.slider_proper_push(Target::LeftBar, 24));
        assert!(timer.slider_proper_push(Target::LeftBar, 25));
        assert!(timer.slider_proper_push(Target::LeftBar, 26));
        assert!(timer.slider_proper_push(Target::LeftBar, 500));
    }

    #[test]
    fn test_release_clears() {
        let mut timer = PushTimer::new();
        timer.slider_proper_push(Target::RightBar, 0);
        assert_eq!(timer.target(), Some(Target::RightBar));

        timer.release();
        assert_eq!(timer.target(), None);
        assert_eq!(timer.held_ms(100), 0);
    }
}
