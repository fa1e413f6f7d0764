//! Touch targets and coordinate conversions
//!
//! Maps screen points onto the elements of [`Layout`] and converts between
//! pixel rows and the normalized values the elements represent.

use crate::config::{Layout, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Touchable screen element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Target {
    /// Profile drawing area
    Draw,
    /// Start/stop button
    StartStop,
    /// Save button
    Save,
    /// Delete button
    Delete,
    /// Frequency slider
    LeftBar,
    /// Intensity slider
    RightBar,
}

impl Target {
    /// Check if this target is a slider
    pub fn is_slider(&self) -> bool {
        matches!(self, Target::LeftBar | Target::RightBar)
    }

    /// Check if this target is a button
    pub fn is_button(&self) -> bool {
        matches!(self, Target::StartStop | Target::Save | Target::Delete)
    }
}

impl Layout {
    /// Find the element under a screen point
    pub fn hit(&self, x: u16, y: u16) -> Option<Target> {
        let targets = [
            (self.draw_area, Target::Draw),
            (self.start_stop, Target::StartStop),
            (self.save, Target::Save),
            (self.delete, Target::Delete),
            (self.left_bar, Target::LeftBar),
            (self.right_bar, Target::RightBar),
        ];
        targets
            .iter()
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, target)| *target)
    }

    /// Rectangle of a target
    pub fn rect(&self, target: Target) -> Rect {
        match target {
            Target::Draw => self.draw_area,
            Target::StartStop => self.start_stop,
            Target::Save => self.save,
            Target::Delete => self.delete,
            Target::LeftBar => self.left_bar,
            Target::RightBar => self.right_bar,
        }
    }

    /// Profile column for a screen X inside the drawing area
    pub fn column(&self, x: u16) -> Option<usize> {
        let area = self.draw_area;
        if x < area.x || x > area.right() {
            return None;
        }
        Some((x - area.x) as usize)
    }

    /// Normalized power (0-100) for a screen Y inside the drawing area
    pub fn power_at(&self, y: u16) -> u8 {
        let area = self.draw_area;
        let y = y.clamp(area.y, area.bottom());
        let span = area.h.saturating_sub(1).max(1) as u32;
        let from_bottom = (area.bottom() - y) as u32;
        ((from_bottom * 100 + span / 2) / span).min(100) as u8
    }

    /// Screen Y of a normalized power inside the drawing area
    pub fn power_row(&self, power: u8) -> u16 {
        let area = self.draw_area;
        let span = area.h.saturating_sub(1) as u32;
        let up = (power.min(100) as u32 * span + 50) / 100;
        area.bottom() - up as u16
    }
}

/// Slider position (0.0 bottom to 1.0 top) for a touched row
pub fn slider_position(track: Rect, y: u16) -> f32 {
    let y = y.clamp(track.y, track.bottom());
    let span = track.h.saturating_sub(1).max(1) as f32;
    (track.bottom() - y) as f32 / span
}

/// Row of the slider knob for a position
pub fn slider_row(track: Rect, position: f32) -> u16 {
    let span = track.h.saturating_sub(1) as f32;
    let up = (position.clamp(0.0, 1.0) * span + 0.5) as u16;
    track.bottom() - up
}
