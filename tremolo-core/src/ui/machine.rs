//! Input/drawing state machine
//!
//! Consumes one validated touch sample per loop iteration and turns it into
//! profile edits, slider moves and button commands. Motor state is owned by
//! the controller and pushed in through [`UiState::set_motor_on`]; the UI
//! only decides what a press means in the current state.

use super::debounce::PushTimer;
use super::drawing::DrawnProfile;
use super::events::UiCommand;
use super::layout::{slider_position, Target};
use super::touch::TouchPoint;
use crate::config::{Layout, MAX_TIME_MS, MAX_VOLT, MIN_TIME_MS, MIN_VOLT, PROFILE_LEN};

/// Pen movement since the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PenStroke {
    /// Previous point of the same stroke, if any
    pub from: Option<TouchPoint>,
    /// Newly drawn point
    pub to: TouchPoint,
}

/// Parts of the screen that need repainting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Redraw {
    /// Whole screen
    pub layout: bool,
    /// Button row: start/stop label, save/delete availability
    pub motor: bool,
    /// Frequency slider knob
    pub left_bar: bool,
    /// Intensity slider knob
    pub right_bar: bool,
    /// Wipe the drawing area
    pub clear_drawing: bool,
    /// Repaint the drawn curve from the buffer
    pub profile: bool,
    /// Latest pen point
    pub pen: Option<PenStroke>,
}

impl Redraw {
    /// Check if anything needs painting
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// UI state
#[derive(Debug, Clone)]
pub struct UiState {
    layout: Layout,
    push: PushTimer,
    motor_on: bool,
    first_draw: bool,
    saved: bool,
    drawing: DrawnProfile,
    left_bar_position: f32,
    right_bar_position: f32,
    /// Last drawn point of the current stroke
    pen: Option<TouchPoint>,
    redraw: Redraw,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl UiState {
    /// Create the UI state; the first render paints the full screen
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            push: PushTimer::new(),
            motor_on: false,
            first_draw: true,
            saved: false,
            drawing: DrawnProfile::new(),
            left_bar_position: 0.5,
            right_bar_position: 0.5,
            pen: None,
            redraw: Redraw {
                layout: true,
                ..Redraw::default()
            },
        }
    }

    /// Process one touch sample
    ///
    /// `None` means no valid touch this iteration (lifted or noise).
    pub fn update(&mut self, now_ms: u32, point: Option<TouchPoint>) -> Option<UiCommand> {
        let Some(point) = point else {
            self.release();
            return None;
        };
        let Some(target) = self.layout.hit(point.x, point.y) else {
            self.release();
            return None;
        };

        if target != Target::Draw {
            self.end_stroke();
        }

        match target {
            Target::Draw => {
                self.push.release();
                self.draw(point);
                None
            }
            Target::LeftBar | Target::RightBar => {
                if self.push.slider_proper_push(target, now_ms) {
                    self.move_slider(target, point.y)
                } else {
                    None
                }
            }
            Target::StartStop | Target::Save | Target::Delete => {
                if self.push.button_proper_push(target, now_ms) {
                    self.press_button(target)
                } else {
                    None
                }
            }
        }
    }

    fn release(&mut self) {
        self.push.release();
        self.end_stroke();
    }

    /// Finish the current stroke and repair skipped columns
    fn end_stroke(&mut self) {
        if self.pen.take().is_some() && self.drawing.fill_in_drawn_distribution() {
            self.redraw.profile = true;
        }
    }

    fn draw(&mut self, point: TouchPoint) {
        if self.motor_on || self.saved {
            return;
        }
        let Some(column) = self.layout.column(point.x) else {
            return;
        };

        if self.first_draw {
            self.first_draw = false;
            self.drawing.clear();
            self.redraw.clear_drawing = true;
        }

        self.drawing.set(column, self.layout.power_at(point.y));
        self.redraw.pen = Some(PenStroke {
            from: self.pen,
            to: point,
        });
        self.pen = Some(point);
    }

    fn move_slider(&mut self, target: Target, y: u16) -> Option<UiCommand> {
        let position = slider_position(self.layout.rect(target), y);
        let (bar, dirty) = match target {
            Target::LeftBar => (&mut self.left_bar_position, &mut self.redraw.left_bar),
            _ => (&mut self.right_bar_position, &mut self.redraw.right_bar),
        };
        if *bar == position {
            return None;
        }
        *bar = position;
        *dirty = true;
        Some(UiCommand::SliderMoved)
    }

    fn press_button(&mut self, target: Target) -> Option<UiCommand> {
        match target {
            Target::StartStop if self.motor_on => Some(UiCommand::Stop),
            Target::StartStop => Some(UiCommand::Start),
            Target::Save | Target::Delete if self.motor_on => Some(UiCommand::Rejected),
            Target::Save => {
                if !self.drawing.fill_in_drawn_distribution() {
                    return None;
                }
                self.saved = true;
                self.redraw.profile = true;
                self.redraw.motor = true;
                Some(UiCommand::Saved)
            }
            Target::Delete => {
                self.drawing.clear();
                self.first_draw = true;
                self.saved = false;
                self.redraw.clear_drawing = true;
                self.redraw.motor = true;
                Some(UiCommand::Deleted)
            }
            _ => None,
        }
    }

    /// Complete the drawn profile for the engine
    ///
    /// Fills skipped columns first. Returns `None` if nothing was drawn.
    pub fn take_profile(&mut self) -> Option<[u8; PROFILE_LEN]> {
        if self.drawing.fill_in_drawn_distribution() && !self.first_draw {
            self.redraw.profile = true;
        }
        self.drawing.values()
    }

    /// Update the motor flag shown on screen
    pub fn set_motor_on(&mut self, on: bool) {
        if self.motor_on != on {
            self.motor_on = on;
            self.redraw.motor = true;
        }
    }

    /// Hand pending repaint work to the renderer
    pub fn take_redraw(&mut self) -> Redraw {
        core::mem::take(&mut self.redraw)
    }

    /// Queue repaint work again after the renderer failed on it
    ///
    /// A lost pen stroke is replaced by a repaint of the whole curve.
    pub fn restore_redraw(&mut self, failed: Redraw) {
        let pending = &mut self.redraw;
        pending.layout |= failed.layout;
        pending.motor |= failed.motor;
        pending.left_bar |= failed.left_bar;
        pending.right_bar |= failed.right_bar;
        pending.clear_drawing |= failed.clear_drawing;
        pending.profile |= failed.profile || failed.pen.is_some();
    }

    /// Hold time per sample selected by the frequency slider
    pub fn time_per_interval_ms(&self) -> u16 {
        let span = (MAX_TIME_MS - MIN_TIME_MS) as f32;
        let faster = (self.left_bar_position.clamp(0.0, 1.0) * span + 0.5) as u16;
        MAX_TIME_MS - faster
    }

    /// Peak voltage selected by the intensity slider
    pub fn max_voltage(&self) -> f32 {
        MIN_VOLT + self.right_bar_position.clamp(0.0, 1.0) * (MAX_VOLT - MIN_VOLT)
    }

    /// Check if the motor is running
    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    /// Check if nothing has been drawn since startup or delete
    pub fn first_draw(&self) -> bool {
        self.first_draw
    }

    /// Check if the drawing is locked by save
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Frequency slider position (0-1)
    pub fn left_bar_position(&self) -> f32 {
        self.left_bar_position
    }

    /// Intensity slider position (0-1)
    pub fn right_bar_position(&self) -> f32 {
        self.right_bar_position
    }

    /// Drawn profile buffer
    pub fn drawing(&self) -> &DrawnProfile {
        &self.drawing
    }

    /// Screen layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}
