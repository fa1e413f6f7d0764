//! Main controller coordinating touch input, playback and the actuator
//!
//! The controller owns every piece of mutable state and runs the fixed
//! step list once per loop iteration:
//!
//! 1. [`Step::Touch`]: sample the panel, feed the UI, apply its command
//!    and repaint whatever changed
//! 2. [`Step::Profile`]: advance playback and pick the target voltage
//! 3. [`Step::Voltage`]: hand the target to the PWM output
//!
//! Nothing here blocks or fails hard. Collaborator errors degrade to "no
//! touch", a skipped frame or 0 V.

use crate::config::{Layout, TouchCalibration};
use crate::profile::{ForceDistribution, ForceError};
use crate::traits::{Canvas, TouchPanel, VoltageOutput};
use crate::ui::{render, to_screen, UiCommand, UiState};

/// One unit of work in the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Touch sampling, UI update and repaint
    Touch,
    /// Force playback
    Profile,
    /// PWM output
    Voltage,
}

/// Order in which the steps run every iteration
pub const STEP_ORDER: [Step; 3] = [Step::Touch, Step::Profile, Step::Voltage];

/// Notable outcome of a tick, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerEvent {
    /// Profile loaded and playback started
    Started,
    /// Start requested but the profile could not be loaded
    StartFailed(ForceError),
    /// Stopped by the user
    Stopped,
    /// Playback reached the end and the motor was switched off
    Finished,
    /// Drawing locked
    Saved,
    /// Drawing cleared
    Deleted,
    /// Save or delete pressed while running
    Rejected,
}

/// Controller state
pub struct Controller {
    engine: ForceDistribution,
    ui: UiState,
    calibration: TouchCalibration,
    /// Voltage the PWM step synthesizes
    target_voltage: f32,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Layout::default(), TouchCalibration::default())
    }
}

impl Controller {
    /// Create a controller with the motor off and nothing drawn
    pub fn new(layout: Layout, calibration: TouchCalibration) -> Self {
        Self {
            engine: ForceDistribution::new(),
            ui: UiState::new(layout),
            calibration,
            target_voltage: 0.0,
        }
    }

    /// Run every step once
    pub fn tick<T, C, V>(
        &mut self,
        now_ms: u32,
        touch: &mut T,
        canvas: &mut C,
        output: &mut V,
    ) -> Option<ControllerEvent>
    where
        T: TouchPanel + ?Sized,
        C: Canvas + ?Sized,
        V: VoltageOutput + ?Sized,
    {
        let mut event = None;
        for step in STEP_ORDER {
            match step {
                Step::Touch => event = self.touch_step(now_ms, touch, canvas).or(event),
                Step::Profile => event = self.profile_step(now_ms).or(event),
                Step::Voltage => {
                    // A rejected target leaves the outputs where they were
                    let _ = output.set_voltage(now_ms, self.target_voltage);
                }
            }
        }
        event
    }

    fn touch_step<T, C>(&mut self, now_ms: u32, touch: &mut T, canvas: &mut C) -> Option<ControllerEvent>
    where
        T: TouchPanel + ?Sized,
        C: Canvas + ?Sized,
    {
        let point = touch
            .read_touch_point()
            .ok()
            .and_then(|raw| to_screen(raw, &self.calibration));

        let event = self.ui.update(now_ms, point).and_then(|cmd| self.apply(cmd));

        let redraw = self.ui.take_redraw();
        if !redraw.is_empty() && render(&self.ui, &redraw, canvas).is_err() {
            self.ui.restore_redraw(redraw);
        }
        event
    }

    fn apply(&mut self, command: UiCommand) -> Option<ControllerEvent> {
        match command {
            UiCommand::Start => Some(match self.start() {
                Ok(()) => ControllerEvent::Started,
                Err(e) => ControllerEvent::StartFailed(e),
            }),
            UiCommand::Stop => {
                self.stop();
                Some(ControllerEvent::Stopped)
            }
            UiCommand::Saved => Some(ControllerEvent::Saved),
            UiCommand::Deleted => Some(ControllerEvent::Deleted),
            UiCommand::Rejected => Some(ControllerEvent::Rejected),
            UiCommand::SliderMoved => None,
        }
    }

    /// Load the drawn profile with the current slider settings and start
    ///
    /// The motor stays off if any part fails.
    pub fn start(&mut self) -> Result<(), ForceError> {
        let profile = self.ui.take_profile().ok_or(ForceError::EmptyProfile)?;

        self.engine.set_max_voltage(self.ui.max_voltage())?;
        self.engine.set_time_per_interval(self.ui.time_per_interval_ms())?;
        self.engine.set_distribution(&profile)?;
        self.engine.restart_forcing()?;

        self.ui.set_motor_on(true);
        Ok(())
    }

    /// Switch the motor off
    pub fn stop(&mut self) {
        self.ui.set_motor_on(false);
        self.target_voltage = 0.0;
    }

    fn profile_step(&mut self, now_ms: u32) -> Option<ControllerEvent> {
        if !self.ui.motor_on() {
            self.target_voltage = 0.0;
            return None;
        }

        self.target_voltage = self.engine.step(now_ms).unwrap_or(0.0);

        if !self.engine.is_loaded() || self.engine.is_complete() {
            self.stop();
            return Some(ControllerEvent::Finished);
        }
        None
    }

    /// Force profile engine
    pub fn engine(&self) -> &ForceDistribution {
        &self.engine
    }

    /// UI state
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Voltage handed to the output on the last tick
    pub fn target_voltage(&self) -> f32 {
        self.target_voltage
    }

    /// Check if playback is running
    pub fn motor_on(&self) -> bool {
        self.ui.motor_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BUTTON_TIME_MS;
    use crate::traits::{CanvasError, Color, RawTouch, TouchError};
    use crate::ui::Target;

    /// Panel that reports whatever point the test sets
    struct FakeTouch {
        point: Option<(u16, u16)>,
        fail: bool,
    }

    impl FakeTouch {
        fn new() -> Self {
            Self { point: None, fail: false }
        }
    }

    impl TouchPanel for FakeTouch {
        fn read_touch_point(&mut self) -> Result<RawTouch, TouchError> {
            if self.fail {
                return Err(TouchError::Bus);
            }
            Ok(match self.point {
                Some((x, y)) => RawTouch { x, y, pressure: 300 },
                None => RawTouch::default(),
            })
        }
    }

    /// Canvas that accepts everything unless told to fail
    struct NullCanvas {
        calls: u32,
        fail: bool,
    }

    impl NullCanvas {
        fn record(&mut self) -> Result<(), CanvasError> {
            self.calls += 1;
            if self.fail {
                return Err(CanvasError::Bus);
            }
            Ok(())
        }
    }

    impl Canvas for NullCanvas {
        fn draw_pixel(&mut self, _x: u16, _y: u16, _color: Color) -> Result<(), CanvasError> {
            self.record()
        }

        fn fill_rect(&mut self, _x: u16, _y: u16, _w: u16, _h: u16, _color: Color) -> Result<(), CanvasError> {
            self.record()
        }

        fn draw_text(&mut self, _x: u16, _y: u16, _text: &str, _color: Color) -> Result<(), CanvasError> {
            self.record()
        }
    }

    struct FakeOutput {
        volts: f32,
        writes: u32,
    }

    impl VoltageOutput for FakeOutput {
        fn set_voltage(&mut self, _now_ms: u32, volts: f32) -> bool {
            self.writes += 1;
            self.volts = volts;
            volts.is_finite()
        }

        fn voltage(&self) -> f32 {
            self.volts
        }
    }

    /// Raw readings equal screen pixels
    fn identity() -> TouchCalibration {
        TouchCalibration {
            raw_x_min: 0,
            raw_x_max: 319,
            raw_y_min: 0,
            raw_y_max: 239,
            swap_xy: false,
            invert_x: false,
            invert_y: false,
        }
    }

    struct Rig {
        ctl: Controller,
        touch: FakeTouch,
        canvas: NullCanvas,
        output: FakeOutput,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                ctl: Controller::new(Layout::default(), identity()),
                touch: FakeTouch::new(),
                canvas: NullCanvas { calls: 0, fail: false },
                output: FakeOutput { volts: 0.0, writes: 0 },
            }
        }

        fn tick(&mut self, now: u32, point: Option<(u16, u16)>) -> Option<ControllerEvent> {
            self.touch.point = point;
            self.ctl
                .tick(now, &mut self.touch, &mut self.canvas, &mut self.output)
        }

        fn center(&self, target: Target) -> (u16, u16) {
            let r = self.ctl.ui().layout().rect(target);
            (r.x + r.w / 2, r.y + r.h / 2)
        }

        /// Draw a flat line at `power` and lift
        fn draw_flat(&mut self, now: u32, power: u8) {
            let layout = *self.ctl.ui().layout();
            let y = layout.power_row(power);
            self.tick(now, Some((layout.draw_area.x + 10, y)));
            self.tick(now + 1, None);
        }

        /// Hold start/stop long enough to fire
        fn press_start_stop(&mut self, now: u32) -> Option<ControllerEvent> {
            let p = self.center(Target::StartStop);
            self.tick(now, Some(p));
            let event = self.tick(now + BUTTON_TIME_MS, Some(p));
            self.tick(now + BUTTON_TIME_MS + 1, None);
            event
        }
    }

    #[test]
    fn test_step_order() {
        assert_eq!(STEP_ORDER, [Step::Touch, Step::Profile, Step::Voltage]);
    }

    #[test]
    fn test_idle_outputs_zero() {
        let mut rig = Rig::new();
        assert_eq!(rig.tick(0, None), None);
        assert_eq!(rig.output.volts, 0.0);
        assert_eq!(rig.output.writes, 1);
        // First frame paints the layout
        assert!(rig.canvas.calls > 0);
    }

    #[test]
    fn test_failed_render_is_retried() {
        let mut rig = Rig::new();
        rig.canvas.fail = true;
        rig.tick(0, None);
        assert_eq!(rig.canvas.calls, 1);

        // The layout is still pending and goes out once the bus recovers
        rig.canvas.fail = false;
        rig.tick(1, None);
        assert!(rig.canvas.calls > 2);

        let calls = rig.canvas.calls;
        rig.tick(2, None);
        assert_eq!(rig.canvas.calls, calls);
    }

    #[test]
    fn test_start_without_profile_fails() {
        let mut rig = Rig::new();
        let event = rig.press_start_stop(0);

        assert_eq!(event, Some(ControllerEvent::StartFailed(ForceError::EmptyProfile)));
        assert!(!rig.ctl.motor_on());
        assert_eq!(rig.ctl.target_voltage(), 0.0);
        assert!(!rig.ctl.engine().is_loaded());
    }

    #[test]
    fn test_playback_runs_to_completion() {
        let mut rig = Rig::new();
        rig.draw_flat(0, 50);

        let p = rig.center(Target::StartStop);
        rig.tick(10, Some(p));
        assert_eq!(rig.tick(10 + BUTTON_TIME_MS, Some(p)), Some(ControllerEvent::Started));
        assert!(rig.ctl.motor_on());
        assert_eq!(rig.output.volts, 3.5);
        assert_eq!(rig.ctl.engine().time_per_interval(), 55);

        let mut now = 10 + BUTTON_TIME_MS;
        let mut finished = false;
        for _ in 0..400 {
            now += 55;
            if rig.tick(now, None) == Some(ControllerEvent::Finished) {
                finished = true;
                break;
            }
            assert_eq!(rig.output.volts, 3.5);
        }

        assert!(finished);
        assert!(!rig.ctl.motor_on());
        assert_eq!(rig.output.volts, 0.0);
    }

    #[test]
    fn test_stop_zeroes_output() {
        let mut rig = Rig::new();
        rig.draw_flat(0, 100);

        assert_eq!(rig.press_start_stop(10), Some(ControllerEvent::Started));
        assert_eq!(rig.output.volts, 7.0);

        assert_eq!(rig.press_start_stop(1000), Some(ControllerEvent::Stopped));
        assert!(!rig.ctl.motor_on());
        assert_eq!(rig.output.volts, 0.0);

        rig.tick(2000, None);
        assert_eq!(rig.output.volts, 0.0);
    }

    #[test]
    fn test_edit_rejected_while_running() {
        let mut rig = Rig::new();
        rig.draw_flat(0, 30);
        rig.press_start_stop(10);

        let save = rig.center(Target::Save);
        rig.tick(500, Some(save));
        assert_eq!(rig.tick(500 + BUTTON_TIME_MS, Some(save)), Some(ControllerEvent::Rejected));
        assert!(rig.ctl.motor_on());
        assert!(!rig.ctl.ui().is_saved());
    }

    #[test]
    fn test_touch_errors_are_noise() {
        let mut rig = Rig::new();
        rig.touch.fail = true;
        let p = rig.center(Target::StartStop);

        rig.tick(0, Some(p));
        assert_eq!(rig.tick(BUTTON_TIME_MS, Some(p)), None);
        assert!(!rig.ctl.motor_on());
    }

    #[test]
    fn test_slider_settings_reach_engine() {
        let mut rig = Rig::new();
        rig.draw_flat(0, 100);

        let track = rig.ctl.ui().layout().right_bar;
        let top = (track.x + 2, track.y);
        rig.tick(10, Some(top));
        rig.tick(40, Some(top));
        rig.tick(41, None);

        assert_eq!(rig.press_start_stop(100), Some(ControllerEvent::Started));
        assert_eq!(rig.ctl.engine().max_voltage(), 9.0);
        assert_eq!(rig.output.volts, 9.0);
    }
}
