//! Tremolo - Drawn-Profile Vibration Actuator Firmware
//!
//! Main firmware binary for the RP2040. The user draws a force curve on the
//! touch screen; pressing start plays it back through an ERM motor, scaled
//! by the intensity slider and stretched by the frequency slider.
//!
//! Everything runs in one cooperative polling loop. Each iteration samples
//! the touch panel, advances playback and updates the software PWM, then
//! yields so the executor can run the time driver.

#![no_std]
#![no_main]

use core::fmt;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_time::Instant;
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use tremolo_core::controller::{Controller, ControllerEvent};
use tremolo_core::profile::ForceDistribution;

mod board;

use board::Board;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Tremolo firmware starting...");

    let p = embassy_rp::init(Default::default());
    let mut board = Board::new(p);
    info!("Peripherals initialized");

    match board.init_display() {
        Ok(()) => info!("Display initialized"),
        Err(e) => warn!("Display init failed: {}", e),
    }

    let mut controller = Controller::default();
    info!("Entering control loop");

    loop {
        let now_ms = Instant::now().as_millis() as u32;
        if let Some(event) = controller.tick(now_ms, &mut board.touch, &mut board.display, &mut board.motor) {
            log_event(&controller, event);
        }
        yield_now().await;
    }
}

fn log_event(controller: &Controller, event: ControllerEvent) {
    match event {
        ControllerEvent::Started => {
            let engine = controller.engine();
            info!(
                "Playback started: {} steps, {} V peak, {} ms per sample",
                engine.len(),
                engine.max_voltage(),
                engine.time_per_interval()
            );
            dump_sequence(engine);
        }
        ControllerEvent::StartFailed(e) => warn!("Start rejected: {}", e),
        ControllerEvent::Stopped => info!("Playback stopped"),
        ControllerEvent::Finished => info!("Playback finished"),
        ControllerEvent::Saved => info!("Profile saved"),
        ControllerEvent::Deleted => info!("Profile deleted"),
        ControllerEvent::Rejected => warn!("Stop the motor before saving or deleting"),
    }
}

/// Log the loaded sequence line by line at debug level
fn dump_sequence(engine: &ForceDistribution) {
    let mut lines = LineLog::new();
    if engine.print_list(&mut lines).is_err() {
        warn!("Sequence dump truncated");
    }
}

/// `fmt::Write` sink that emits one defmt record per line
struct LineLog {
    line: String<48>,
}

impl LineLog {
    fn new() -> Self {
        Self { line: String::new() }
    }
}

impl fmt::Write for LineLog {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                debug!("{}", self.line.as_str());
                self.line.clear();
            } else {
                self.line.push(c).map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}
