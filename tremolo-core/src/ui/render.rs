//! Screen rendering
//!
//! Paints [`UiState`] onto a [`Canvas`]. Only the parts flagged in
//! [`Redraw`] are touched, so a frame with no input costs nothing.
//!
//! # Usage
//!
//! ```ignore
//! let redraw = ui.take_redraw();
//! if !redraw.is_empty() {
//!     let _ = render(&ui, &redraw, &mut display);
//! }
//! ```

use super::layout::slider_row;
use super::machine::{PenStroke, Redraw, UiState};
use crate::config::{Rect, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::traits::{Canvas, CanvasError, CanvasExt, Color};

const BACKGROUND: Color = Color::WHITE;
const PEN: Color = Color::BLUE;
const CURVE: Color = Color::CYAN;
const KNOB: Color = Color::BLUE;
const RAIL: Color = Color::DARK_GRAY;

/// Font cell of the canvas text
const CHAR_W: u16 = 6;
const CHAR_H: u16 = 10;

const HINT: &str = "DRAW HERE";

/// Paint everything flagged in `redraw`
pub fn render<C: Canvas + ?Sized>(
    ui: &UiState,
    redraw: &Redraw,
    canvas: &mut C,
) -> Result<(), CanvasError> {
    if redraw.layout {
        return screen_setup(ui, canvas);
    }

    let layout = ui.layout();

    if redraw.clear_drawing {
        clear_drawing(ui, canvas)?;
    }
    if redraw.profile {
        draw_profile(ui, canvas)?;
    } else if let Some(stroke) = redraw.pen {
        draw_pen(layout.draw_area, stroke, canvas)?;
    }
    if redraw.left_bar {
        draw_slider(layout.left_bar, ui.left_bar_position(), canvas)?;
    }
    if redraw.right_bar {
        draw_slider(layout.right_bar, ui.right_bar_position(), canvas)?;
    }
    if redraw.motor {
        draw_buttons(ui, canvas)?;
    }
    Ok(())
}

/// Paint the complete screen
pub fn screen_setup<C: Canvas + ?Sized>(ui: &UiState, canvas: &mut C) -> Result<(), CanvasError> {
    let layout = ui.layout();
    let area = layout.draw_area;

    canvas.fill_rect(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, BACKGROUND)?;
    canvas.draw_rect(
        area.x.saturating_sub(1),
        area.y.saturating_sub(1),
        area.w + 2,
        area.h + 2,
        Color::BLACK,
    )?;

    label_above(layout.left_bar, "FREQ", canvas)?;
    label_above(layout.right_bar, "POWER", canvas)?;
    draw_slider(layout.left_bar, ui.left_bar_position(), canvas)?;
    draw_slider(layout.right_bar, ui.right_bar_position(), canvas)?;
    draw_buttons(ui, canvas)?;

    if ui.first_draw() {
        draw_hint(area, canvas)
    } else {
        draw_profile(ui, canvas)
    }
}

fn label_above<C: Canvas + ?Sized>(track: Rect, text: &str, canvas: &mut C) -> Result<(), CanvasError> {
    let text_w = text.len() as u16 * CHAR_W;
    let x = (track.x + track.w / 2).saturating_sub(text_w / 2);
    let y = track.y.saturating_sub(CHAR_H + 6);
    canvas.draw_text(x, y, text, Color::BLACK)
}

fn draw_hint<C: Canvas + ?Sized>(area: Rect, canvas: &mut C) -> Result<(), CanvasError> {
    let text_w = HINT.len() as u16 * CHAR_W;
    let x = area.x + area.w.saturating_sub(text_w) / 2;
    let y = area.y + area.h.saturating_sub(CHAR_H) / 2;
    canvas.draw_text(x, y, HINT, Color::DARK_GRAY)
}

/// Slider rail with its knob
///
/// The knob overhangs the track by 2 px on each side and 3 px vertically,
/// so the whole padded box is cleared first.
fn draw_slider<C: Canvas + ?Sized>(track: Rect, position: f32, canvas: &mut C) -> Result<(), CanvasError> {
    let left = track.x.saturating_sub(2);
    let top = track.y.saturating_sub(3);
    canvas.fill_rect(left, top, track.w + 4, track.h + 6, BACKGROUND)?;
    canvas.fill_rect(track.x + track.w / 2 - 2, track.y, 4, track.h, RAIL)?;

    let row = slider_row(track, position);
    canvas.fill_rect(left, row.saturating_sub(3), track.w + 4, 7, KNOB)
}

/// Start/stop label and save/delete availability
fn draw_buttons<C: Canvas + ?Sized>(ui: &UiState, canvas: &mut C) -> Result<(), CanvasError> {
    let layout = ui.layout();

    let (label, fill) = if ui.motor_on() {
        ("STOP", Color::LIGHT_RED)
    } else {
        ("START", Color::LIGHT_GREEN)
    };
    button(canvas, layout.start_stop, label, fill)?;

    // Greyed out while running
    let edit = if ui.motor_on() {
        Color::DARK_GRAY
    } else {
        Color::LIGHT_GRAY
    };
    let save = if ui.is_saved() { "SAVED" } else { "SAVE" };
    button(canvas, layout.save, save, edit)?;
    button(canvas, layout.delete, "DELETE", edit)
}

fn button<C: Canvas + ?Sized>(canvas: &mut C, rect: Rect, label: &str, fill: Color) -> Result<(), CanvasError> {
    canvas.draw_button(rect.x, rect.y, rect.w, rect.h, label, fill)
}

/// Wipe the drawing area, restoring the hint after a delete
fn clear_drawing<C: Canvas + ?Sized>(ui: &UiState, canvas: &mut C) -> Result<(), CanvasError> {
    let area = ui.layout().draw_area;
    canvas.fill_rect(area.x, area.y, area.w, area.h, BACKGROUND)?;
    if ui.first_draw() {
        draw_hint(area, canvas)?;
    }
    Ok(())
}

/// Pen dot, joined vertically to the previous point of the stroke
fn draw_pen<C: Canvas + ?Sized>(area: Rect, stroke: PenStroke, canvas: &mut C) -> Result<(), CanvasError> {
    let to = stroke.to;
    if !area.contains(to.x, to.y) {
        return Ok(());
    }

    if let Some(from) = stroke.from {
        if from.x != to.x {
            let top = from.y.min(to.y).max(area.y);
            let bottom = from.y.max(to.y).min(area.bottom());
            canvas.vline(to.x, top, bottom - top + 1, PEN)?;
        }
    }

    let w = if to.x < area.right() { 2 } else { 1 };
    let h = if to.y < area.bottom() { 2 } else { 1 };
    canvas.fill_rect(to.x, to.y, w, h, PEN)
}

/// Filled curve of the drawn profile
fn draw_profile<C: Canvas + ?Sized>(ui: &UiState, canvas: &mut C) -> Result<(), CanvasError> {
    let layout = ui.layout();
    let area = layout.draw_area;
    canvas.fill_rect(area.x, area.y, area.w, area.h, BACKGROUND)?;

    for (column, value) in ui.drawing().columns().iter().enumerate() {
        let Some(power) = *value else {
            continue;
        };
        let x = area.x + column as u16;
        let y = layout.power_row(power);
        canvas.vline(x, y, area.bottom() - y + 1, CURVE)?;
        canvas.draw_pixel(x, y, PEN)?;
    }
    Ok(())
}
