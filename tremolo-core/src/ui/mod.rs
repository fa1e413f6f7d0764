//! Touch UI
//!
//! Everything between the touch controller and the force engine: noise
//! filtering, hit testing, press debouncing, the drawn profile buffer and
//! the screen renderer.

pub mod debounce;
pub mod drawing;
pub mod events;
pub mod layout;
pub mod machine;
pub mod render;
pub mod touch;

pub use debounce::PushTimer;
pub use drawing::DrawnProfile;
pub use events::UiCommand;
pub use layout::{slider_position, slider_row, Target};
pub use machine::{PenStroke, Redraw, UiState};
pub use render::{render, screen_setup};
pub use touch::{pressure_valid, to_screen, TouchPoint};
