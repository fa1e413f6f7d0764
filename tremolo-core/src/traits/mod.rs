//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod canvas;
pub mod touch;

pub use actuator::VoltageOutput;
pub use canvas::{Canvas, CanvasError, CanvasExt, Color};
pub use touch::{RawTouch, TouchError, TouchPanel};
