//! TFT display panels

pub mod ili9341;

pub use ili9341::{DisplayError, Ili9341};
