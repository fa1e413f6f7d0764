//! Configuration
//!
//! Compile-time limits plus the geometry and calibration structures the
//! UI is built from.

pub mod limits;
pub mod types;

pub use limits::*;
pub use types::*;
