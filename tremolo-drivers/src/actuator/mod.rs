//! Actuator output stages

pub mod erm;

pub use erm::ErmDrive;
