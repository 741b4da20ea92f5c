//! CLI command implementations.

pub mod analyze;
pub mod blueprint;
pub mod code;
pub mod doctor;
pub mod render;
