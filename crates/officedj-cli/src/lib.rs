//! Office DJ CLI library.
//!
//! Input loading and the command implementations behind the `officedj`
//! binary.

pub mod commands;
pub mod input;
