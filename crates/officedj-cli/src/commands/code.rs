//! Code command implementation
//!
//! Renders the code block shown next to the player.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::input::InputArgs;

/// Run the code command
///
/// # Arguments
/// * `input` - Text, path and generation
/// * `name` - Display name for the header; blank falls back to the default
/// * `out` - File to write; stdout when `None`
///
/// # Returns
/// Exit code: 0 on success
pub fn run(input: &InputArgs, name: Option<&str>, out: Option<&str>) -> Result<ExitCode> {
    let arrangement = input.arrangement()?;
    let code = arrangement.code(name);

    match out {
        Some(path) => {
            fs::write(path, &code).with_context(|| format!("failed to write {}", path))?;
            eprintln!("{} wrote {}", "ok".green(), path);
        }
        None => print!("{}", code),
    }

    Ok(ExitCode::SUCCESS)
}
