//! Analyze command implementation
//!
//! Derives a profile from explanation text and prints it.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use officedj_compose::{render_details, render_summary};
use officedj_spec::{profile_hash, validate_profile, Profile};

use crate::input::InputArgs;

/// Run the analyze command
///
/// # Arguments
/// * `input` - Text, path and generation
/// * `json` - Print machine-readable JSON instead of colored text
///
/// # Returns
/// Exit code: 0 on success, 1 if the derived profile is invalid
pub fn run(input: &InputArgs, json: bool) -> Result<ExitCode> {
    let profile = input.arrangement()?.profile;
    let validation = validate_profile(&profile);

    if json {
        let output = serde_json::json!({
            "profile": profile,
            "profileHash": profile_hash(&profile)?,
            "summary": render_summary(&profile),
            "details": render_details(&profile),
            "ok": validation.is_ok(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_profile(&profile);
        for error in &validation.errors {
            println!("  {} {}", "!!".red(), error);
        }
    }

    Ok(if validation.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Prints a profile as a colored table.
pub fn print_profile(profile: &Profile) {
    println!("{}", "Profile".cyan().bold());
    println!("  {:<10} {}", "genre", profile.genre.to_string().green());
    println!("  {:<10} {}", "bpm", profile.bpm);
    println!("  {:<10} {}", "mode", profile.mode);
    println!("  {:<10} {}", "density", profile.density);
    println!("  {:<10} {}", "swing", profile.swing);
    println!("  {:<10} {}", "root", profile.scale_root.letter());
    println!("  {:<10} {}", "vibe", profile.vibe);
    println!("  {:<10} {}", "seed", profile.seed);
    println!("  {:<10} {}", "generation", profile.generation);
    if profile.words.is_empty() {
        println!("  {:<10} {}", "words", "(none)".dimmed());
    } else {
        println!("  {:<10} {}", "words", profile.words.join(", "));
    }
    println!();
    println!("{}", render_summary(profile));
    println!("{}", render_details(profile).dimmed());
}
