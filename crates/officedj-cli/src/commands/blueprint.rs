//! Blueprint command implementation
//!
//! Builds the blueprint for a derived profile, validates it and prints it.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use officedj_compose::blueprint::patterns::step_string;
use officedj_spec::{blueprint_hash, validate_blueprint, Blueprint, Voice};

use crate::commands::analyze::print_profile;
use crate::input::InputArgs;

/// Run the blueprint command
///
/// # Arguments
/// * `input` - Text, path and generation
/// * `json` - Print machine-readable JSON instead of colored text
///
/// # Returns
/// Exit code: 0 if the blueprint is valid, 1 otherwise
pub fn run(input: &InputArgs, json: bool) -> Result<ExitCode> {
    let arrangement = input.arrangement()?;
    let validation = validate_blueprint(&arrangement.blueprint);

    if json {
        let errors: Vec<String> = validation.errors.iter().map(|e| e.to_string()).collect();
        let output = serde_json::json!({
            "profile": arrangement.profile,
            "blueprint": arrangement.blueprint,
            "blueprintHash": blueprint_hash(&arrangement.blueprint)?,
            "ok": validation.is_ok(),
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_profile(&arrangement.profile);
        println!();
        print_blueprint(&arrangement.blueprint);
        println!();
        if validation.is_ok() {
            println!("{} blueprint is valid", "ok".green());
        } else {
            for error in &validation.errors {
                println!("  {} {}", "!!".red(), error);
            }
        }
    }

    Ok(if validation.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_blueprint(blueprint: &Blueprint) {
    println!("{}", "Drums".cyan().bold());
    for (voice, steps) in blueprint.drums.lanes() {
        println!("  {:<8} {}", voice.to_string(), step_string(steps));
    }
    println!();

    println!("{}", "Tracks".cyan().bold());
    println!(
        "  {:<8} {} chords @ {}",
        "pad",
        blueprint.pad.hit_count(),
        blueprint.pad.subdivision
    );
    println!(
        "  {:<8} {} notes @ {}",
        "bass",
        blueprint.bass.hit_count(),
        blueprint.bass.subdivision
    );
    match &blueprint.lead {
        Some(lead) => println!(
            "  {:<8} {} notes @ {}",
            "lead",
            lead.hit_count(),
            lead.subdivision
        ),
        None => println!("  {:<8} {}", "lead", "none".dimmed()),
    }
    println!();

    println!("{}", "Mix".cyan().bold());
    for voice in Voice::ALL {
        let level = if blueprint.mix.is_muted(voice) {
            "muted".dimmed().to_string()
        } else {
            format!("{} dB", blueprint.mix.level(voice))
        };
        println!("  {:<8} {}", voice.to_string(), level);
    }
    println!();

    let fx = &blueprint.fx;
    println!("{}", "Fx".cyan().bold());
    match fx.master_filter_hz {
        Some(hz) => println!("  {:<8} {} Hz", "filter", hz),
        None => println!("  {:<8} {}", "filter", "off".dimmed()),
    }
    println!("  {:<8} {}", "dist", fx.distortion);
    println!("  {:<8} {}", "reverb", fx.reverb_wet);
    println!("  {:<8} {}", "delay", fx.delay_wet);
    println!("  {:<8} {}", "chorus", fx.chorus_wet);
}
