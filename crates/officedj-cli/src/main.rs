//! Office DJ CLI - derive and render loops from page text
//!
//! This binary exposes the derivation pipeline (profile, blueprint, code)
//! and the offline renderer.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use officedj_cli::commands;
use officedj_cli::commands::render::RenderOptions;
use officedj_cli::input::InputArgs;

/// Office DJ - procedural loops from explanation text
#[derive(Parser)]
#[command(name = "officedj")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a profile from explanation text
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Build and validate the blueprint for a profile
    Blueprint {
        #[command(flatten)]
        input: InputArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the code block shown next to the player
    Code {
        #[command(flatten)]
        input: InputArgs,

        /// Display name for the header
        #[arg(short, long)]
        name: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Render the loop to a WAV file with the offline engine
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output WAV file
        #[arg(short, long)]
        out: String,

        /// Number of bars to render
        #[arg(short, long)]
        bars: Option<u32>,

        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Session config file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Output a machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check that derivation and rendering work
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { input, json } => commands::analyze::run(&input, json),
        Commands::Blueprint { input, json } => commands::blueprint::run(&input, json),
        Commands::Code { input, name, out } => {
            commands::code::run(&input, name.as_deref(), out.as_deref())
        }
        Commands::Render {
            input,
            out,
            bars,
            sample_rate,
            config,
            json,
        } => RenderOptions::resolve(config.as_deref(), &input, bars, sample_rate)
            .and_then(|options| commands::render::run(&input, &out, options, json)),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
