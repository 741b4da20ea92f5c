//! Doctor command implementation
//!
//! Checks that derivation and offline rendering work on this machine.

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use officedj_compose::Arrangement;
use officedj_spec::{validate_blueprint, Genre, SessionConfig};

use crate::commands::render::render_session;

const CHECK_SAMPLE_RATE: u32 = 8_000;

/// Run the doctor command
///
/// Checks:
/// - Version information
/// - Every genre builds a valid blueprint
/// - The offline engine renders the same loop twice
/// - The working directory accepts rendered files
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run() -> Result<ExitCode> {
    println!("{}", "Office DJ Doctor".cyan().bold());
    println!("{}", "================".cyan());
    println!();

    println!("{}", "Versions:".bold());
    println!("  {} officedj-cli v{}", "->".green(), env!("CARGO_PKG_VERSION"));
    println!("  {} officedj-compose v{}", "->".green(), officedj_compose::VERSION);
    println!();

    let checks = [
        ("Genres:", check_genres()),
        ("Offline engine:", check_render()?),
        ("Output:", check_output_dir()),
    ];
    let mut all_ok = true;
    for (title, lines) in checks {
        println!("{}", title.bold());
        for (ok, line) in lines {
            let mark = if ok { "ok".green() } else { "!!".red() };
            println!("  {} {}", mark, line);
            all_ok &= ok;
        }
        println!();
    }

    if all_ok {
        println!("{}", "All checks passed.".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Some checks failed.".red().bold());
        Ok(ExitCode::from(1))
    }
}

type Report = Vec<(bool, String)>;

fn check_genres() -> Report {
    Genre::ALL
        .iter()
        .map(|&genre| {
            let mut profile = Arrangement::compose("", "", 0).profile;
            profile.genre = genre;
            let validation = validate_blueprint(&Arrangement::from_profile(profile).blueprint);
            if validation.is_ok() {
                (true, genre.to_string())
            } else {
                (false, format!("{} ({} violations)", genre, validation.errors.len()))
            }
        })
        .collect()
}

fn check_render() -> Result<Report> {
    let config = SessionConfig {
        path_hint: "/jiwon".to_string(),
        sample_rate: CHECK_SAMPLE_RATE,
        bars: 1,
        ..SessionConfig::default()
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let first = runtime.block_on(render_session("doctor", 0, config.clone()));
    let second = runtime.block_on(render_session("doctor", 0, config));

    let line = match (first, second) {
        (Ok(a), Ok(b)) if a.pcm_hash == b.pcm_hash => {
            (true, format!("deterministic render ({})", &a.pcm_hash[..16]))
        }
        (Ok(_), Ok(_)) => (false, "renders differ between runs".to_string()),
        (Err(e), _) | (_, Err(e)) => (false, format!("render failed: {:#}", e)),
    };
    Ok(vec![line])
}

fn check_output_dir() -> Report {
    let dir = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => return vec![(false, format!("cannot determine current directory: {}", e))],
    };
    let marker = dir.join(".officedj_write_check");
    let line = match std::fs::write(&marker, b"RIFF") {
        Ok(()) => {
            let _ = std::fs::remove_file(&marker);
            (true, format!("{} is writable", dir.display()))
        }
        Err(e) => (false, format!("cannot write to {}: {}", dir.display(), e)),
    };
    vec![line]
}
