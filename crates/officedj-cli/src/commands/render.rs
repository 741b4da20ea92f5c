//! Render command implementation
//!
//! Starts a session on the offline engine and writes the loop as a WAV file.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use officedj_backend_audio::{OfflineEngine, RenderedAudio, Session, StartOutcome};
use officedj_compose::seed_for;
use officedj_spec::SessionConfig;

use crate::input::InputArgs;

/// Render settings after merging the config file and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub config: SessionConfig,
}

impl RenderOptions {
    /// Loads the config file, if any, then applies flag overrides.
    ///
    /// # Arguments
    /// * `config_path` - Optional `SessionConfig` JSON file
    /// * `input` - Text arguments; `--path` overrides the file's path hint
    /// * `bars` - Overrides the file's bar count
    /// * `sample_rate` - Overrides the file's sample rate
    pub fn resolve(
        config_path: Option<&str>,
        input: &InputArgs,
        bars: Option<u32>,
        sample_rate: Option<u32>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => SessionConfig::load(Path::new(path))
                .with_context(|| format!("failed to load config: {}", path))?,
            None => SessionConfig::default(),
        };
        if let Some(path) = &input.path {
            config.path_hint = path.clone();
        }
        if let Some(bars) = bars {
            config.bars = bars;
        }
        if let Some(rate) = sample_rate {
            config.sample_rate = rate;
        }
        config.validate()?;
        Ok(Self { config })
    }
}

/// Derives, plays and renders an arrangement.
///
/// The engine's noise seed is the profile seed, so the same input always
/// renders the same PCM.
pub async fn render_session(
    text: &str,
    generation: u32,
    config: SessionConfig,
) -> Result<RenderedAudio> {
    let seed = seed_for(text, &config.path_hint, generation);
    let engine = OfflineEngine::new(config.sample_rate).with_seed(seed);
    let bars = config.bars;
    let mut session = Session::at_generation(engine, text, config, generation);

    match session.start().await {
        StartOutcome::Started | StartOutcome::AlreadyStarted => {}
        StartOutcome::Unavailable => bail!("offline engine is unavailable"),
        StartOutcome::Failed(err) => {
            return Err(err).context(session.status().unwrap_or("failed to start").to_string());
        }
    }

    Ok(session.engine().render(bars)?)
}

/// Run the render command
///
/// # Arguments
/// * `input` - Text, path and generation
/// * `out` - WAV file to write
/// * `options` - Merged render settings
/// * `json` - Print a JSON report instead of colored text
///
/// # Returns
/// Exit code: 0 on success
pub fn run(input: &InputArgs, out: &str, options: RenderOptions, json: bool) -> Result<ExitCode> {
    let text = input.load_text()?;
    let config = options.config;
    let path_hint = config.path_hint.clone();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to build runtime")?;
    let audio = runtime.block_on(render_session(&text, input.generation, config))?;

    audio
        .write_wav(Path::new(out))
        .with_context(|| format!("failed to write {}", out))?;

    if json {
        let report = serde_json::json!({
            "out": out,
            "pathHint": path_hint,
            "sampleRate": audio.sample_rate,
            "samples": audio.samples.len(),
            "durationSeconds": audio.duration_seconds(),
            "peak": audio.peak(),
            "pcmHash": audio.pcm_hash,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} wrote {} ({:.2}s @ {} Hz)",
            "ok".green(),
            out,
            audio.duration_seconds(),
            audio.sample_rate
        );
        println!("  {:<8} {}", "peak", format!("{:.3}", audio.peak()));
        println!("  {:<8} {}", "pcm", audio.pcm_hash.dimmed());
    }

    Ok(ExitCode::SUCCESS)
}
