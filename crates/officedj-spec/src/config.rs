//! Session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::profile::MIN_BPM;

/// Default render sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default number of bars rendered offline.
pub const DEFAULT_BARS: u32 = 4;

/// Delay before the transport starts after an engine start.
pub const DEFAULT_START_OFFSET_SECONDS: f64 = 0.05;

/// Lowest accepted sample rate.
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest accepted sample rate.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Longest render in bars.
pub const MAX_BARS: u32 = 256;

/// Longest render in samples, a little over three minutes at 44.1 kHz.
pub const MAX_RENDER_SAMPLES: usize = 1 << 23;

/// Length of one 4/4 bar at the slowest tempo.
fn longest_bar_seconds() -> f64 {
    4.0 * 60.0 / MIN_BPM as f64
}

/// Settings for a playback or render session.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Page path used for genre forcing and seeding.
    pub path_hint: String,
    /// Name shown in the rendered code header.
    pub display_name: Option<String>,
    /// Offline render sample rate in Hz.
    pub sample_rate: u32,
    /// Number of bars to render offline.
    pub bars: u32,
    /// Transport start offset in seconds.
    pub start_offset_seconds: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path_hint: String::new(),
            display_name: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bars: DEFAULT_BARS,
            start_offset_seconds: DEFAULT_START_OFFSET_SECONDS,
        }
    }
}

impl SessionConfig {
    /// Parses a config from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> Result<(), SpecError> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(SpecError::invalid_config(
                "sample_rate",
                format!(
                    "must be in [{}, {}], got {}",
                    MIN_SAMPLE_RATE, MAX_SAMPLE_RATE, self.sample_rate
                ),
            ));
        }
        if self.bars == 0 || self.bars > MAX_BARS {
            return Err(SpecError::invalid_config(
                "bars",
                format!("must be in [1, {}], got {}", MAX_BARS, self.bars),
            ));
        }
        let longest = self.bars as f64 * longest_bar_seconds() * self.sample_rate as f64;
        if longest > MAX_RENDER_SAMPLES as f64 {
            return Err(SpecError::invalid_config(
                "bars",
                format!(
                    "{} bars at {} Hz can exceed {} samples",
                    self.bars, self.sample_rate, MAX_RENDER_SAMPLES
                ),
            ));
        }
        if !self.start_offset_seconds.is_finite() || self.start_offset_seconds < 0.0 {
            return Err(SpecError::invalid_config(
                "start_offset_seconds",
                format!("must be a non-negative number, got {}", self.start_offset_seconds),
            ));
        }
        Ok(())
    }

    /// The display name, or `None` when absent or blank.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
