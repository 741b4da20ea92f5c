//! The musical profile derived from a page's explanation text.

use serde::{Deserialize, Serialize};

use crate::genre::{Density, Genre, Mode, Vibe};
use crate::note::PitchClass;

/// Lowest tempo any profile may carry.
pub const MIN_BPM: u16 = 85;

/// Highest tempo any profile may carry.
pub const MAX_BPM: u16 = 180;

/// Upper bound on per-genre swing.
pub const MAX_SWING: f64 = 0.25;

/// Upper bound on the number of sampled keywords.
pub const MAX_WORDS: usize = 6;

/// What the analyzer found in the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Sampled words matching a brightness keyword.
    pub brightness_hits: usize,
    /// Sampled words matching a calm keyword.
    pub calm_hits: usize,
    /// Maximal digit runs in the raw text.
    pub number_count: usize,
    /// Tokens produced by the tokenizer before sampling.
    pub word_count: usize,
}

/// Musical parameters derived from text and path.
///
/// A profile is immutable once derived; remixing produces a new one with a
/// higher `generation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Seed that drove every random draw.
    pub seed: u32,
    /// Remix counter, 0 for the initial derivation.
    #[serde(default)]
    pub generation: u32,
    /// Selected genre.
    pub genre: Genre,
    /// Tempo in beats per minute.
    pub bpm: u16,
    /// Tonal mode.
    pub mode: Mode,
    /// Rhythmic density.
    pub density: Density,
    /// Swing amount in [0, 0.25].
    pub swing: f64,
    /// Scale root.
    pub scale_root: PitchClass,
    /// Display mood.
    pub vibe: Vibe,
    /// Sampled keywords, display only.
    pub words: Vec<String>,
    /// Analyzer counts.
    #[serde(default)]
    pub evidence: Evidence,
}

impl Profile {
    /// Parses a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, crate::SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, crate::SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seconds per quarter-note beat.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Profile {
        Profile {
            seed: 42,
            generation: 0,
            genre: Genre::PeggyHouse,
            bpm: 124,
            mode: Mode::Minor,
            density: Density::Steady,
            swing: 0.18,
            scale_root: PitchClass::F,
            vibe: Vibe::Calm,
            words: vec!["휴식".to_string(), "공간".to_string()],
            evidence: Evidence {
                brightness_hits: 0,
                calm_hits: 1,
                number_count: 2,
                word_count: 5,
            },
        }
    }

    #[test]
    fn test_profile_json_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["scaleRoot"], "F");
        assert_eq!(json["genre"], "peggyHouse");
        assert_eq!(json["evidence"]["calmHits"], 1);
    }

    #[test]
    fn test_profile_json_round_trip() {
        let profile = sample();
        let json = profile.to_json_pretty().unwrap();
        assert_eq!(Profile::from_json(&json).unwrap(), profile);
    }

    #[test]
    fn test_seconds_per_beat() {
        let mut profile = sample();
        profile.bpm = 120;
        assert!((profile.seconds_per_beat() - 0.5).abs() < 1e-12);
    }
}
