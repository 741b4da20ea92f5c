//! Arrangement blueprint: step sequences, mix levels, and effect settings.
//!
//! A blueprint is derived purely from a [`Profile`](crate::Profile) and is
//! handed to both the code renderer and the audio graph builder.

use serde::{Deserialize, Serialize};

use crate::note::{Chord, Note, Subdivision};

/// Number of steps in every drum sequence.
pub const DRUM_STEPS: usize = 16;

/// Mix level that silences a voice.
pub const MUTED_DB: f64 = -99.0;

/// A sequence of events or rests played at a fixed subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track<T> {
    /// Events in order; `None` is a rest.
    pub events: Vec<Option<T>>,
    /// Spacing between consecutive events.
    pub subdivision: Subdivision,
    /// Length each event sounds for.
    pub duration: Subdivision,
}

impl<T> Track<T> {
    /// Creates a track.
    pub fn new(events: Vec<Option<T>>, subdivision: Subdivision, duration: Subdivision) -> Self {
        Self {
            events,
            subdivision,
            duration,
        }
    }

    /// Number of non-rest events.
    pub fn hit_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_some()).count()
    }

    /// Loop length in quarter-note beats.
    pub fn loop_beats(&self) -> f64 {
        self.events.len() as f64 * self.subdivision.beats()
    }
}

/// The optional melodic line.
pub type LeadLine = Track<Note>;

/// Sixteen-step drum grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrumPattern {
    /// Step length, always sixteenth notes.
    pub subdivision: Subdivision,
    /// Kick drum steps.
    pub kick: Vec<bool>,
    /// Snare steps.
    pub snare: Vec<bool>,
    /// Closed hat steps.
    pub hat: Vec<bool>,
    /// Open hat steps.
    pub open_hat: Vec<bool>,
}

impl DrumPattern {
    /// Iterates the four lanes with their voice.
    pub fn lanes(&self) -> [(Voice, &[bool]); 4] {
        [
            (Voice::Kick, self.kick.as_slice()),
            (Voice::Snare, self.snare.as_slice()),
            (Voice::Hat, self.hat.as_slice()),
            (Voice::OpenHat, self.open_hat.as_slice()),
        ]
    }
}

/// A sound source in the arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Voice {
    Kick,
    Snare,
    Hat,
    OpenHat,
    Pad,
    Bass,
    Lead,
}

impl Voice {
    /// All voices in mix order.
    pub const ALL: [Voice; 7] = [
        Voice::Kick,
        Voice::Snare,
        Voice::Hat,
        Voice::OpenHat,
        Voice::Pad,
        Voice::Bass,
        Voice::Lead,
    ];

    /// Returns the voice name as used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Kick => "kick",
            Voice::Snare => "snare",
            Voice::Hat => "hat",
            Voice::OpenHat => "openHat",
            Voice::Pad => "pad",
            Voice::Bass => "bass",
            Voice::Lead => "lead",
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-voice mix levels in decibels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mix {
    pub kick: f64,
    pub snare: f64,
    pub hat: f64,
    pub open_hat: f64,
    pub pad: f64,
    pub bass: f64,
    pub lead: f64,
}

impl Mix {
    /// Builds a mix from levels in `Voice::ALL` order.
    pub const fn from_levels(levels: [f64; 7]) -> Self {
        Self {
            kick: levels[0],
            snare: levels[1],
            hat: levels[2],
            open_hat: levels[3],
            pad: levels[4],
            bass: levels[5],
            lead: levels[6],
        }
    }

    /// Level for a voice.
    pub fn level(&self, voice: Voice) -> f64 {
        match voice {
            Voice::Kick => self.kick,
            Voice::Snare => self.snare,
            Voice::Hat => self.hat,
            Voice::OpenHat => self.open_hat,
            Voice::Pad => self.pad,
            Voice::Bass => self.bass,
            Voice::Lead => self.lead,
        }
    }

    /// True when the voice sits at the muted level or below.
    pub fn is_muted(&self, voice: Voice) -> bool {
        self.level(voice) <= MUTED_DB
    }

    /// Linear gain for a voice; muted voices return 0.
    pub fn gain(&self, voice: Voice) -> f64 {
        if self.is_muted(voice) {
            0.0
        } else {
            10.0_f64.powf(self.level(voice) / 20.0)
        }
    }
}

/// Effect settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fx {
    /// Master lowpass cutoff; `None` leaves the master bus unfiltered.
    pub master_filter_hz: Option<f64>,
    /// Bass distortion amount.
    pub distortion: f64,
    /// Reverb wet mix.
    pub reverb_wet: f64,
    /// Feedback delay wet mix.
    pub delay_wet: f64,
    /// Chorus wet mix; 0 disables the chorus.
    pub chorus_wet: f64,
}

impl Default for Fx {
    fn default() -> Self {
        Self {
            master_filter_hz: None,
            distortion: 0.0,
            reverb_wet: 0.12,
            delay_wet: 0.0,
            chorus_wet: 0.0,
        }
    }
}

/// Complete arrangement description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Sustained chords.
    pub pad: Track<Chord>,
    /// Bass line.
    pub bass: Track<Note>,
    /// Drum grid.
    pub drums: DrumPattern,
    /// Optional melodic line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead: Option<LeadLine>,
    /// Mix levels.
    pub mix: Mix,
    /// Effect settings.
    pub fx: Fx,
}

impl Blueprint {
    /// Parses a blueprint from JSON.
    pub fn from_json(json: &str) -> Result<Self, crate::SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, crate::SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Voices that will actually sound.
    pub fn audible_voices(&self) -> Vec<Voice> {
        Voice::ALL
            .iter()
            .copied()
            .filter(|v| !self.mix.is_muted(*v))
            .filter(|v| *v != Voice::Lead || self.lead.is_some())
            .collect()
    }
}
