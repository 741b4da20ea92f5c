//! Blueprint and profile validation.
//!
//! Checks collect every violation instead of stopping at the first one, so a
//! report can list all of them.

use std::fmt;

use thiserror::Error;

use crate::blueprint::{Blueprint, Voice, DRUM_STEPS, MUTED_DB};
use crate::profile::{Profile, MAX_BPM, MAX_SWING, MAX_WORDS, MIN_BPM};

/// The rule a value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Drum lanes differ in length.
    DrumLength,
    /// A drum lane has no steps.
    EmptyDrumLane,
    /// A pitched track has no events.
    EmptyTrack,
    /// Lead line presence disagrees with the lead mix level.
    LeadMix,
    /// A mix level is outside the allowed decibel range.
    MixRange,
    /// An effect amount is outside [0, 1].
    FxRange,
    /// The master filter cutoff is not a positive frequency.
    FilterCutoff,
    /// The tempo is outside the supported bpm range.
    BpmRange,
    /// Swing is negative or above the maximum amount.
    SwingRange,
    /// The profile keeps more keywords than a summary can show.
    WordCount,
}

impl Rule {
    /// Short code shown in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Rule::DrumLength => "BP01",
            Rule::EmptyDrumLane => "BP02",
            Rule::EmptyTrack => "BP03",
            Rule::LeadMix => "BP04",
            Rule::MixRange => "BP10",
            Rule::FxRange => "BP11",
            Rule::FilterCutoff => "BP12",
            Rule::BpmRange => "PR01",
            Rule::SwingRange => "PR02",
            Rule::WordCount => "PR03",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One broken rule, located by its field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{rule}: {detail} (at {field})")]
pub struct Violation {
    pub rule: Rule,
    /// Dotted field path such as `drums.snare`.
    pub field: String,
    pub detail: String,
}

/// Every violation found in one value.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, rule: Rule, field: impl Into<String>, detail: impl Into<String>) {
        self.errors.push(Violation {
            rule,
            field: field.into(),
            detail: detail.into(),
        });
    }

    /// The violated rules, in the order they were found.
    pub fn rules(&self) -> Vec<Rule> {
        self.errors.iter().map(|v| v.rule).collect()
    }

    /// `Ok` when nothing was violated.
    pub fn into_result(self) -> Result<(), Vec<Violation>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Loudest level a voice may be mixed at.
pub const MAX_MIX_DB: f64 = 0.0;

/// Validates the structural rules of a blueprint.
///
/// # Arguments
/// * `blueprint` - The blueprint to validate
///
/// # Returns
/// * Every violation found; empty when the blueprint is sound.
pub fn validate_blueprint(blueprint: &Blueprint) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_drums(blueprint, &mut result);
    validate_tracks(blueprint, &mut result);
    validate_mix(blueprint, &mut result);
    validate_fx(blueprint, &mut result);

    result
}

/// Validates the numeric ranges of a profile.
pub fn validate_profile(profile: &Profile) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !(MIN_BPM..=MAX_BPM).contains(&profile.bpm) {
        result.push(
            Rule::BpmRange,
            "bpm",
            format!("must be in [{}, {}], got {}", MIN_BPM, MAX_BPM, profile.bpm),
        );
    }
    if !(0.0..=MAX_SWING).contains(&profile.swing) {
        result.push(
            Rule::SwingRange,
            "swing",
            format!("must be in [0, {}], got {}", MAX_SWING, profile.swing),
        );
    }
    if profile.words.len() > MAX_WORDS {
        result.push(
            Rule::WordCount,
            "words",
            format!("at most {} allowed, got {}", MAX_WORDS, profile.words.len()),
        );
    }

    result
}

fn validate_drums(blueprint: &Blueprint, result: &mut ValidationResult) {
    for (voice, steps) in blueprint.drums.lanes() {
        let field = format!("drums.{}", voice);
        if steps.is_empty() {
            result.push(Rule::EmptyDrumLane, field, "no steps");
        } else if steps.len() != DRUM_STEPS {
            result.push(
                Rule::DrumLength,
                field,
                format!("{} steps, expected {}", steps.len(), DRUM_STEPS),
            );
        }
    }
}

fn validate_tracks(blueprint: &Blueprint, result: &mut ValidationResult) {
    let tracks = [
        ("pad.events", blueprint.pad.events.is_empty()),
        ("bass.events", blueprint.bass.events.is_empty()),
    ];
    for (field, empty) in tracks {
        if empty {
            result.push(Rule::EmptyTrack, field, "no events");
        }
    }

    match &blueprint.lead {
        Some(lead) => {
            if lead.events.is_empty() {
                result.push(Rule::EmptyTrack, "lead.events", "no events");
            }
            if blueprint.mix.is_muted(Voice::Lead) {
                result.push(Rule::LeadMix, "mix.lead", "lead line present but muted");
            }
        }
        None if blueprint.mix.lead != MUTED_DB => {
            result.push(
                Rule::LeadMix,
                "mix.lead",
                format!("no lead line, expected {}, got {}", MUTED_DB, blueprint.mix.lead),
            );
        }
        None => {}
    }
}

fn validate_mix(blueprint: &Blueprint, result: &mut ValidationResult) {
    for voice in Voice::ALL {
        let level = blueprint.mix.level(voice);
        if !level.is_finite() || !(MUTED_DB..=MAX_MIX_DB).contains(&level) {
            result.push(
                Rule::MixRange,
                format!("mix.{}", voice),
                format!("must be in [{}, {}] dB, got {}", MUTED_DB, MAX_MIX_DB, level),
            );
        }
    }
}

fn validate_fx(blueprint: &Blueprint, result: &mut ValidationResult) {
    let fx = &blueprint.fx;
    let amounts = [
        ("fx.distortion", fx.distortion),
        ("fx.reverbWet", fx.reverb_wet),
        ("fx.delayWet", fx.delay_wet),
        ("fx.chorusWet", fx.chorus_wet),
    ];
    for (field, value) in amounts {
        if !(0.0..=1.0).contains(&value) {
            result.push(Rule::FxRange, field, format!("must be in [0, 1], got {}", value));
        }
    }

    if let Some(hz) = fx.master_filter_hz {
        if !hz.is_finite() || hz <= 0.0 {
            result.push(
                Rule::FilterCutoff,
                "fx.masterFilterHz",
                format!("must be a positive frequency, got {}", hz),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{DrumPattern, Fx, Mix, Track};
    use crate::genre::{Density, Genre, Mode, Vibe};
    use crate::note::{Chord, Note, PitchClass, Subdivision};
    use crate::profile::Evidence;

    fn blueprint() -> Blueprint {
        let c = Note::natural(PitchClass::C, 4);
        Blueprint {
            pad: Track::new(vec![Some(Chord(vec![c])), None], Subdivision::Half, Subdivision::Half),
            bass: Track::new(vec![Some(c), None], Subdivision::Eighth, Subdivision::Sixteenth),
            drums: DrumPattern {
                subdivision: Subdivision::Sixteenth,
                kick: vec![true; 16],
                snare: vec![false; 16],
                hat: vec![false; 16],
                open_hat: vec![false; 16],
            },
            lead: None,
            mix: Mix::from_levels([-10.0, -16.0, -18.0, -20.0, -18.0, -12.0, MUTED_DB]),
            fx: Fx::default(),
        }
    }

    fn profile() -> Profile {
        Profile {
            seed: 1,
            generation: 0,
            genre: Genre::ArenaRock,
            bpm: 130,
            mode: Mode::Minor,
            density: Density::Steady,
            swing: 0.0,
            scale_root: PitchClass::E,
            vibe: Vibe::Neutral,
            words: Vec::new(),
            evidence: Evidence::default(),
        }
    }

    fn codes(result: &ValidationResult) -> Vec<Rule> {
        result.rules()
    }

    #[test]
    fn test_valid_blueprint() {
        assert!(validate_blueprint(&blueprint()).is_ok());
    }

    #[test]
    fn test_drum_length_mismatch() {
        let mut bp = blueprint();
        bp.drums.snare.truncate(8);
        bp.drums.hat.clear();
        let result = validate_blueprint(&bp);
        assert_eq!(codes(&result), vec![Rule::DrumLength, Rule::EmptyDrumLane]);
        assert_eq!(result.errors[0].field, "drums.snare");
    }

    #[test]
    fn test_unmuted_lead_without_line() {
        let mut bp = blueprint();
        bp.mix.lead = -18.0;
        assert_eq!(codes(&validate_blueprint(&bp)), vec![Rule::LeadMix]);
    }

    #[test]
    fn test_muted_lead_with_line() {
        let mut bp = blueprint();
        bp.lead = Some(bp.bass.clone());
        assert_eq!(codes(&validate_blueprint(&bp)), vec![Rule::LeadMix]);
    }

    #[test]
    fn test_mix_and_fx_ranges() {
        let mut bp = blueprint();
        bp.mix.kick = 3.0;
        bp.fx.reverb_wet = 1.5;
        bp.fx.master_filter_hz = Some(0.0);
        assert_eq!(
            codes(&validate_blueprint(&bp)),
            vec![Rule::MixRange, Rule::FxRange, Rule::FilterCutoff]
        );
    }

    #[test]
    fn test_profile_ranges() {
        assert!(validate_profile(&profile()).is_ok());

        let mut p = profile();
        p.bpm = 200;
        p.swing = 0.3;
        p.words = vec!["ab".to_string(); 7];
        assert_eq!(
            codes(&validate_profile(&p)),
            vec![Rule::BpmRange, Rule::SwingRange, Rule::WordCount]
        );
    }

    #[test]
    fn test_violation_display() {
        let mut bp = blueprint();
        bp.drums.hat.clear();
        let result = validate_blueprint(&bp);
        assert_eq!(result.errors[0].to_string(), "BP02: no steps (at drums.hat)");
        assert!(result.into_result().is_err());
    }
}
