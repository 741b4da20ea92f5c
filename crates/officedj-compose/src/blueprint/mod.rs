//! Blueprint building.
//!
//! A blueprint is a pure function of a [`Profile`]: chord voicings come from
//! fixed seventh-chord tables, step patterns from sixteen-step templates,
//! and the few random variations are drawn from a generator seeded with the
//! profile's own seed.

mod genres;
pub mod patterns;

use officedj_spec::{
    Blueprint, Chord, DrumPattern, Fx, Genre, Mix, Mode, Note, PitchClass, Profile, Subdivision,
    Track,
};

use crate::rng::XorShift32;

/// Notes every genre variant draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Seventh chord on the scale root.
    pub chord: Chord,
    /// Bass root; octave 2 for pop, octave 1 otherwise.
    pub root_low: Note,
    /// Bass root one octave up from the techno low root.
    pub root_mid: Note,
    /// Root the lead scale is built from.
    pub lead_root: Note,
}

impl Palette {
    /// The palette for a profile.
    pub fn for_profile(profile: &Profile) -> Self {
        let root = profile.scale_root;
        let low_octave = if profile.genre == Genre::CuteJpop { 2 } else { 1 };
        Self {
            chord: seventh_chord(root, profile.mode),
            root_low: Note::natural(root, low_octave),
            root_mid: Note::natural(root, 2),
            lead_root: Note::natural(root, 4),
        }
    }

    /// The lead scale: seven notes transposed from the lead root.
    pub fn lead_scale(&self, mode: Mode) -> Vec<Note> {
        mode.scale_steps()
            .iter()
            .map(|step| self.lead_root.transpose(*step))
            .collect()
    }
}

/// Seventh chord voicing for a root and mode.
pub fn seventh_chord(root: PitchClass, mode: Mode) -> Chord {
    use PitchClass::*;
    let n = Note::natural;
    let s = Note::sharp;
    let b = Note::flat;

    let notes = match (mode, root) {
        (Mode::Major, C) => [n(C, 4), n(E, 4), n(G, 4), n(B, 4)],
        (Mode::Major, D) => [n(D, 4), s(F, 4), n(A, 4), s(C, 5)],
        (Mode::Major, E) => [n(E, 4), s(G, 4), n(B, 4), s(D, 5)],
        (Mode::Major, F) => [n(F, 4), n(A, 4), n(C, 5), n(E, 5)],
        (Mode::Major, G) => [n(G, 4), n(B, 4), n(D, 5), s(F, 5)],
        (Mode::Major, A) => [n(A, 3), s(C, 4), n(E, 4), s(G, 4)],
        (Mode::Major, B) => [n(B, 3), s(D, 4), s(F, 4), s(A, 4)],
        (Mode::Minor, C) => [n(C, 4), b(E, 4), n(G, 4), b(B, 4)],
        (Mode::Minor, D) => [n(D, 4), n(F, 4), n(A, 4), n(C, 5)],
        (Mode::Minor, E) => [n(E, 4), n(G, 4), n(B, 4), n(D, 5)],
        (Mode::Minor, F) => [n(F, 4), b(A, 4), n(C, 5), b(E, 5)],
        (Mode::Minor, G) => [n(G, 4), b(B, 4), n(D, 5), n(F, 5)],
        (Mode::Minor, A) => [n(A, 3), n(C, 4), n(E, 4), n(G, 4)],
        (Mode::Minor, B) => [n(B, 3), n(D, 4), s(F, 4), n(A, 4)],
    };
    Chord(notes.to_vec())
}

/// The arrangement every genre starts from.
pub fn base_blueprint(palette: &Palette) -> Blueprint {
    let chord = Some(palette.chord.clone());
    let low = Some(palette.root_low);

    Blueprint {
        pad: Track::new(
            vec![chord.clone(), None, chord, None],
            Subdivision::Half,
            Subdivision::Half,
        ),
        bass: Track::new(
            vec![low, None, low, None, low, None, low, None],
            Subdivision::Eighth,
            Subdivision::Sixteenth,
        ),
        drums: DrumPattern {
            subdivision: Subdivision::Sixteenth,
            kick: patterns::steps(&patterns::FOUR_ON_FLOOR),
            snare: patterns::steps(&patterns::BACKBEAT),
            hat: patterns::steps(&patterns::OFFBEAT_HAT),
            open_hat: patterns::filter_steps(&patterns::OFFBEAT_HAT, |i| i % 4 == 2),
        },
        lead: None,
        mix: Mix::from_levels([-10.0, -16.0, -18.0, -20.0, -18.0, -12.0, -20.0]),
        fx: Fx::default(),
    }
}

/// Builds the blueprint for a profile.
///
/// # Arguments
/// * `profile` - The derived profile
///
/// # Returns
/// * A complete blueprint; the same profile always yields the same blueprint
pub fn build_blueprint(profile: &Profile) -> Blueprint {
    let palette = Palette::for_profile(profile);
    let mut rng = XorShift32::new(profile.seed);
    let base = base_blueprint(&palette);

    match profile.genre {
        Genre::BerlinTechno | Genre::BerlinTechnoMoist => {
            genres::techno(base, &palette, profile.genre, &mut rng)
        }
        Genre::PeggyHouse => genres::peggy_house(base, &palette),
        Genre::CuteJpop => genres::cute_jpop(base, &palette, profile.mode, &mut rng),
        Genre::ArenaRock => genres::arena_rock(base, &palette, &mut rng),
        Genre::AltIndieTeen => genres::alt_indie_teen(base, &palette, &mut rng),
    }
}
