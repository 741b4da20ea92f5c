//! Per-genre arrangement overrides.
//!
//! Each function replaces the parts of the base blueprint its genre
//! changes. Random draws happen in the order written here.

use officedj_spec::{Blueprint, Chord, Genre, Mix, Mode, Note, Subdivision, Track, MUTED_DB};

use super::patterns::{self, BACKBEAT, EIGHTH_HAT, OFFBEAT_HAT};
use super::Palette;
use crate::rng::{pick, UnitRng};

/// `count` repetitions of a chord followed by a rest.
fn alternate(chord: &Chord, count: usize) -> Vec<Option<Chord>> {
    (0..count).flat_map(|_| [Some(chord.clone()), None]).collect()
}

pub(super) fn techno<R: UnitRng + ?Sized>(
    mut bp: Blueprint,
    palette: &Palette,
    genre: Genre,
    rng: &mut R,
) -> Blueprint {
    let low = Some(palette.root_low);
    let mid = Some(palette.root_mid);
    let moist = genre == Genre::BerlinTechnoMoist;

    bp.pad = Track::new(
        alternate(&palette.chord, 4),
        Subdivision::Quarter,
        Subdivision::Eighth,
    );

    let mut line = [low, None].repeat(8);
    line[8] = mid;
    bp.bass = Track::new(line, Subdivision::Sixteenth, Subdivision::Sixteenth);

    bp.drums.kick = patterns::steps(&patterns::FOUR_ON_FLOOR);
    bp.drums.snare = patterns::thin(&BACKBEAT, 0.5, rng);
    bp.drums.hat = patterns::steps(&EIGHTH_HAT);
    bp.drums.open_hat = patterns::steps(&OFFBEAT_HAT);

    bp.mix = Mix::from_levels([-10.0, -18.0, -22.0, -18.0, -22.0, -12.0, MUTED_DB]);
    bp.fx.master_filter_hz = Some(if moist { 1400.0 } else { 2400.0 });
    bp.fx.distortion = if moist { 0.05 } else { 0.12 };
    bp.fx.reverb_wet = if moist { 0.35 } else { 0.10 };
    bp.fx.delay_wet = if moist { 0.08 } else { 0.0 };
    bp
}

pub(super) fn peggy_house(mut bp: Blueprint, palette: &Palette) -> Blueprint {
    let low = Some(palette.root_low);

    bp.pad = Track::new(
        alternate(&palette.chord, 4),
        Subdivision::Quarter,
        Subdivision::Eighth,
    );
    bp.drums.kick = patterns::steps(&patterns::FOUR_ON_FLOOR);
    bp.drums.snare = patterns::steps(&BACKBEAT);
    bp.drums.hat = patterns::steps(&EIGHTH_HAT);
    bp.drums.open_hat = patterns::steps(&OFFBEAT_HAT);

    let half_bar = [low, None, low, None, low, None, None, low];
    bp.bass = Track::new(half_bar.repeat(2), Subdivision::Sixteenth, Subdivision::Sixteenth);

    bp.mix = Mix::from_levels([-11.0, -16.0, -22.0, -18.0, -22.0, -13.0, MUTED_DB]);
    bp.fx.master_filter_hz = Some(5200.0);
    bp.fx.distortion = 0.06;
    bp.fx.reverb_wet = 0.14;
    bp
}

pub(super) fn cute_jpop<R: UnitRng + ?Sized>(
    mut bp: Blueprint,
    palette: &Palette,
    mode: Mode,
    rng: &mut R,
) -> Blueprint {
    let c = Some(palette.chord.clone());
    let low = Some(palette.root_low);
    let mid = Some(palette.root_mid);

    bp.drums.kick = patterns::steps(&patterns::JPOP_KICK);
    bp.drums.snare = patterns::steps(&BACKBEAT);
    bp.drums.hat = patterns::steps(&EIGHTH_HAT);
    bp.drums.open_hat = patterns::silent();

    bp.pad = Track::new(
        vec![c.clone(), c.clone(), None, c.clone(), c.clone(), None, c, None],
        Subdivision::Eighth,
        Subdivision::Eighth,
    );
    bp.bass = Track::new(
        vec![mid, None, mid, None, low, None, mid, None],
        Subdivision::Eighth,
        Subdivision::Sixteenth,
    );

    let scale = palette.lead_scale(mode);
    let events = (0..16).map(|i| lead_step(i, &scale, rng)).collect();
    bp.lead = Some(Track::new(events, Subdivision::Sixteenth, Subdivision::Sixteenth));

    bp.mix = Mix::from_levels([-12.0, -16.0, -22.0, MUTED_DB, -24.0, -15.0, -18.0]);
    bp.fx.master_filter_hz = Some(9000.0);
    bp.fx.reverb_wet = 0.22;
    bp.fx.chorus_wet = 0.25;
    bp.fx.delay_wet = 0.08;
    bp
}

/// One lead step: a rest or a scale note.
///
/// Quarter-note pickups rest with probability 0.35, other off-eighths with
/// probability 0.25. Draws are only made where a rest is possible.
fn lead_step<R: UnitRng + ?Sized>(i: usize, scale: &[Note], rng: &mut R) -> Option<Note> {
    if i % 4 == 3 && rng.next_unit() < 0.35 {
        return None;
    }
    if i % 2 == 1 && rng.next_unit() < 0.25 {
        return None;
    }
    pick(scale, rng).copied()
}

pub(super) fn arena_rock<R: UnitRng + ?Sized>(
    mut bp: Blueprint,
    palette: &Palette,
    rng: &mut R,
) -> Blueprint {
    let chord = Some(palette.chord.clone());
    let low = Some(palette.root_low);
    let mid = Some(palette.root_mid);

    bp.drums.kick = patterns::steps(&patterns::HALF_TIME_KICK);
    bp.drums.snare = patterns::steps(&BACKBEAT);
    bp.drums.hat = patterns::steps(&EIGHTH_HAT);
    bp.drums.open_hat = patterns::thin(&OFFBEAT_HAT, 0.25, rng);

    bp.pad = Track::new(
        vec![chord.clone(), None, chord, None],
        Subdivision::Half,
        Subdivision::Half,
    );
    bp.bass = Track::new(
        vec![low, low, low, low, mid, low, low, low],
        Subdivision::Eighth,
        Subdivision::Eighth,
    );

    bp.mix = Mix::from_levels([-11.0, -14.0, -22.0, -24.0, -24.0, -10.0, MUTED_DB]);
    bp.fx.distortion = 0.22;
    bp.fx.master_filter_hz = None;
    bp.fx.reverb_wet = 0.06;
    bp
}

pub(super) fn alt_indie_teen<R: UnitRng + ?Sized>(
    mut bp: Blueprint,
    palette: &Palette,
    rng: &mut R,
) -> Blueprint {
    let chord = Some(palette.chord.clone());
    let low = Some(palette.root_low);

    bp.drums.kick = patterns::steps(&patterns::INDIE_KICK);
    bp.drums.snare = patterns::steps(&BACKBEAT);
    bp.drums.hat = patterns::thin(&OFFBEAT_HAT, 0.6, rng);
    bp.drums.open_hat = patterns::silent();

    bp.pad = Track::new(
        vec![chord.clone(), None, None, chord],
        Subdivision::Measure,
        Subdivision::Measure,
    );
    bp.bass = Track::new(
        vec![low, None, None, None, low, None, None, None],
        Subdivision::Quarter,
        Subdivision::Eighth,
    );

    bp.mix = Mix::from_levels([-16.0, -20.0, -28.0, MUTED_DB, -20.0, -18.0, MUTED_DB]);
    bp.fx.master_filter_hz = Some(6000.0);
    bp.fx.reverb_wet = 0.42;
    bp.fx.chorus_wet = 0.35;
    bp.fx.delay_wet = 0.10;
    bp
}
