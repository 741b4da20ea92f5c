//! Sixteen-step drum templates and step helpers.

use crate::rng::UnitRng;

/// A sixteen-step template; 1 is a hit.
pub type Steps16 = [u8; 16];

/// Kick on every beat.
pub const FOUR_ON_FLOOR: Steps16 = [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];

/// Snare on beats two and four.
pub const BACKBEAT: Steps16 = [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0];

/// Hat on the "and" of every beat.
pub const OFFBEAT_HAT: Steps16 = [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0];

/// Hat on every eighth note.
pub const EIGHTH_HAT: Steps16 = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];

/// Pop kick with syncopated pickups.
pub const JPOP_KICK: Steps16 = [1, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 1, 0, 0];

/// Half-time rock kick.
pub const HALF_TIME_KICK: Steps16 = [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0];

/// Sparse indie kick.
pub const INDIE_KICK: Steps16 = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0];

/// Converts a template to step flags.
pub fn steps(template: &Steps16) -> Vec<bool> {
    template.iter().map(|v| *v != 0).collect()
}

/// Sixteen silent steps.
pub fn silent() -> Vec<bool> {
    vec![false; 16]
}

/// Keeps each template step only where `filter(index)` holds.
pub fn filter_steps(template: &Steps16, filter: impl Fn(usize) -> bool) -> Vec<bool> {
    template
        .iter()
        .enumerate()
        .map(|(i, v)| *v != 0 && filter(i))
        .collect()
}

/// Keeps each step when a draw falls below `keep`.
///
/// One draw is made for every step, hit or rest, so the number of draws
/// never depends on the template.
pub fn thin<R: UnitRng + ?Sized>(template: &Steps16, keep: f64, rng: &mut R) -> Vec<bool> {
    template
        .iter()
        .map(|v| {
            let kept = rng.next_unit() < keep;
            kept && *v != 0
        })
        .collect()
}

/// Renders steps as `x` hits and `.` rests.
pub fn step_string(steps: &[bool]) -> String {
    steps.iter().map(|hit| if *hit { 'x' } else { '.' }).collect()
}
