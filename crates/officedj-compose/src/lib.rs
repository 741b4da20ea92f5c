//! Office DJ composition.
//!
//! Turns a page's explanation text and path into a [`Profile`], a
//! [`Blueprint`], and the text shown next to the player. Everything here is
//! synchronous and deterministic: the only randomness is a seeded
//! [`UnitRng`].
//!
//! # Example
//!
//! ```
//! use officedj_compose::Arrangement;
//! use officedj_spec::{Genre, Mode};
//!
//! let arrangement = Arrangement::compose("LED 조명 7개 설치", "/jiwon", 0);
//! assert_eq!(arrangement.profile.genre, Genre::BerlinTechno);
//! assert_eq!(arrangement.profile.mode, Mode::Major);
//! assert_eq!(arrangement.blueprint.drums.kick.len(), 16);
//! ```

pub mod analyze;
pub mod blueprint;
pub mod profile;
pub mod render;
pub mod rng;

use officedj_spec::{Blueprint, Profile};
use serde::Serialize;

pub use analyze::{count_numbers, sample_keywords, sample_unique, string_hash, tokenize};
pub use blueprint::build_blueprint;
pub use profile::{derive_profile, genre_for_path, seed_for, GenreDefaults, ProfileGenerator};
pub use render::{render_code, render_details, render_summary};
pub use rng::{UnitRng, XorShift32};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A profile and the blueprint built from it.
///
/// The two are always replaced together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrangement {
    /// The derived profile.
    pub profile: Profile,
    /// The blueprint built from `profile`.
    pub blueprint: Blueprint,
}

impl Arrangement {
    /// Derives a profile and builds its blueprint.
    pub fn compose(text: &str, path_hint: &str, generation: u32) -> Self {
        Self::from_profile(ProfileGenerator::derive(text, path_hint, generation))
    }

    /// Builds the blueprint for an existing profile.
    pub fn from_profile(profile: Profile) -> Self {
        let blueprint = build_blueprint(&profile);
        Self { profile, blueprint }
    }

    /// The arrangement for the next remix generation.
    pub fn remix(&self, text: &str, path_hint: &str) -> Self {
        Self::compose(text, path_hint, self.profile.generation.wrapping_add(1))
    }

    /// Renders the code block for this arrangement.
    pub fn code(&self, display_name: Option<&str>) -> String {
        render_code(&self.profile, &self.blueprint, display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remix_advances_generation() {
        let first = Arrangement::compose("휴식 공간과 밝은 조명", "/about", 0);
        let second = first.remix("휴식 공간과 밝은 조명", "/about");
        assert_eq!(second.profile.generation, 1);
        assert_ne!(first.profile.seed, second.profile.seed);
        assert_eq!(second.blueprint, build_blueprint(&second.profile));
    }

    #[test]
    fn test_compose_matches_parts() {
        let a = Arrangement::compose("text", "/yeju", 0);
        assert_eq!(a.profile, ProfileGenerator::derive("text", "/yeju", 0));
        assert!(a.code(None).starts_with("// --- OFFICE DJ ---"));
    }
}
