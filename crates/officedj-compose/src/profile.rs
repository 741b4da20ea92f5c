//! Profile derivation from explanation text and page path.

use officedj_spec::{
    Density, Evidence, Genre, Mode, PitchClass, Profile, Vibe, MAX_BPM, MIN_BPM,
};

use crate::analyze::{string_hash, TextAnalysis};
use crate::rng::{pick, UnitRng, XorShift32};

/// Hashed in place of the seed string when there is neither text nor path.
pub const EMPTY_SEED_SENTINEL: &str = "office dj";

/// Path fragments that force a genre, checked in order.
const PATH_GENRES: [(&str, Genre); 6] = [
    ("/jungah", Genre::ArenaRock),
    ("/jiwon", Genre::BerlinTechno),
    ("/chaebin", Genre::BerlinTechnoMoist),
    ("/yeju", Genre::CuteJpop),
    ("/jasang", Genre::PeggyHouse),
    ("/seowoo", Genre::AltIndieTeen),
];

/// Tempo range, mode, density, and swing for one genre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenreDefaults {
    /// Lowest tempo the genre draws.
    pub bpm_min: u16,
    /// Highest tempo the genre draws.
    pub bpm_max: u16,
    /// Mode when no brightness keyword was found.
    pub mode: Mode,
    /// Whether a brightness keyword switches the mode to major.
    pub brightens: bool,
    /// Density when no calm keyword was found.
    pub density: Density,
    /// Density used instead when a calm keyword was found.
    pub calm_density: Option<Density>,
    /// Transport swing.
    pub swing: f64,
}

impl GenreDefaults {
    /// The table entry for a genre.
    pub fn for_genre(genre: Genre) -> Self {
        match genre {
            Genre::ArenaRock => Self {
                bpm_min: 118,
                bpm_max: 158,
                mode: Mode::Minor,
                brightens: true,
                density: Density::Steady,
                calm_density: None,
                swing: 0.0,
            },
            Genre::BerlinTechno => Self {
                bpm_min: 128,
                bpm_max: 138,
                mode: Mode::Minor,
                brightens: true,
                density: Density::Dense,
                calm_density: None,
                swing: 0.06,
            },
            Genre::BerlinTechnoMoist => Self {
                bpm_min: 126,
                bpm_max: 136,
                mode: Mode::Minor,
                brightens: true,
                density: Density::Steady,
                calm_density: Some(Density::Airy),
                swing: 0.06,
            },
            Genre::CuteJpop => Self {
                bpm_min: 142,
                bpm_max: 172,
                mode: Mode::Major,
                brightens: false,
                density: Density::Dense,
                calm_density: None,
                swing: 0.10,
            },
            Genre::PeggyHouse => Self {
                bpm_min: 120,
                bpm_max: 126,
                mode: Mode::Minor,
                brightens: false,
                density: Density::Steady,
                calm_density: None,
                swing: 0.18,
            },
            Genre::AltIndieTeen => Self {
                bpm_min: 94,
                bpm_max: 118,
                mode: Mode::Minor,
                brightens: true,
                density: Density::Airy,
                calm_density: None,
                swing: 0.08,
            },
        }
    }

    /// Mode after applying the brightness override.
    pub fn resolve_mode(&self, brightness_hits: usize) -> Mode {
        if self.brightens && brightness_hits > 0 {
            Mode::Major
        } else {
            self.mode
        }
    }

    /// Density after applying the calm override.
    pub fn resolve_density(&self, calm_hits: usize) -> Density {
        match self.calm_density {
            Some(calm) if calm_hits > 0 => calm,
            _ => self.density,
        }
    }

    /// Draws a tempo within the genre range, clamped to the global range.
    pub fn draw_bpm<R: UnitRng + ?Sized>(&self, rng: &mut R) -> u16 {
        let min = self.bpm_min as f64;
        let max = self.bpm_max as f64;
        let raw = min + rng.next_unit() * (max - min);
        raw.clamp(MIN_BPM as f64, MAX_BPM as f64).round() as u16
    }
}

/// Genre forced by the page path, if any.
///
/// Matching is a lower-cased substring lookup, first match wins.
pub fn genre_for_path(path_hint: &str) -> Option<Genre> {
    let lowered = path_hint.to_lowercase();
    PATH_GENRES
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map(|(_, genre)| *genre)
}

/// Seed for a text, path, and remix generation.
///
/// # Arguments
/// * `text` - Explanation text
/// * `path_hint` - Page path
/// * `generation` - Remix counter; 0 for the initial derivation
///
/// # Returns
/// * The string hash of `"{path}::{text}"`, with `"#{generation}"` appended
///   for remixes
pub fn seed_for(text: &str, path_hint: &str, generation: u32) -> u32 {
    let mut key = if text.is_empty() && path_hint.is_empty() {
        EMPTY_SEED_SENTINEL.to_string()
    } else {
        format!("{}::{}", path_hint, text)
    };
    if generation > 0 {
        key.push_str(&format!("#{}", generation));
    }
    string_hash(&key)
}

/// Derives a profile, drawing from `rng` in a fixed order.
///
/// Draw order: keyword sampling, genre (only when the path forces none),
/// tempo, scale root. `seed` is recorded in the profile unchanged.
pub fn derive_profile<R: UnitRng + ?Sized>(
    text: &str,
    path_hint: &str,
    seed: u32,
    rng: &mut R,
) -> Profile {
    let analysis = TextAnalysis::analyze(text, rng);

    let genre = genre_for_path(path_hint)
        .or_else(|| pick(&Genre::POOL, rng).copied())
        .unwrap_or(Genre::AltIndieTeen);

    let defaults = GenreDefaults::for_genre(genre);
    let bpm = defaults.draw_bpm(rng);
    let scale_root = pick(&PitchClass::ALL, rng).copied().unwrap_or(PitchClass::C);

    Profile {
        seed,
        generation: 0,
        genre,
        bpm,
        mode: defaults.resolve_mode(analysis.brightness_hits),
        density: defaults.resolve_density(analysis.calm_hits),
        swing: defaults.swing,
        scale_root,
        vibe: Vibe::from_hits(analysis.brightness_hits, analysis.calm_hits),
        evidence: Evidence {
            brightness_hits: analysis.brightness_hits,
            calm_hits: analysis.calm_hits,
            number_count: analysis.number_count,
            word_count: analysis.word_count,
        },
        words: analysis.words,
    }
}

/// Derives profiles from a fresh [`XorShift32`] per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileGenerator;

impl ProfileGenerator {
    /// Derives the profile for a text, path, and remix generation.
    ///
    /// Identical arguments always produce identical profiles.
    pub fn derive(text: &str, path_hint: &str, generation: u32) -> Profile {
        let seed = seed_for(text, path_hint, generation);
        let mut rng = XorShift32::new(seed);
        let mut profile = derive_profile(text, path_hint, seed, &mut rng);
        profile.generation = generation;
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officedj_spec::validate_profile;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_genre_for_path() {
        assert_eq!(genre_for_path("/JIWON/index.html"), Some(Genre::BerlinTechno));
        assert_eq!(genre_for_path("/team/chaebin"), Some(Genre::BerlinTechnoMoist));
        assert_eq!(genre_for_path("/seowoo"), Some(Genre::AltIndieTeen));
        assert_eq!(genre_for_path("/about"), None);
        assert_eq!(genre_for_path(""), None);
    }

    #[test]
    fn test_seed_for_variants() {
        assert_eq!(seed_for("", "", 0), string_hash("office dj"));
        assert_eq!(seed_for("hi", "/p", 0), string_hash("/p::hi"));
        assert_eq!(seed_for("hi", "", 0), string_hash("::hi"));
        assert_eq!(seed_for("hi", "/p", 3), string_hash("/p::hi#3"));
        assert_ne!(seed_for("hi", "/p", 0), seed_for("hi", "/p", 1));
    }

    #[test]
    fn test_bright_jiwon_is_major_techno() {
        let profile = ProfileGenerator::derive("LED 조명 7개 설치", "/jiwon", 0);
        assert_eq!(profile.genre, Genre::BerlinTechno);
        assert_eq!(profile.mode, Mode::Major);
        assert_eq!(profile.density, Density::Dense);
        assert_eq!(profile.vibe, Vibe::Bright);
        assert!((128..=138).contains(&profile.bpm));
        assert_eq!(profile.evidence.brightness_hits, 2);
        assert_eq!(profile.evidence.number_count, 1);
    }

    #[test]
    fn test_peggy_house_never_brightens() {
        let profile = ProfileGenerator::derive("밝은 LED 조명", "/jasang", 0);
        assert_eq!(profile.genre, Genre::PeggyHouse);
        assert_eq!(profile.mode, Mode::Minor);
        assert_eq!(profile.vibe, Vibe::Bright);
    }

    #[test]
    fn test_moist_techno_calm_is_airy() {
        let profile = ProfileGenerator::derive("휴식 공간", "/chaebin", 0);
        assert_eq!(profile.density, Density::Airy);
        let profile = ProfileGenerator::derive("회의 공간", "/chaebin", 0);
        assert_eq!(profile.density, Density::Steady);
    }

    #[test]
    fn test_empty_input() {
        let profile = ProfileGenerator::derive("", "", 0);
        assert!(profile.words.is_empty());
        assert_eq!(profile.vibe, Vibe::Neutral);
        assert!(Genre::POOL.contains(&profile.genre));
        assert_eq!(profile.seed, string_hash(EMPTY_SEED_SENTINEL));
        assert!(validate_profile(&profile).is_ok());
    }

    #[test]
    fn test_derive_is_deterministic() {
        let text = "창가 자리에 화이트 톤 책상과 휴식 공간 2곳이 있습니다";
        let a = ProfileGenerator::derive(text, "/about", 0);
        let b = ProfileGenerator::derive(text, "/about", 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_recorded() {
        let profile = ProfileGenerator::derive("text here", "/yeju", 4);
        assert_eq!(profile.generation, 4);
        assert_eq!(profile.seed, seed_for("text here", "/yeju", 4));
        assert_eq!(profile.genre, Genre::CuteJpop);
        assert_eq!(profile.mode, Mode::Major);
    }

    #[test]
    fn test_bpm_within_genre_range() {
        for genre in Genre::ALL {
            let defaults = GenreDefaults::for_genre(genre);
            let mut rng = XorShift32::new(genre as u32 + 1);
            for _ in 0..200 {
                let bpm = defaults.draw_bpm(&mut rng);
                assert!(bpm >= defaults.bpm_min && bpm <= defaults.bpm_max);
            }
        }
    }
}
