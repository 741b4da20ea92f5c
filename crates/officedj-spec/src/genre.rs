//! Genre, mode, density, and vibe enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::note::Subdivision;

/// Musical genre of a generated arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Genre {
    /// Driving minor-key techno.
    BerlinTechno,
    /// Darker, filtered techno with a longer reverb tail.
    BerlinTechnoMoist,
    /// Swung deep house.
    PeggyHouse,
    /// Slow, airy indie with chorus and long pads.
    AltIndieTeen,
    /// Distorted half-time rock.
    ArenaRock,
    /// Fast, bright pop with a lead line.
    CuteJpop,
}

impl Genre {
    /// Every genre, including the path-only ones.
    pub const ALL: [Genre; 6] = [
        Genre::BerlinTechno,
        Genre::BerlinTechnoMoist,
        Genre::PeggyHouse,
        Genre::AltIndieTeen,
        Genre::ArenaRock,
        Genre::CuteJpop,
    ];

    /// Genres that can be drawn at random when no page forces one.
    pub const POOL: [Genre; 5] = [
        Genre::BerlinTechno,
        Genre::PeggyHouse,
        Genre::AltIndieTeen,
        Genre::ArenaRock,
        Genre::CuteJpop,
    ];

    /// Returns the genre name as used in JSON and rendered code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::BerlinTechno => "berlinTechno",
            Genre::BerlinTechnoMoist => "berlinTechnoMoist",
            Genre::PeggyHouse => "peggyHouse",
            Genre::AltIndieTeen => "altIndieTeen",
            Genre::ArenaRock => "arenaRock",
            Genre::CuteJpop => "cuteJpop",
        }
    }

    /// True for both techno variants, which share patterns and patches.
    pub fn is_techno(&self) -> bool {
        matches!(self, Genre::BerlinTechno | Genre::BerlinTechnoMoist)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = SpecError;

    /// Parses a genre name, ignoring case, `-` and `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().to_lowercase() == normalized)
            .ok_or_else(|| SpecError::UnknownGenre(s.to_string()))
    }
}

/// Tonal mode of the arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major (Ionian) tonality.
    Major,
    /// Minor (Aeolian) tonality.
    Minor,
}

impl Mode {
    /// Returns the mode as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }

    /// Semitone offsets of the seven scale degrees.
    pub fn scale_steps(&self) -> [i32; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rhythmic density of the arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// Sparse, breathing loops.
    Airy,
    /// Regular pulse.
    Steady,
    /// Busy, driving patterns.
    Dense,
}

impl Density {
    /// Returns the density as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Airy => "airy",
            Density::Steady => "steady",
            Density::Dense => "dense",
        }
    }

    /// Pulse subdivision associated with this density.
    ///
    /// Informational; the external player decides how to use it.
    pub fn pulse(&self) -> Subdivision {
        match self {
            Density::Airy => Subdivision::Quarter,
            Density::Steady => Subdivision::Eighth,
            Density::Dense => Subdivision::Sixteenth,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-only mood derived from keyword hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    /// At least one brightness keyword.
    Bright,
    /// No brightness keyword but at least one calm keyword.
    Calm,
    /// Neither.
    Neutral,
}

impl Vibe {
    /// Derives the vibe from keyword hit counts.
    pub fn from_hits(brightness_hits: usize, calm_hits: usize) -> Self {
        if brightness_hits > 0 {
            Vibe::Bright
        } else if calm_hits > 0 {
            Vibe::Calm
        } else {
            Vibe::Neutral
        }
    }

    /// Returns the vibe as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Bright => "bright",
            Vibe::Calm => "calm",
            Vibe::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_round_trip_names() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), genre);
        }
        assert_eq!("berlin-techno".parse::<Genre>().unwrap(), Genre::BerlinTechno);
        assert_eq!("CUTE_JPOP".parse::<Genre>().unwrap(), Genre::CuteJpop);
        assert!("polka".parse::<Genre>().is_err());
    }

    #[test]
    fn test_pool_excludes_moist_techno() {
        assert!(!Genre::POOL.contains(&Genre::BerlinTechnoMoist));
        assert_eq!(Genre::POOL.len(), 5);
    }

    #[test]
    fn test_genre_serde_is_camel_case() {
        let json = serde_json::to_string(&Genre::BerlinTechnoMoist).unwrap();
        assert_eq!(json, "\"berlinTechnoMoist\"");
    }

    #[test]
    fn test_vibe_priority() {
        assert_eq!(Vibe::from_hits(1, 3), Vibe::Bright);
        assert_eq!(Vibe::from_hits(0, 1), Vibe::Calm);
        assert_eq!(Vibe::from_hits(0, 0), Vibe::Neutral);
    }

    #[test]
    fn test_density_pulse() {
        assert_eq!(Density::Dense.pulse(), Subdivision::Sixteenth);
        assert_eq!(Density::Airy.pulse(), Subdivision::Quarter);
    }
}
