//! Pitch classes, spelled notes, chords, and transport subdivisions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Sharp spellings used when a note is produced by transposition.
const SHARP_NAMES: [(PitchClass, Accidental); 12] = [
    (PitchClass::C, Accidental::Natural),
    (PitchClass::C, Accidental::Sharp),
    (PitchClass::D, Accidental::Natural),
    (PitchClass::D, Accidental::Sharp),
    (PitchClass::E, Accidental::Natural),
    (PitchClass::F, Accidental::Natural),
    (PitchClass::F, Accidental::Sharp),
    (PitchClass::G, Accidental::Natural),
    (PitchClass::G, Accidental::Sharp),
    (PitchClass::A, Accidental::Natural),
    (PitchClass::A, Accidental::Sharp),
    (PitchClass::B, Accidental::Natural),
];

/// One of the seven natural pitch classes; also the scale root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchClass {
    /// The natural pitch classes in ascending order from C.
    pub const ALL: [PitchClass; 7] = [
        PitchClass::C,
        PitchClass::D,
        PitchClass::E,
        PitchClass::F,
        PitchClass::G,
        PitchClass::A,
        PitchClass::B,
    ];

    /// Semitones above C.
    pub fn semitone(&self) -> i32 {
        match self {
            PitchClass::C => 0,
            PitchClass::D => 2,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::G => 7,
            PitchClass::A => 9,
            PitchClass::B => 11,
        }
    }

    /// The letter name.
    pub fn letter(&self) -> char {
        match self {
            PitchClass::C => 'C',
            PitchClass::D => 'D',
            PitchClass::E => 'E',
            PitchClass::F => 'F',
            PitchClass::G => 'G',
            PitchClass::A => 'A',
            PitchClass::B => 'B',
        }
    }

    /// Parses a letter name (case-insensitive).
    pub fn from_letter(c: char) -> Option<Self> {
        PitchClass::ALL
            .iter()
            .copied()
            .find(|pc| pc.letter() == c.to_ascii_uppercase())
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Accidental attached to a spelled note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    fn offset(&self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// A spelled note in scientific pitch notation (C4 = MIDI 60).
///
/// Spelling is preserved so that chord tables written with flats render
/// with flats. Serializes as its name, e.g. `"Eb4"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    /// Letter name.
    pub letter: PitchClass,
    /// Sharp, flat, or natural.
    pub accidental: Accidental,
    /// Octave number.
    pub octave: i8,
}

impl Note {
    /// Creates a natural note.
    pub const fn natural(letter: PitchClass, octave: i8) -> Self {
        Self {
            letter,
            accidental: Accidental::Natural,
            octave,
        }
    }

    /// Creates a sharpened note.
    pub const fn sharp(letter: PitchClass, octave: i8) -> Self {
        Self {
            letter,
            accidental: Accidental::Sharp,
            octave,
        }
    }

    /// Creates a flattened note.
    pub const fn flat(letter: PitchClass, octave: i8) -> Self {
        Self {
            letter,
            accidental: Accidental::Flat,
            octave,
        }
    }

    /// MIDI note number (may fall outside 0-127 for extreme octaves).
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.letter.semitone() + self.accidental.offset()
    }

    /// Builds a note from a MIDI number, spelled with sharps.
    pub fn from_midi(midi: i32) -> Self {
        let pc = midi.rem_euclid(12) as usize;
        let octave = midi.div_euclid(12) - 1;
        let (letter, accidental) = SHARP_NAMES[pc];
        Self {
            letter,
            accidental,
            octave: octave as i8,
        }
    }

    /// Transposes by a number of semitones; the result is spelled with sharps.
    pub fn transpose(&self, semitones: i32) -> Self {
        Self::from_midi(self.midi() + semitones)
    }

    /// Frequency in Hz using A4 = 440 Hz equal temperament.
    pub fn frequency(&self) -> f64 {
        440.0 * 2.0_f64.powf((self.midi() as f64 - 69.0) / 12.0)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letter.letter(),
            self.accidental.symbol(),
            self.octave
        )
    }
}

impl FromStr for Note {
    type Err = SpecError;

    /// Parses names such as "C4", "F#4", "Bb3", "C-1".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SpecError::InvalidNote(s.to_string());
        let trimmed = s.trim();
        let mut chars = trimmed.chars();

        let letter = chars
            .next()
            .and_then(PitchClass::from_letter)
            .ok_or_else(invalid)?;

        let rest = chars.as_str();
        let (accidental, octave_str) = if let Some(r) = rest.strip_prefix('#') {
            (Accidental::Sharp, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (Accidental::Flat, r)
        } else {
            (Accidental::Natural, rest)
        };

        let octave: i8 = octave_str.parse().map_err(|_| invalid())?;
        Ok(Note {
            letter,
            accidental,
            octave,
        })
    }
}

impl TryFrom<String> for Note {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

/// A set of notes struck together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chord(pub Vec<Note>);

impl Chord {
    /// The chord tones.
    pub fn notes(&self) -> &[Note] {
        &self.0
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(Note::to_string).collect();
        write!(f, "[{}]", names.join(" "))
    }
}

/// Transport subdivision symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subdivision {
    /// One 4/4 measure.
    #[serde(rename = "1m")]
    Measure,
    /// Half note.
    #[serde(rename = "2n")]
    Half,
    /// Quarter note.
    #[serde(rename = "4n")]
    Quarter,
    /// Eighth note.
    #[serde(rename = "8n")]
    Eighth,
    /// Sixteenth note.
    #[serde(rename = "16n")]
    Sixteenth,
    /// Thirty-second note.
    #[serde(rename = "32n")]
    ThirtySecond,
}

impl Subdivision {
    /// Length in quarter-note beats.
    pub fn beats(&self) -> f64 {
        match self {
            Subdivision::Measure => 4.0,
            Subdivision::Half => 2.0,
            Subdivision::Quarter => 1.0,
            Subdivision::Eighth => 0.5,
            Subdivision::Sixteenth => 0.25,
            Subdivision::ThirtySecond => 0.125,
        }
    }

    /// Length in seconds at a given tempo.
    pub fn seconds(&self, bpm: f64) -> f64 {
        self.beats() * 60.0 / bpm
    }

    /// The transport symbol, e.g. "16n".
    pub fn as_str(&self) -> &'static str {
        match self {
            Subdivision::Measure => "1m",
            Subdivision::Half => "2n",
            Subdivision::Quarter => "4n",
            Subdivision::Eighth => "8n",
            Subdivision::Sixteenth => "16n",
            Subdivision::ThirtySecond => "32n",
        }
    }
}

impl fmt::Display for Subdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subdivision {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Subdivision::Measure),
            "2n" => Ok(Subdivision::Half),
            "4n" => Ok(Subdivision::Quarter),
            "8n" => Ok(Subdivision::Eighth),
            "16n" => Ok(Subdivision::Sixteenth),
            "32n" => Ok(Subdivision::ThirtySecond),
            other => Err(SpecError::InvalidSubdivision(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_parse_and_display() {
        for name in ["C4", "F#4", "Eb4", "A3", "C#5", "Bb4", "G1"] {
            let note: Note = name.parse().unwrap();
            assert_eq!(note.to_string(), name);
        }
    }

    #[test]
    fn test_note_parse_rejects_garbage() {
        assert!("H4".parse::<Note>().is_err());
        assert!("C".parse::<Note>().is_err());
        assert!("".parse::<Note>().is_err());
        assert!("C#x".parse::<Note>().is_err());
    }

    #[test]
    fn test_midi_numbers() {
        assert_eq!("C4".parse::<Note>().unwrap().midi(), 60);
        assert_eq!("A4".parse::<Note>().unwrap().midi(), 69);
        assert_eq!("Eb4".parse::<Note>().unwrap().midi(), 63);
        assert_eq!("C1".parse::<Note>().unwrap().midi(), 24);
    }

    #[test]
    fn test_transpose_spells_with_sharps() {
        let c4 = Note::natural(PitchClass::C, 4);
        assert_eq!(c4.transpose(3).to_string(), "D#4");
        assert_eq!(c4.transpose(12).to_string(), "C5");
        let b3 = Note::natural(PitchClass::B, 3);
        assert_eq!(b3.transpose(1).to_string(), "C4");
        assert_eq!(c4.transpose(-1).to_string(), "B3");
    }

    #[test]
    fn test_frequency() {
        let a4 = Note::natural(PitchClass::A, 4);
        assert!((a4.frequency() - 440.0).abs() < 1e-9);
        let c4 = Note::natural(PitchClass::C, 4);
        assert!((c4.frequency() - 261.6256).abs() < 1e-3);
    }

    #[test]
    fn test_note_serde_as_string() {
        let note = Note::flat(PitchClass::B, 4);
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, "\"Bb4\"");
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_subdivision_beats_and_symbols() {
        assert_eq!(Subdivision::Measure.beats(), 4.0);
        assert_eq!(Subdivision::Sixteenth.beats(), 0.25);
        assert_eq!("8n".parse::<Subdivision>().unwrap(), Subdivision::Eighth);
        assert!("3n".parse::<Subdivision>().is_err());
        assert!((Subdivision::Quarter.seconds(120.0) - 0.5).abs() < 1e-12);
        let json = serde_json::to_string(&Subdivision::ThirtySecond).unwrap();
        assert_eq!(json, "\"32n\"");
    }
}
