//! Office DJ Data Model
//!
//! This crate provides the types shared by every stage of the Office DJ
//! pipeline: the [`Profile`] derived from a page's explanation text, the
//! [`Blueprint`] that turns a profile into step sequences and mix settings,
//! and the [`SessionConfig`] used by players and renderers.
//!
//! # Example
//!
//! ```
//! use officedj_spec::{Genre, Note, Subdivision};
//!
//! let genre: Genre = "berlinTechno".parse().unwrap();
//! assert!(genre.is_techno());
//!
//! let note: Note = "F#4".parse().unwrap();
//! assert_eq!(note.midi(), 66);
//! assert_eq!(Subdivision::Sixteenth.beats(), 0.25);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types and the backend error trait
//! - [`genre`]: Genre, mode, density, and vibe enumerations
//! - [`note`]: Pitch classes, notes, chords, and subdivisions
//! - [`profile`]: The derived musical profile
//! - [`blueprint`]: Step sequences, mix, and effects
//! - [`config`]: Session configuration
//! - [`validation`]: Blueprint and profile validation
//! - [`hash`]: Canonical hashing

pub mod blueprint;
pub mod config;
pub mod error;
pub mod genre;
pub mod hash;
pub mod note;
pub mod profile;
pub mod validation;

pub use blueprint::{Blueprint, DrumPattern, Fx, LeadLine, Mix, Track, Voice, DRUM_STEPS, MUTED_DB};
pub use config::SessionConfig;
pub use error::{BackendError, SpecError};
pub use genre::{Density, Genre, Mode, Vibe};
pub use hash::{blueprint_hash, profile_hash};
pub use note::{Accidental, Chord, Note, PitchClass, Subdivision};
pub use profile::{Evidence, Profile, MAX_BPM, MAX_SWING, MAX_WORDS, MIN_BPM};
pub use validation::{validate_blueprint, validate_profile, Rule, ValidationResult, Violation};
