//! Instrument patches for each voice and genre.

use officedj_spec::{Genre, Voice};

use crate::envelope::Adsr;

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample of the waveform at `phase` in `[0, 1)`.
    pub fn sample(&self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (phase * std::f64::consts::TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
        }
    }
}

/// Noise color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    /// Flat spectrum.
    White,
    /// 1/f spectrum.
    Pink,
}

/// How a voice makes sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Patch {
    /// Sine drum with an exponential pitch drop from `note * octaves`.
    Membrane {
        pitch_decay: f64,
        octaves: f64,
        envelope: Adsr,
    },
    /// Enveloped noise burst.
    Noise {
        color: NoiseColor,
        envelope: Adsr,
    },
    /// One oscillator per chord tone.
    Poly {
        waveform: Waveform,
        envelope: Adsr,
    },
    /// Single oscillator through a resonant lowpass.
    Mono {
        waveform: Waveform,
        filter_hz: f64,
        filter_q: f64,
        envelope: Adsr,
    },
    /// Plain single oscillator.
    Synth {
        waveform: Waveform,
        envelope: Adsr,
    },
}

/// The patch a genre uses for a voice.
pub fn patch_for(genre: Genre, voice: Voice) -> Patch {
    match voice {
        Voice::Kick => Patch::Membrane {
            pitch_decay: if genre.is_techno() { 0.02 } else { 0.03 },
            octaves: if genre == Genre::ArenaRock { 2.0 } else { 3.0 },
            envelope: Adsr::new(0.001, 0.22, 0.0, 0.4),
        },
        Voice::Snare => Patch::Noise {
            color: NoiseColor::White,
            envelope: Adsr::percussive(
                0.001,
                if genre == Genre::ArenaRock { 0.12 } else { 0.08 },
            ),
        },
        Voice::Hat => Patch::Noise {
            color: NoiseColor::Pink,
            envelope: Adsr::percussive(0.001, 0.05),
        },
        Voice::OpenHat => Patch::Noise {
            color: NoiseColor::White,
            envelope: Adsr::percussive(0.001, 0.12),
        },
        Voice::Pad => Patch::Poly {
            waveform: match genre {
                Genre::ArenaRock => Waveform::Sawtooth,
                Genre::PeggyHouse => Waveform::Triangle,
                Genre::CuteJpop => Waveform::Square,
                _ => Waveform::Sine,
            },
            envelope: Adsr::new(
                if genre == Genre::CuteJpop { 0.005 } else { 0.02 },
                if genre.is_techno() { 0.10 } else { 0.4 },
                if genre.is_techno() { 0.15 } else { 0.4 },
                if genre == Genre::AltIndieTeen { 2.8 } else { 1.1 },
            ),
        },
        Voice::Bass => Patch::Mono {
            waveform: if genre == Genre::ArenaRock {
                Waveform::Sawtooth
            } else {
                Waveform::Square
            },
            filter_hz: if genre == Genre::BerlinTechnoMoist {
                700.0
            } else {
                950.0
            },
            filter_q: 1.0,
            envelope: Adsr::new(0.01, 0.25, 0.15, 0.25),
        },
        Voice::Lead => Patch::Synth {
            waveform: Waveform::Square,
            envelope: Adsr::new(0.005, 0.08, 0.15, 0.15),
        },
    }
}
