//! Note synthesis for the offline engine.
//!
//! [`render_note`] produces one triggered note as a standalone buffer. The
//! caller mixes it into the instrument's output at the event time.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::envelope::Adsr;
use crate::filter::Lowpass;
use crate::graph::{Trigger, KICK_NOTE};
use crate::patch::{NoiseColor, Patch, Waveform};

/// Paul Kellet's economy pink noise filter.
#[derive(Debug, Clone, Default)]
pub struct PinkFilter {
    b0: f64,
    b1: f64,
    b2: f64,
}

impl PinkFilter {
    pub fn process(&mut self, white: f64) -> f64 {
        self.b0 = 0.99765 * self.b0 + white * 0.0990460;
        self.b1 = 0.96300 * self.b1 + white * 0.2965164;
        self.b2 = 0.57000 * self.b2 + white * 1.0526913;
        (self.b0 + self.b1 + self.b2 + white * 0.1848) * 0.11
    }
}

/// Frequencies a trigger sounds.
pub fn trigger_frequencies(trigger: &Trigger) -> Vec<f64> {
    match trigger {
        Trigger::Chord(chord) => chord.notes().iter().map(|n| n.frequency()).collect(),
        Trigger::Note(note) => vec![note.frequency()],
        Trigger::Hit => Vec::new(),
    }
}

fn oscillator(waveform: Waveform, frequency: f64, sample_rate: f64, len: usize) -> Vec<f64> {
    let step = frequency / sample_rate;
    let mut phase = 0.0;
    (0..len)
        .map(|_| {
            let sample = waveform.sample(phase);
            phase = (phase + step).fract();
            sample
        })
        .collect()
}

fn apply_envelope(signal: &mut [f64], envelope: &[f64], velocity: f64) {
    for (s, e) in signal.iter_mut().zip(envelope) {
        *s *= e * velocity;
    }
}

/// Renders a single triggered note.
///
/// # Arguments
/// * `patch` - How the instrument makes sound
/// * `trigger` - Pitches to play; unpitched hits on a membrane use the kick pitch
/// * `gate` - Seconds the note is held before release
/// * `velocity` - Amplitude scale (0.0 to 1.0)
/// * `sample_rate` - Audio sample rate in Hz
/// * `rng` - Noise source for noise patches
///
/// # Returns
/// Samples covering the gate and the release tail
pub fn render_note(
    patch: &Patch,
    trigger: &Trigger,
    gate: f64,
    velocity: f64,
    sample_rate: f64,
    rng: &mut Pcg32,
) -> Vec<f64> {
    match patch {
        Patch::Membrane {
            pitch_decay,
            octaves,
            envelope,
        } => {
            let frequency = trigger_frequencies(trigger)
                .first()
                .copied()
                .unwrap_or_else(|| KICK_NOTE.frequency());
            membrane(
                frequency,
                *pitch_decay,
                *octaves,
                envelope,
                gate,
                velocity,
                sample_rate,
            )
        }
        Patch::Noise { color, envelope } => {
            let curve = envelope.curve(gate, sample_rate);
            let mut pink = PinkFilter::default();
            let mut signal: Vec<f64> = (0..curve.len())
                .map(|_| {
                    let white = rng.gen::<f64>() * 2.0 - 1.0;
                    match color {
                        NoiseColor::White => white,
                        NoiseColor::Pink => pink.process(white),
                    }
                })
                .collect();
            apply_envelope(&mut signal, &curve, velocity);
            signal
        }
        Patch::Poly { waveform, envelope } | Patch::Synth { waveform, envelope } => {
            let curve = envelope.curve(gate, sample_rate);
            let mut signal = vec![0.0; curve.len()];
            for frequency in trigger_frequencies(trigger) {
                let tone = oscillator(*waveform, frequency, sample_rate, curve.len());
                for (s, t) in signal.iter_mut().zip(tone) {
                    *s += t;
                }
            }
            apply_envelope(&mut signal, &curve, velocity);
            signal
        }
        Patch::Mono {
            waveform,
            filter_hz,
            filter_q,
            envelope,
        } => {
            let curve = envelope.curve(gate, sample_rate);
            let Some(frequency) = trigger_frequencies(trigger).first().copied() else {
                return Vec::new();
            };
            let mut signal = oscillator(*waveform, frequency, sample_rate, curve.len());
            Lowpass::new(*filter_hz, *filter_q, sample_rate).process_buffer(&mut signal);
            apply_envelope(&mut signal, &curve, velocity);
            signal
        }
    }
}

/// Sine drum whose pitch falls exponentially from `frequency * octaves` to
/// `frequency` over `pitch_decay` seconds.
fn membrane(
    frequency: f64,
    pitch_decay: f64,
    octaves: f64,
    envelope: &Adsr,
    gate: f64,
    velocity: f64,
    sample_rate: f64,
) -> Vec<f64> {
    let curve = envelope.curve(gate, sample_rate);
    let start = frequency * octaves.max(1.0);
    let ratio = frequency / start;
    let mut phase = 0.0;
    let mut signal = Vec::with_capacity(curve.len());
    for i in 0..curve.len() {
        let t = i as f64 / sample_rate;
        let progress = if pitch_decay > 0.0 {
            (t / pitch_decay).min(1.0)
        } else {
            1.0
        };
        let current = start * ratio.powf(progress);
        signal.push((phase * std::f64::consts::TAU).sin());
        phase = (phase + current / sample_rate).fract();
    }
    apply_envelope(&mut signal, &curve, velocity);
    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::patch_for;
    use crate::rng::noise_rng;
    use officedj_spec::{Chord, Genre, Note, PitchClass, Voice};

    const SR: f64 = 22_050.0;

    fn peak(signal: &[f64]) -> f64 {
        signal.iter().fold(0.0, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_kick_renders_from_note() {
        let patch = patch_for(Genre::BerlinTechno, Voice::Kick);
        let mut rng = noise_rng(1);
        let kick = render_note(&patch, &Trigger::Note(KICK_NOTE), 0.1, 0.9, SR, &mut rng);
        assert!(!kick.is_empty());
        assert!(peak(&kick) > 0.1);
        assert!(peak(&kick) <= 0.9 + 1e-9);
    }

    #[test]
    fn test_noise_is_seeded() {
        let patch = patch_for(Genre::ArenaRock, Voice::Snare);
        let a = render_note(&patch, &Trigger::Hit, 0.1, 0.7, SR, &mut noise_rng(5));
        let b = render_note(&patch, &Trigger::Hit, 0.1, 0.7, SR, &mut noise_rng(5));
        let c = render_note(&patch, &Trigger::Hit, 0.1, 0.7, SR, &mut noise_rng(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pink_noise_is_bounded() {
        let patch = patch_for(Genre::CuteJpop, Voice::Hat);
        let hat = render_note(&patch, &Trigger::Hit, 0.05, 1.0, SR, &mut noise_rng(9));
        assert!(peak(&hat) > 0.0);
        assert!(peak(&hat) < 1.0);
    }

    #[test]
    fn test_chord_sums_tones() {
        let patch = Patch::Poly {
            waveform: Waveform::Square,
            envelope: Adsr::new(0.0, 0.0, 1.0, 0.0),
        };
        let chord = Chord(vec![
            Note::natural(PitchClass::C, 4),
            Note::natural(PitchClass::E, 4),
            Note::natural(PitchClass::G, 4),
        ]);
        let signal = render_note(&patch, &Trigger::Chord(chord), 0.1, 1.0, SR, &mut noise_rng(0));
        // All three squares start high, so the first full-level sample sums them.
        assert!((signal[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unpitched_trigger_on_tonal_patch_is_silent() {
        let patch = patch_for(Genre::PeggyHouse, Voice::Bass);
        assert!(render_note(&patch, &Trigger::Hit, 0.2, 1.0, SR, &mut noise_rng(0)).is_empty());
        let lead = patch_for(Genre::CuteJpop, Voice::Lead);
        let silent = render_note(&lead, &Trigger::Hit, 0.2, 1.0, SR, &mut noise_rng(0));
        assert!(silent.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_bass_release_tail() {
        let patch = patch_for(Genre::BerlinTechnoMoist, Voice::Bass);
        let note = Note::natural(PitchClass::A, 1);
        let gate = 0.125;
        let bass = render_note(&patch, &Trigger::Note(note), gate, 0.9, SR, &mut noise_rng(0));
        assert!(bass.len() > (gate * SR) as usize);
        assert!(bass.iter().all(|s| s.is_finite()));
    }
}
