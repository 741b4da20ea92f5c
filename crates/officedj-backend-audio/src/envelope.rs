//! Gated ADSR amplitude curves.
//!
//! Every voice is triggered with a known gate length, so envelopes are
//! computed as whole curves: attack, decay and sustain while the gate is
//! held, then a linear release from the level reached at note off.

/// Attack, decay, sustain and release of one voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    /// Seconds from silence to full level.
    pub attack: f64,
    /// Seconds from full level down to `sustain`.
    pub decay: f64,
    /// Level held until note off, 0.0 to 1.0.
    pub sustain: f64,
    /// Seconds from the note-off level down to silence.
    pub release: f64,
}

impl Adsr {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.0),
        }
    }

    /// Drum-style envelope that decays to silence and releases at the same rate.
    pub fn percussive(attack: f64, decay: f64) -> Self {
        Self::new(attack, decay, 0.0, decay)
    }

    /// Level `t` seconds after note on, with the gate still held.
    pub fn held_level(&self, t: f64) -> f64 {
        if t < self.attack {
            return t / self.attack;
        }
        let since_peak = t - self.attack;
        if since_peak < self.decay {
            return 1.0 - (since_peak / self.decay) * (1.0 - self.sustain);
        }
        self.sustain
    }

    /// Level `t` seconds after note off, releasing from `from`.
    pub fn released_level(&self, from: f64, t: f64) -> f64 {
        if t >= self.release {
            0.0
        } else {
            from * (1.0 - t / self.release)
        }
    }

    /// Samples the envelope of a note held for `gate` seconds.
    ///
    /// # Arguments
    /// * `gate` - Seconds between note on and note off
    /// * `sample_rate` - Audio sample rate in Hz
    ///
    /// # Returns
    /// Levels covering the gate and the release. Trailing silence is
    /// dropped, so a percussive note that died before note off has no tail.
    pub fn curve(&self, gate: f64, sample_rate: f64) -> Vec<f64> {
        let held = (gate.max(0.0) * sample_rate).round() as usize;
        let tail = (self.release * sample_rate).ceil() as usize;

        let mut curve: Vec<f64> = (0..held)
            .map(|i| self.held_level(i as f64 / sample_rate))
            .collect();
        let from = curve.last().copied().unwrap_or(0.0);
        curve.extend((1..=tail).map(|i| self.released_level(from, i as f64 / sample_rate)));

        while curve.len() > 1 && curve.last() == Some(&0.0) {
            curve.pop();
        }
        curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_reaches_full_level() {
        let env = Adsr::new(0.01, 0.1, 0.5, 0.1);
        let curve = env.curve(0.5, 1000.0);
        let peak = curve.iter().cloned().fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-9);
        assert_eq!(curve[0], 0.0);
    }

    #[test]
    fn test_sustain_then_release() {
        let env = Adsr::new(0.0, 0.0, 0.4, 0.1);
        let curve = env.curve(0.2, 1000.0);
        assert!((curve[150] - 0.4).abs() < 1e-9);
        assert!(curve.len() > 200 && curve.len() <= 300);
        assert!(*curve.last().unwrap() < 0.05);
    }

    #[test]
    fn test_percussive_has_no_tail() {
        let env = Adsr::percussive(0.001, 0.05);
        let curve = env.curve(0.5, 1000.0);
        assert!(curve.len() < 100);
    }

    #[test]
    fn test_zero_gate_is_silent() {
        let env = Adsr::new(0.01, 0.1, 0.5, 0.2);
        assert!(env.curve(0.0, 1000.0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_release_starts_from_note_off_level() {
        let env = Adsr::new(0.1, 0.0, 1.0, 0.1);
        // Note off halfway through the attack.
        let curve = env.curve(0.05, 1000.0);
        assert!(curve[50] < 0.5);
        assert!(curve.iter().all(|v| *v <= 0.5));
    }
}
