//! Resonant lowpass used by the master bus and mono voices.

use std::f64::consts::TAU;

/// Second-order lowpass in transposed direct form II.
///
/// Coefficients follow the Audio EQ Cookbook and are normalized by `a0`.
#[derive(Debug, Clone)]
pub struct Lowpass {
    b: [f64; 3],
    a: [f64; 2],
    s1: f64,
    s2: f64,
}

impl Lowpass {
    /// Creates a filter.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff in Hz, clamped to `[10, 0.49 * sample_rate]`
    /// * `q` - Resonance; 0.707 is Butterworth
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let cutoff = cutoff.clamp(10.0, sample_rate * 0.49);
        let omega = TAU * cutoff / sample_rate;
        let alpha = omega.sin() / (2.0 * q.max(0.1));
        let cos = omega.cos();
        let a0 = 1.0 + alpha;

        let side = (1.0 - cos) / 2.0 / a0;
        Self {
            b: [side, 2.0 * side, side],
            a: [-2.0 * cos / a0, (1.0 - alpha) / a0],
            s1: 0.0,
            s2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.s1;
        self.s1 = self.b[1] * input - self.a[0] * output + self.s2;
        self.s2 = self.b[2] * input - self.a[1] * output;
        output
    }

    /// Filters a buffer in place.
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        buffer.iter_mut().for_each(|s| *s = self.process(*s));
    }
}
