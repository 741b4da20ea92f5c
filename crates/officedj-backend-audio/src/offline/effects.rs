//! Mono effect processors used by the offline engine.
//!
//! Every effect that has a wet control crossfades: the output is
//! `dry * (1 - wet) + effect * wet`.

use std::f64::consts::PI;

use crate::filter::Lowpass;

const TWO_PI: f64 = 2.0 * PI;

// Freeverb tuning in samples at 44.1 kHz.
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];
const FIXED_GAIN: f64 = 0.015;
const SCALE_ROOM: f64 = 0.28;
const OFFSET_ROOM: f64 = 0.7;
const REVERB_DAMPING: f64 = 0.2;

/// Longest decay mapped onto the full room size.
const MAX_DECAY_SECONDS: f64 = 6.0;

/// Chorus modulation depth as a fraction of the base delay.
const CHORUS_DEPTH: f64 = 0.7;

/// Ring buffer with fractional reads.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line holding up to `max_samples` samples.
    pub fn new(max_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_samples.max(4)],
            write_pos: 0,
        }
    }

    pub fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Sample written `delay` writes ago; `delay` of 1 is the latest.
    pub fn read(&self, delay: usize) -> f64 {
        let len = self.buffer.len();
        let delay = delay.clamp(1, len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Linearly interpolated read.
    pub fn read_interpolated(&self, delay: f64) -> f64 {
        let delay = delay.clamp(1.0, (self.buffer.len() - 1) as f64);
        let whole = delay.floor() as usize;
        let frac = delay - whole as f64;
        self.read(whole) * (1.0 - frac) + self.read(whole + 1) * frac
    }
}

struct CombFilter {
    buffer: Vec<f64>,
    index: usize,
    store: f64,
    feedback: f64,
    damping: f64,
}

impl CombFilter {
    fn new(size: usize, feedback: f64, damping: f64) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
            store: 0.0,
            feedback,
            damping,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.buffer[self.index];
        self.store = output * (1.0 - self.damping) + self.store * self.damping;
        self.buffer[self.index] = input + self.store * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

struct AllpassFilter {
    buffer: Vec<f64>,
    index: usize,
}

impl AllpassFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let buffered = self.buffer[self.index];
        self.buffer[self.index] = input + buffered * 0.5;
        self.index = (self.index + 1) % self.buffer.len();
        buffered - input
    }
}

/// Mono Freeverb with a pre-delay.
pub struct Reverb {
    pre_delay: Option<(DelayLine, usize)>,
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
    wet: f64,
}

impl Reverb {
    /// Creates a reverb.
    ///
    /// # Arguments
    /// * `decay` - Tail length in seconds; longer decays use a larger room
    /// * `pre_delay` - Seconds before the tail starts
    /// * `wet` - Crossfade between dry and reverberated signal
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(decay: f64, pre_delay: f64, wet: f64, sample_rate: f64) -> Self {
        let scale = sample_rate / 44_100.0;
        let room = (decay / MAX_DECAY_SECONDS).clamp(0.0, 1.0) * SCALE_ROOM + OFFSET_ROOM;
        let pre_delay_samples = (pre_delay.max(0.0) * sample_rate).round() as usize;

        Self {
            pre_delay: (pre_delay_samples > 0)
                .then(|| (DelayLine::new(pre_delay_samples + 1), pre_delay_samples)),
            combs: COMB_TUNINGS
                .iter()
                .map(|&size| CombFilter::new((size as f64 * scale) as usize, room, REVERB_DAMPING))
                .collect(),
            allpasses: ALLPASS_TUNINGS
                .iter()
                .map(|&size| AllpassFilter::new((size as f64 * scale) as usize))
                .collect(),
            wet: wet.clamp(0.0, 1.0),
        }
    }

    /// Input as it leaves the pre-delay, `pre_delay` seconds late.
    fn pre_delayed(&mut self, input: f64) -> f64 {
        match &mut self.pre_delay {
            Some((line, samples)) => {
                let delayed = line.read(*samples);
                line.write(input);
                delayed
            }
            None => input,
        }
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let fed = self.pre_delayed(input) * FIXED_GAIN;
        let mut tail: f64 = self.combs.iter_mut().map(|c| c.process(fed)).sum();
        for allpass in &mut self.allpasses {
            tail = allpass.process(tail);
        }
        input * (1.0 - self.wet) + tail * self.wet
    }
}

/// Delay whose repeats are fed back into the line.
pub struct FeedbackDelay {
    line: DelayLine,
    delay_samples: usize,
    feedback: f64,
    wet: f64,
}

impl FeedbackDelay {
    pub fn new(time_seconds: f64, feedback: f64, wet: f64, sample_rate: f64) -> Self {
        let delay_samples = ((time_seconds * sample_rate).round() as usize).max(1);
        Self {
            line: DelayLine::new(delay_samples + 1),
            delay_samples,
            feedback: feedback.clamp(0.0, 0.95),
            wet: wet.clamp(0.0, 1.0),
        }
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let delayed = self.line.read(self.delay_samples);
        self.line.write(input + delayed * self.feedback);
        input * (1.0 - self.wet) + delayed * self.wet
    }
}

/// Single-voice chorus: a delay modulated by a sine LFO.
pub struct Chorus {
    line: DelayLine,
    base_delay: f64,
    frequency: f64,
    wet: f64,
    sample_rate: f64,
    position: usize,
}

impl Chorus {
    pub fn new(frequency: f64, delay_ms: f64, wet: f64, sample_rate: f64) -> Self {
        let base_delay = (delay_ms / 1000.0 * sample_rate).max(1.0);
        let max_delay = base_delay * (1.0 + CHORUS_DEPTH);
        Self {
            line: DelayLine::new(max_delay.ceil() as usize + 3),
            base_delay,
            frequency,
            wet: wet.clamp(0.0, 1.0),
            sample_rate,
            position: 0,
        }
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let t = self.position as f64 / self.sample_rate;
        let lfo = (TWO_PI * self.frequency * t).sin();
        let delay = self.base_delay * (1.0 + CHORUS_DEPTH * lfo);
        self.line.write(input);
        let delayed = self.line.read_interpolated(delay);
        self.position += 1;
        input * (1.0 - self.wet) + delayed * self.wet
    }
}

/// Waveshaper transfer curve for a distortion amount in `[0, 1]`.
pub fn distortion_curve(amount: f64, x: f64) -> f64 {
    let k = amount * 100.0;
    let deg = PI / 180.0;
    (3.0 + k) * x * 20.0 * deg / (PI + k * x.abs())
}

/// One node's processing stage.
pub enum Processor {
    /// Output equals input times `gain`.
    Gain(f64),
    Lowpass(Lowpass),
    Reverb(Box<Reverb>),
    Delay(FeedbackDelay),
    Chorus(Chorus),
    Distortion(f64),
}

impl Processor {
    pub fn process_buffer(&mut self, buffer: &mut [f64]) {
        match self {
            Processor::Gain(gain) => buffer.iter_mut().for_each(|s| *s *= *gain),
            Processor::Lowpass(filter) => filter.process_buffer(buffer),
            Processor::Reverb(reverb) => buffer.iter_mut().for_each(|s| *s = reverb.process(*s)),
            Processor::Delay(delay) => buffer.iter_mut().for_each(|s| *s = delay.process(*s)),
            Processor::Chorus(chorus) => buffer.iter_mut().for_each(|s| *s = chorus.process(*s)),
            Processor::Distortion(amount) => buffer
                .iter_mut()
                .for_each(|s| *s = distortion_curve(*amount, *s)),
        }
    }
}
