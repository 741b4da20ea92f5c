//! Transport timing for offline rendering.
//!
//! Positions are kept in quarter-note beats and only converted to seconds at
//! the end so that loop boundaries stay exact.

use officedj_spec::Subdivision;

use crate::graph::{SequenceSpec, TransportSettings};

const GRID_EPSILON: f64 = 1e-9;

/// One triggered step of a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    /// Onset in seconds from transport start, swing applied.
    pub time: f64,
    /// Index into the sequence's events.
    pub step: usize,
    /// Loop iteration the event belongs to.
    pub iteration: usize,
}

/// Tempo clock with swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    settings: TransportSettings,
}

impl Transport {
    pub fn new(settings: TransportSettings) -> Self {
        Self { settings }
    }

    /// Tempo in beats per minute.
    pub fn bpm(&self) -> f64 {
        self.settings.bpm
    }

    /// Seconds per quarter-note beat.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.settings.bpm
    }

    /// Length of a subdivision in seconds.
    pub fn seconds(&self, subdivision: Subdivision) -> f64 {
        subdivision.seconds(self.settings.bpm)
    }

    /// Seconds in `bars` bars of 4/4.
    pub fn bars_to_seconds(&self, bars: u32) -> f64 {
        bars as f64 * 4.0 * self.seconds_per_beat()
    }

    /// Delay added to an event at `position` beats.
    ///
    /// Positions on the grid of twice the swing subdivision are untouched.
    /// Others move later by `sin(progress * PI) * swing` of two thirds of a
    /// swing subdivision, where `progress` is the position within that grid
    /// cell.
    pub fn swing_offset(&self, position: f64) -> f64 {
        let swing = self.settings.swing;
        if swing <= 0.0 {
            return 0.0;
        }
        let cell = self.settings.swing_subdivision.beats() * 2.0;
        let within = position.rem_euclid(cell);
        if within < GRID_EPSILON || cell - within < GRID_EPSILON {
            return 0.0;
        }
        let progress = within / cell;
        let amount = (progress * std::f64::consts::PI).sin() * swing;
        amount * (cell / 3.0) * self.seconds_per_beat()
    }

    /// Every triggered step of a looping sequence that starts before
    /// `length` seconds.
    ///
    /// Rests produce no events.
    pub fn events(&self, sequence: &SequenceSpec, length: f64) -> Vec<ScheduledEvent> {
        let steps = sequence.events.len();
        if steps == 0 {
            return Vec::new();
        }
        let step_beats = sequence.subdivision.beats();
        let loop_beats = step_beats * steps as f64;
        let length_beats = length / self.seconds_per_beat();

        let mut scheduled = Vec::new();
        let mut iteration = 0;
        while (iteration as f64) * loop_beats < length_beats - GRID_EPSILON {
            for (step, event) in sequence.events.iter().enumerate() {
                if event.is_none() {
                    continue;
                }
                let position = iteration as f64 * loop_beats + step as f64 * step_beats;
                if position >= length_beats - GRID_EPSILON {
                    break;
                }
                scheduled.push(ScheduledEvent {
                    time: position * self.seconds_per_beat() + self.swing_offset(position),
                    step,
                    iteration,
                });
            }
            iteration += 1;
        }
        scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NodeId;
    use crate::graph::Trigger;

    fn transport(bpm: f64, swing: f64) -> Transport {
        Transport::new(TransportSettings {
            bpm,
            swing,
            swing_subdivision: Subdivision::Eighth,
        })
    }

    fn sequence(pattern: &[bool], subdivision: Subdivision) -> SequenceSpec {
        SequenceSpec {
            instrument: NodeId(0),
            events: pattern.iter().map(|h| h.then_some(Trigger::Hit)).collect(),
            subdivision,
            duration: Subdivision::Sixteenth,
            velocity: 1.0,
        }
    }

    #[test]
    fn test_no_swing_on_quarter_grid() {
        let t = transport(120.0, 0.2);
        assert_eq!(t.swing_offset(0.0), 0.0);
        assert_eq!(t.swing_offset(1.0), 0.0);
        assert_eq!(t.swing_offset(7.0), 0.0);
    }

    #[test]
    fn test_offbeat_eighth_gets_full_swing() {
        let t = transport(120.0, 0.3);
        // Two thirds of an eighth at 120 bpm is 1/6 s.
        let expected = 0.3 / 6.0;
        assert!((t.swing_offset(0.5) - expected).abs() < 1e-12);
        assert!((t.swing_offset(2.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sixteenths_get_partial_swing() {
        let t = transport(120.0, 0.3);
        let full = t.swing_offset(0.5);
        let quarter = t.swing_offset(0.25);
        let three_quarter = t.swing_offset(0.75);
        let ratio = std::f64::consts::FRAC_1_SQRT_2;
        assert!((quarter - full * ratio).abs() < 1e-12);
        assert!((three_quarter - quarter).abs() < 1e-12);
    }

    #[test]
    fn test_zero_swing_is_straight() {
        let t = transport(100.0, 0.0);
        assert_eq!(t.swing_offset(0.5), 0.0);
    }

    #[test]
    fn test_sequence_loops_to_fill_length() {
        let t = transport(120.0, 0.0);
        let mut pattern = [false; 16];
        pattern[0] = true;
        pattern[4] = true;
        let seq = sequence(&pattern, Subdivision::Sixteenth);
        let events = t.events(&seq, t.bars_to_seconds(2));
        assert_eq!(events.len(), 4);
        assert_eq!(events[2].iteration, 1);
        assert_eq!(events[2].step, 0);
        assert!((events[2].time - 2.0).abs() < 1e-12);
        assert!((events[3].time - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_events_stop_at_length() {
        let t = transport(120.0, 0.0);
        let seq = sequence(&[true, true], Subdivision::Measure);
        let events = t.events(&seq, t.bars_to_seconds(3));
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].iteration, 1);
        assert_eq!(events[2].step, 0);
    }

    #[test]
    fn test_empty_sequence_has_no_events() {
        let t = transport(120.0, 0.1);
        assert!(t.events(&sequence(&[], Subdivision::Eighth), 10.0).is_empty());
    }
}
