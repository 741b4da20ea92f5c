//! Deterministic offline [`AudioEngine`].
//!
//! The engine records the node graph, sequences and transport settings it
//! is given and renders them into a mono buffer on demand. Rendering always
//! starts at transport position 0 and covers whole bars; identical graphs
//! render to identical PCM.

pub mod effects;
pub mod transport;
pub mod voices;

use std::collections::BTreeMap;

use officedj_spec::config::{MAX_BARS, MAX_RENDER_SAMPLES, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};
use officedj_spec::{Voice, MUTED_DB};

use crate::engine::{AudioEngine, NodeId, PartId, Target};
use crate::error::{AudioError, AudioResult, EngineError};
use crate::filter::Lowpass;
use crate::graph::{NodeSpec, SequenceSpec, TransportSettings};
use crate::rng::event_rng;
use crate::wav;

use effects::{Chorus, FeedbackDelay, Processor, Reverb};
use transport::Transport;

/// Seed used when none is given.
pub const DEFAULT_SEED: u32 = 0;

/// How the engine answers `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartPolicy {
    Accept,
    Reject,
    /// Rejects this many calls, then accepts.
    FailTimes(u32),
}

#[derive(Debug, Clone)]
struct ScheduledPart {
    sequence: SequenceSpec,
    stopped: bool,
}

/// A rendered mono buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    /// Samples in `[-1, 1]`.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// BLAKE3 hex digest of the 16-bit PCM data.
    pub pcm_hash: String,
}

impl RenderedAudio {
    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Highest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |m, s| m.max(s.abs()))
    }

    /// Encodes the buffer as a 16-bit mono WAV file in memory.
    pub fn to_wav_bytes(&self) -> AudioResult<Vec<u8>> {
        wav::encode_wav(&self.samples, self.sample_rate)
    }

    /// Writes the buffer as a 16-bit mono WAV file.
    pub fn write_wav(&self, path: &std::path::Path) -> AudioResult<()> {
        wav::write_wav(path, &self.samples, self.sample_rate)
    }
}

/// An engine that renders to memory instead of a device.
#[derive(Debug, Clone)]
pub struct OfflineEngine {
    sample_rate: u32,
    seed: u32,
    available: bool,
    policy: StartPolicy,
    started: bool,
    start_calls: u32,
    next_id: u32,
    nodes: BTreeMap<NodeId, NodeSpec>,
    connections: Vec<(NodeId, Target)>,
    parts: BTreeMap<PartId, ScheduledPart>,
    transport: Option<TransportSettings>,
    transport_offset: Option<f64>,
}

impl OfflineEngine {
    /// Creates an available engine that accepts `start`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            seed: DEFAULT_SEED,
            available: true,
            policy: StartPolicy::Accept,
            started: false,
            start_calls: 0,
            next_id: 0,
            nodes: BTreeMap::new(),
            connections: Vec::new(),
            parts: BTreeMap::new(),
            transport: None,
            transport_offset: None,
        }
    }

    /// Creates an engine whose `is_available` is false.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(officedj_spec::config::DEFAULT_SAMPLE_RATE)
        }
    }

    /// Creates an engine that always refuses to start.
    pub fn rejecting() -> Self {
        Self {
            policy: StartPolicy::Reject,
            ..Self::new(officedj_spec::config::DEFAULT_SAMPLE_RATE)
        }
    }

    /// Makes the first `failures` calls to `start` fail.
    pub fn with_start_failures(mut self, failures: u32) -> Self {
        self.policy = StartPolicy::FailTimes(failures);
        self
    }

    /// Sets the seed for noise sources.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// True after a successful `start`.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of times `start` was called.
    pub fn start_calls(&self) -> u32 {
        self.start_calls
    }

    /// Nodes not yet disposed.
    pub fn live_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Parts not yet disposed.
    pub fn live_part_count(&self) -> usize {
        self.parts.len()
    }

    /// The node description a live node was created from.
    pub fn node(&self, id: NodeId) -> Option<&NodeSpec> {
        self.nodes.get(&id)
    }

    /// Live connections in creation order.
    pub fn connections(&self) -> &[(NodeId, Target)] {
        &self.connections
    }

    /// Current transport settings.
    pub fn transport(&self) -> Option<TransportSettings> {
        self.transport
    }

    /// Offset passed to the last `start_transport`, if it is running.
    pub fn transport_offset(&self) -> Option<f64> {
        self.transport_offset
    }

    /// True while the transport is running.
    pub fn is_transport_running(&self) -> bool {
        self.transport_offset.is_some()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Renders `bars` bars of every live, unstopped part.
    ///
    /// # Arguments
    /// * `bars` - Length of the render in 4/4 bars
    ///
    /// # Returns
    /// * The mixed buffer; sound reaching the destination after the last bar
    ///   is cut off
    pub fn render(&self, bars: u32) -> AudioResult<RenderedAudio> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(AudioError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        if bars == 0 || bars > MAX_BARS {
            return Err(AudioError::InvalidBars { bars });
        }
        let settings = self.transport.ok_or(AudioError::TransportNotConfigured)?;
        let transport = Transport::new(settings);
        let sample_rate = self.sample_rate as f64;
        let length = transport.bars_to_seconds(bars);
        let total = (length * sample_rate).round() as usize;
        if total > MAX_RENDER_SAMPLES {
            return Err(AudioError::RenderTooLong {
                samples: total,
                max: MAX_RENDER_SAMPLES,
            });
        }

        let order = self.processing_order()?;
        // Input buffers exist only between their first write and their
        // node's turn.
        let mut inputs: BTreeMap<NodeId, Vec<f64>> = BTreeMap::new();
        let mut output = vec![0.0; total];

        for id in order {
            let spec = &self.nodes[&id];
            let mut buffer = inputs.remove(&id).unwrap_or_else(|| vec![0.0; total]);
            if let NodeSpec::Instrument { voice, .. } = spec {
                self.render_instrument(id, *voice, spec, &transport, length, &mut buffer);
            }
            processor_for(spec, &transport, sample_rate).process_buffer(&mut buffer);

            for (_, target) in self.connections.iter().filter(|(from, _)| *from == id) {
                let sink = match target {
                    Target::Node(to) if self.nodes.contains_key(to) => {
                        inputs.entry(*to).or_insert_with(|| vec![0.0; total])
                    }
                    Target::Node(_) => continue,
                    Target::Destination => &mut output,
                };
                for (s, b) in sink.iter_mut().zip(&buffer) {
                    *s += b;
                }
            }
        }

        let peak = output.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        if peak > 1.0 {
            output.iter_mut().for_each(|s| *s /= peak);
        }

        Ok(RenderedAudio {
            pcm_hash: wav::pcm_hash(&output),
            samples: output,
            sample_rate: self.sample_rate,
        })
    }

    fn render_instrument(
        &self,
        id: NodeId,
        voice: Voice,
        spec: &NodeSpec,
        transport: &Transport,
        length: f64,
        buffer: &mut [f64],
    ) {
        let NodeSpec::Instrument { patch, volume_db, .. } = spec else {
            return;
        };
        let gain = db_to_gain(*volume_db);
        if gain == 0.0 {
            return;
        }
        let sample_rate = self.sample_rate as f64;

        for (part_id, part) in &self.parts {
            if part.stopped || part.sequence.instrument != id {
                continue;
            }
            let sequence = &part.sequence;
            let gate = transport.seconds(sequence.duration);
            for event in transport.events(sequence, length) {
                let Some(trigger) = &sequence.events[event.step] else {
                    continue;
                };
                let key = format!("{}/{}/{}/{}", voice, part_id, event.iteration, event.step);
                let mut rng = event_rng(self.seed, &key);
                let note = voices::render_note(
                    patch,
                    trigger,
                    gate,
                    sequence.velocity,
                    sample_rate,
                    &mut rng,
                );
                let start = (event.time * sample_rate).round() as usize;
                for (s, n) in buffer.iter_mut().skip(start).zip(note) {
                    *s += n * gain;
                }
            }
        }
    }

    /// Nodes ordered so that every node comes after all nodes feeding it.
    fn processing_order(&self) -> AudioResult<Vec<NodeId>> {
        let mut indegree: BTreeMap<NodeId, usize> = self.nodes.keys().map(|id| (*id, 0)).collect();
        for (_, target) in &self.connections {
            if let Target::Node(to) = target {
                if let Some(count) = indegree.get_mut(to) {
                    *count += 1;
                }
            }
        }

        let mut ready: Vec<NodeId> = indegree
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();
        ready.reverse();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(id) = ready.pop() {
            order.push(id);
            for (_, target) in self.connections.iter().filter(|(from, _)| *from == id) {
                if let Target::Node(to) = target {
                    if let Some(count) = indegree.get_mut(to) {
                        *count -= 1;
                        if *count == 0 {
                            ready.push(*to);
                        }
                    }
                }
            }
        }

        if order.len() < self.nodes.len() {
            let stuck = indegree
                .iter()
                .find(|(_, count)| **count > 0)
                .map(|(id, _)| *id)
                .unwrap_or(NodeId(0));
            return Err(AudioError::RoutingCycle(stuck));
        }
        Ok(order)
    }
}

fn db_to_gain(db: f64) -> f64 {
    if db <= MUTED_DB {
        0.0
    } else {
        10f64.powf(db / 20.0)
    }
}

fn processor_for(spec: &NodeSpec, transport: &Transport, sample_rate: f64) -> Processor {
    match spec {
        NodeSpec::Gain { gain } => Processor::Gain(*gain),
        NodeSpec::Lowpass { frequency, q } => {
            Processor::Lowpass(Lowpass::new(*frequency, *q, sample_rate))
        }
        NodeSpec::Reverb {
            decay,
            pre_delay,
            wet,
        } => Processor::Reverb(Box::new(Reverb::new(*decay, *pre_delay, *wet, sample_rate))),
        NodeSpec::FeedbackDelay {
            time,
            feedback,
            wet,
        } => Processor::Delay(FeedbackDelay::new(
            transport.seconds(*time),
            *feedback,
            *wet,
            sample_rate,
        )),
        NodeSpec::Chorus {
            frequency,
            delay_ms,
            wet,
        } => Processor::Chorus(Chorus::new(*frequency, *delay_ms, *wet, sample_rate)),
        NodeSpec::Distortion { amount } => Processor::Distortion(*amount),
        NodeSpec::Instrument { .. } => Processor::Gain(1.0),
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EngineError::invalid_param(
            name,
            format!("must be 0.0-1.0, got {}", value),
        ));
    }
    Ok(())
}

fn check_node(spec: &NodeSpec) -> Result<(), EngineError> {
    match spec {
        NodeSpec::Gain { gain } => {
            if !gain.is_finite() || *gain < 0.0 {
                return Err(EngineError::invalid_param(
                    "gain",
                    format!("must be a finite non-negative number, got {}", gain),
                ));
            }
        }
        NodeSpec::Lowpass { frequency, q } => {
            if !frequency.is_finite() || *frequency <= 0.0 {
                return Err(EngineError::invalid_param(
                    "lowpass.frequency",
                    format!("must be positive, got {}", frequency),
                ));
            }
            if *q <= 0.0 {
                return Err(EngineError::invalid_param(
                    "lowpass.q",
                    format!("must be positive, got {}", q),
                ));
            }
        }
        NodeSpec::Reverb {
            decay,
            pre_delay,
            wet,
        } => {
            if *decay <= 0.0 || *pre_delay < 0.0 {
                return Err(EngineError::invalid_param(
                    "reverb",
                    format!("decay {} and pre-delay {} must be positive", decay, pre_delay),
                ));
            }
            check_unit("reverb.wet", *wet)?;
        }
        NodeSpec::FeedbackDelay { feedback, wet, .. } => {
            check_unit("delay.feedback", *feedback)?;
            check_unit("delay.wet", *wet)?;
        }
        NodeSpec::Chorus {
            frequency,
            delay_ms,
            wet,
        } => {
            if *frequency <= 0.0 || *delay_ms <= 0.0 {
                return Err(EngineError::invalid_param(
                    "chorus",
                    format!("frequency {} and delay {} must be positive", frequency, delay_ms),
                ));
            }
            check_unit("chorus.wet", *wet)?;
        }
        NodeSpec::Distortion { amount } => check_unit("distortion.amount", *amount)?,
        NodeSpec::Instrument { volume_db, .. } => {
            if volume_db.is_nan() {
                return Err(EngineError::invalid_param("volume", "must be a number"));
            }
        }
    }
    Ok(())
}

impl AudioEngine for OfflineEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn start(&mut self) -> Result<(), EngineError> {
        if !self.available {
            return Err(EngineError::Unavailable);
        }
        self.start_calls += 1;
        match self.policy {
            StartPolicy::Accept => {}
            StartPolicy::Reject => {
                return Err(EngineError::StartRejected(
                    "user gesture required".to_string(),
                ));
            }
            StartPolicy::FailTimes(remaining) => {
                if remaining > 0 {
                    self.policy = StartPolicy::FailTimes(remaining - 1);
                    return Err(EngineError::StartRejected(
                        "user gesture required".to_string(),
                    ));
                }
            }
        }
        self.started = true;
        Ok(())
    }

    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, EngineError> {
        check_node(&spec)?;
        let id = NodeId(self.allocate());
        self.nodes.insert(id, spec);
        Ok(id)
    }

    fn connect(&mut self, from: NodeId, to: Target) -> Result<(), EngineError> {
        if !self.nodes.contains_key(&from) {
            return Err(EngineError::UnknownNode(from));
        }
        if let Target::Node(node) = to {
            if !self.nodes.contains_key(&node) {
                return Err(EngineError::UnknownNode(node));
            }
        }
        self.connections.push((from, to));
        Ok(())
    }

    fn schedule(&mut self, sequence: SequenceSpec) -> Result<PartId, EngineError> {
        match self.nodes.get(&sequence.instrument) {
            Some(NodeSpec::Instrument { .. }) => {}
            Some(_) => {
                return Err(EngineError::invalid_param(
                    "sequence.instrument",
                    format!("{} is not an instrument", sequence.instrument),
                ));
            }
            None => return Err(EngineError::UnknownNode(sequence.instrument)),
        }
        check_unit("sequence.velocity", sequence.velocity)?;
        let id = PartId(self.allocate());
        self.parts.insert(
            id,
            ScheduledPart {
                sequence,
                stopped: false,
            },
        );
        Ok(id)
    }

    fn stop_part(&mut self, part: PartId) -> Result<(), EngineError> {
        let scheduled = self.parts.get_mut(&part).ok_or(EngineError::UnknownPart(part))?;
        scheduled.stopped = true;
        Ok(())
    }

    fn dispose_part(&mut self, part: PartId) -> Result<(), EngineError> {
        self.parts
            .remove(&part)
            .map(|_| ())
            .ok_or(EngineError::UnknownPart(part))
    }

    fn dispose_node(&mut self, node: NodeId) -> Result<(), EngineError> {
        self.nodes.remove(&node).ok_or(EngineError::UnknownNode(node))?;
        self.connections
            .retain(|(from, to)| *from != node && *to != Target::Node(node));
        Ok(())
    }

    fn configure_transport(&mut self, settings: TransportSettings) -> Result<(), EngineError> {
        if !settings.bpm.is_finite() || settings.bpm <= 0.0 {
            return Err(EngineError::invalid_param(
                "transport.bpm",
                format!("must be positive, got {}", settings.bpm),
            ));
        }
        check_unit("transport.swing", settings.swing)?;
        self.transport = Some(settings);
        Ok(())
    }

    fn cancel_transport(&mut self) -> Result<(), EngineError> {
        for part in self.parts.values_mut() {
            part.stopped = true;
        }
        Ok(())
    }

    fn start_transport(&mut self, offset_seconds: f64) -> Result<(), EngineError> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        if self.transport.is_none() {
            return Err(EngineError::invalid_param(
                "transport",
                "must be configured before starting",
            ));
        }
        self.transport_offset = Some(offset_seconds.max(0.0));
        Ok(())
    }

    fn stop_transport(&mut self) -> Result<(), EngineError> {
        self.transport_offset = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph_plan, Trigger};
    use crate::patch::patch_for;
    use officedj_spec::{Genre, Subdivision};

    fn settings() -> TransportSettings {
        TransportSettings {
            bpm: 120.0,
            swing: 0.0,
            swing_subdivision: Subdivision::Eighth,
        }
    }

    fn kick_engine() -> (OfflineEngine, NodeId) {
        let mut engine = OfflineEngine::new(8_000);
        let out = engine.create_node(NodeSpec::Gain { gain: 1.0 }).unwrap();
        engine.connect(out, Target::Destination).unwrap();
        let kick = engine
            .create_node(NodeSpec::Instrument {
                voice: Voice::Kick,
                patch: patch_for(Genre::BerlinTechno, Voice::Kick),
                volume_db: -6.0,
            })
            .unwrap();
        engine.connect(kick, Target::Node(out)).unwrap();
        engine.configure_transport(settings()).unwrap();
        (engine, kick)
    }

    fn pulse(instrument: NodeId) -> SequenceSpec {
        SequenceSpec {
            instrument,
            events: vec![Some(Trigger::Hit), None, None, None],
            subdivision: Subdivision::Quarter,
            duration: Subdivision::Sixteenth,
            velocity: 0.9,
        }
    }

    #[tokio::test]
    async fn test_start_policies() {
        let mut engine = OfflineEngine::new(8_000);
        assert!(engine.start().await.is_ok());
        assert!(engine.is_started());

        let mut rejecting = OfflineEngine::rejecting();
        assert!(matches!(
            rejecting.start().await,
            Err(EngineError::StartRejected(_))
        ));
        assert!(!rejecting.is_started());

        let mut flaky = OfflineEngine::new(8_000).with_start_failures(1);
        assert!(flaky.start().await.is_err());
        assert!(flaky.start().await.is_ok());
        assert_eq!(flaky.start_calls(), 2);

        let mut missing = OfflineEngine::unavailable();
        assert!(!missing.is_available());
        assert!(matches!(missing.start().await, Err(EngineError::Unavailable)));
    }

    #[test]
    fn test_render_requires_transport() {
        let engine = OfflineEngine::new(8_000);
        assert!(matches!(
            engine.render(1),
            Err(AudioError::TransportNotConfigured)
        ));
    }

    #[test]
    fn test_render_rejects_bad_settings() {
        let (engine, _) = kick_engine();
        assert!(matches!(engine.render(0), Err(AudioError::InvalidBars { bars: 0 })));
        let mut slow = OfflineEngine::new(100);
        slow.configure_transport(settings()).unwrap();
        assert!(matches!(
            slow.render(1),
            Err(AudioError::InvalidSampleRate { rate: 100 })
        ));
    }

    #[test]
    fn test_render_length_is_capped() {
        let mut engine = OfflineEngine::new(192_000);
        engine.configure_transport(settings()).unwrap();
        match engine.render(MAX_BARS) {
            Err(AudioError::RenderTooLong { samples, max }) => {
                assert_eq!(samples, 98_304_000);
                assert_eq!(max, MAX_RENDER_SAMPLES);
            }
            other => panic!("unexpected render result {:?}", other.map(|a| a.samples.len())),
        }
    }

    #[test]
    fn test_render_places_hits_on_beats() {
        let (mut engine, kick) = kick_engine();
        engine.schedule(pulse(kick)).unwrap();
        let audio = engine.render(1).unwrap();
        // One bar at 120 bpm is two seconds.
        assert_eq!(audio.samples.len(), 16_000);
        assert!(audio.peak() > 0.05);
        let beat = 4_000;
        let energy = |range: std::ops::Range<usize>| -> f64 {
            audio.samples[range].iter().map(|s| s * s).sum()
        };
        assert!(energy(0..500) > 0.0);
        assert!(energy(beat + 2_000..beat * 4).abs() < 1e-12);
    }

    #[test]
    fn test_stopped_and_muted_parts_are_silent() {
        let (mut engine, kick) = kick_engine();
        let part = engine.schedule(pulse(kick)).unwrap();
        engine.stop_part(part).unwrap();
        assert_eq!(engine.render(1).unwrap().peak(), 0.0);

        let (mut muted, kick) = kick_engine();
        if let Some(NodeSpec::Instrument { volume_db, .. }) = muted.nodes.get_mut(&kick) {
            *volume_db = MUTED_DB;
        }
        muted.schedule(pulse(kick)).unwrap();
        assert_eq!(muted.render(1).unwrap().peak(), 0.0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = officedj_compose::Arrangement::compose("LED 조명 7개 설치", "/jiwon", 0);
        let plan = build_graph_plan(&a.profile, &a.blueprint);
        let build = || {
            let mut engine = OfflineEngine::new(8_000).with_seed(a.profile.seed);
            let mut ids = BTreeMap::new();
            for node in &plan.nodes {
                ids.insert(node.key, engine.create_node(node.spec.clone()).unwrap());
            }
            for c in &plan.connections {
                let to = match c.to {
                    crate::graph::PlannedTarget::Node(key) => Target::Node(ids[&key]),
                    crate::graph::PlannedTarget::Destination => Target::Destination,
                };
                engine.connect(ids[&c.from], to).unwrap();
            }
            for seq in &plan.sequences {
                let id = ids[&crate::graph::NodeKey::Instrument(seq.voice)];
                engine.schedule(seq.bind(id)).unwrap();
            }
            engine.configure_transport(plan.transport).unwrap();
            engine.render(1).unwrap()
        };
        let first = build();
        let second = build();
        assert_eq!(first.pcm_hash, second.pcm_hash);
        assert!(first.peak() > 0.0 && first.peak() <= 1.0);
    }

    #[test]
    fn test_fan_in_sums_sources() {
        let mut engine = OfflineEngine::new(8_000);
        let bus = engine.create_node(NodeSpec::Gain { gain: 0.25 }).unwrap();
        engine.connect(bus, Target::Destination).unwrap();
        let mut parts = Vec::new();
        for _ in 0..2 {
            let kick = engine
                .create_node(NodeSpec::Instrument {
                    voice: Voice::Kick,
                    patch: patch_for(Genre::BerlinTechno, Voice::Kick),
                    volume_db: -6.0,
                })
                .unwrap();
            engine.connect(kick, Target::Node(bus)).unwrap();
            parts.push(engine.schedule(pulse(kick)).unwrap());
        }
        engine.configure_transport(settings()).unwrap();

        let both = engine.render(1).unwrap();
        let mut first = engine.clone();
        first.stop_part(parts[1]).unwrap();
        let mut second = engine.clone();
        second.stop_part(parts[0]).unwrap();
        let first = first.render(1).unwrap();
        let second = second.render(1).unwrap();

        assert!(both.peak() > first.peak());
        for ((sum, a), b) in both.samples.iter().zip(&first.samples).zip(&second.samples) {
            assert!((sum - (a + b)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dispose_node_drops_connections() {
        let (mut engine, kick) = kick_engine();
        assert_eq!(engine.connections().len(), 2);
        engine.dispose_node(kick).unwrap();
        assert_eq!(engine.connections().len(), 1);
        assert!(matches!(
            engine.dispose_node(kick),
            Err(EngineError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut engine = OfflineEngine::new(8_000);
        let a = engine.create_node(NodeSpec::Gain { gain: 1.0 }).unwrap();
        let b = engine.create_node(NodeSpec::Gain { gain: 1.0 }).unwrap();
        engine.connect(a, Target::Node(b)).unwrap();
        engine.connect(b, Target::Node(a)).unwrap();
        engine.configure_transport(settings()).unwrap();
        assert!(matches!(engine.render(1), Err(AudioError::RoutingCycle(_))));
    }

    #[test]
    fn test_invalid_nodes_are_rejected() {
        let mut engine = OfflineEngine::new(8_000);
        let err = engine
            .create_node(NodeSpec::Distortion { amount: 1.5 })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { .. }));
        let out = engine.create_node(NodeSpec::Gain { gain: 1.0 }).unwrap();
        assert!(matches!(
            engine.schedule(pulse(out)),
            Err(EngineError::InvalidParameter { .. })
        ));
        assert!(matches!(
            engine.connect(NodeId(99), Target::Destination),
            Err(EngineError::UnknownNode(NodeId(99)))
        ));
    }
}
