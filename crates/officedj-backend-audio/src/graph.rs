//! Audio graph planning.
//!
//! [`build_graph_plan`] turns a profile and blueprint into a declarative
//! [`GraphPlan`]: which nodes exist, how they are routed, what each
//! sequence plays, and how the transport is set. Planning is pure; an
//! engine only sees the plan when a session builds it.

use officedj_spec::{Blueprint, Chord, Genre, Note, PitchClass, Profile, Subdivision, Voice};

use crate::engine::NodeId;
use crate::patch::{patch_for, Patch};

/// Master lowpass resonance.
pub const MASTER_FILTER_Q: f64 = 0.7;

/// Upper bound applied to reverb and chorus wet levels.
pub const MAX_REVERB_WET: f64 = 0.9;

/// Upper bound applied to delay wet level.
pub const MAX_DELAY_WET: f64 = 0.8;

/// Upper bound applied to distortion amount.
pub const MAX_DISTORTION: f64 = 0.9;

/// Pitch the kick is triggered at.
pub const KICK_NOTE: Note = Note::natural(PitchClass::C, 1);

/// Role of a node in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Output,
    MasterFilter,
    Reverb,
    Delay,
    Chorus,
    Distortion,
    Instrument(Voice),
}

/// What an engine should create.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    /// Fixed gain stage.
    Gain { gain: f64 },
    /// Lowpass filter.
    Lowpass { frequency: f64, q: f64 },
    /// Reverb with a wet/dry crossfade.
    Reverb {
        decay: f64,
        pre_delay: f64,
        wet: f64,
    },
    /// Feedback delay synced to the transport.
    FeedbackDelay {
        time: Subdivision,
        feedback: f64,
        wet: f64,
    },
    /// Modulated-delay chorus.
    Chorus {
        frequency: f64,
        delay_ms: f64,
        wet: f64,
    },
    /// Waveshaper distortion.
    Distortion { amount: f64 },
    /// A sound source.
    Instrument {
        voice: Voice,
        patch: Patch,
        volume_db: f64,
    },
}

/// A node in the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNode {
    pub key: NodeKey,
    pub spec: NodeSpec,
}

/// Where a planned connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannedTarget {
    Node(NodeKey),
    Destination,
}

/// A planned connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: NodeKey,
    pub to: PlannedTarget,
}

/// What one sequence step triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Several pitches at once.
    Chord(Chord),
    /// One pitch.
    Note(Note),
    /// An unpitched hit.
    Hit,
}

/// A looping sequence bound to an instrument node.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSpec {
    /// The instrument that plays it.
    pub instrument: NodeId,
    /// Steps; `None` is a rest.
    pub events: Vec<Option<Trigger>>,
    /// Step length.
    pub subdivision: Subdivision,
    /// Note length.
    pub duration: Subdivision,
    /// Trigger velocity (0.0 to 1.0).
    pub velocity: f64,
}

/// A looping sequence before it is bound to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSequence {
    pub voice: Voice,
    pub events: Vec<Option<Trigger>>,
    pub subdivision: Subdivision,
    pub duration: Subdivision,
    pub velocity: f64,
}

impl PlannedSequence {
    /// Binds the sequence to the node created for its voice.
    pub fn bind(&self, instrument: NodeId) -> SequenceSpec {
        SequenceSpec {
            instrument,
            events: self.events.clone(),
            subdivision: self.subdivision,
            duration: self.duration,
            velocity: self.velocity,
        }
    }
}

/// Tempo and swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSettings {
    pub bpm: f64,
    pub swing: f64,
    pub swing_subdivision: Subdivision,
}

/// Everything needed to build one arrangement's graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPlan {
    /// Nodes in creation order.
    pub nodes: Vec<PlannedNode>,
    /// Connections in wiring order.
    pub connections: Vec<Connection>,
    /// Sequences in scheduling order.
    pub sequences: Vec<PlannedSequence>,
    /// Transport settings.
    pub transport: TransportSettings,
}

impl GraphPlan {
    /// The planned node for a key.
    pub fn node(&self, key: NodeKey) -> Option<&PlannedNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// True if a connection `from -> to` is planned.
    pub fn is_connected(&self, from: NodeKey, to: PlannedTarget) -> bool {
        self.connections.iter().any(|c| c.from == from && c.to == to)
    }

    /// Targets a node feeds, in wiring order.
    pub fn targets_of(&self, from: NodeKey) -> Vec<PlannedTarget> {
        self.connections
            .iter()
            .filter(|c| c.from == from)
            .map(|c| c.to)
            .collect()
    }
}

struct PlanBuilder {
    nodes: Vec<PlannedNode>,
    connections: Vec<Connection>,
}

impl PlanBuilder {
    fn add(&mut self, key: NodeKey, spec: NodeSpec) {
        self.nodes.push(PlannedNode { key, spec });
    }

    fn connect(&mut self, from: NodeKey, to: NodeKey) {
        self.connections.push(Connection {
            from,
            to: PlannedTarget::Node(to),
        });
    }
}

/// Plans the audio graph for a profile and its blueprint.
///
/// # Arguments
/// * `profile` - Supplies genre, tempo and swing
/// * `blueprint` - Supplies sequences, mix levels and effect settings
///
/// # Returns
/// * The plan; the same inputs always produce the same plan
pub fn build_graph_plan(profile: &Profile, blueprint: &Blueprint) -> GraphPlan {
    let genre = profile.genre;
    let fx = &blueprint.fx;
    let mut b = PlanBuilder {
        nodes: Vec::new(),
        connections: Vec::new(),
    };

    b.add(NodeKey::Output, NodeSpec::Gain { gain: 1.0 });
    b.connections.push(Connection {
        from: NodeKey::Output,
        to: PlannedTarget::Destination,
    });

    let master_in = match fx.master_filter_hz {
        Some(hz) if hz > 0.0 => {
            b.add(
                NodeKey::MasterFilter,
                NodeSpec::Lowpass {
                    frequency: hz,
                    q: MASTER_FILTER_Q,
                },
            );
            b.connect(NodeKey::MasterFilter, NodeKey::Output);
            NodeKey::MasterFilter
        }
        _ => NodeKey::Output,
    };

    b.add(
        NodeKey::Reverb,
        NodeSpec::Reverb {
            decay: if genre == Genre::AltIndieTeen { 5.0 } else { 2.6 },
            pre_delay: 0.01,
            wet: fx.reverb_wet.clamp(0.0, MAX_REVERB_WET),
        },
    );
    b.connect(NodeKey::Reverb, master_in);

    b.add(
        NodeKey::Delay,
        NodeSpec::FeedbackDelay {
            time: if genre == Genre::CuteJpop {
                Subdivision::Eighth
            } else {
                Subdivision::Sixteenth
            },
            feedback: 0.25,
            wet: fx.delay_wet.clamp(0.0, MAX_DELAY_WET),
        },
    );
    b.connect(NodeKey::Delay, master_in);

    let chorus = fx.chorus_wet > 0.0;
    if chorus {
        b.add(
            NodeKey::Chorus,
            NodeSpec::Chorus {
                frequency: 4.0,
                delay_ms: 2.5,
                wet: fx.chorus_wet.clamp(0.0, MAX_REVERB_WET),
            },
        );
        b.connect(NodeKey::Chorus, master_in);
    }

    let distortion = fx.distortion > 0.0;
    if distortion {
        b.add(
            NodeKey::Distortion,
            NodeSpec::Distortion {
                amount: fx.distortion.clamp(0.0, MAX_DISTORTION),
            },
        );
        b.connect(NodeKey::Distortion, master_in);
    }

    let has_lead = blueprint.lead.is_some();
    for voice in Voice::ALL {
        if voice == Voice::Lead && !has_lead {
            continue;
        }
        let key = NodeKey::Instrument(voice);
        b.add(
            key,
            NodeSpec::Instrument {
                voice,
                patch: patch_for(genre, voice),
                volume_db: blueprint.mix.level(voice),
            },
        );

        match voice {
            Voice::Kick => b.connect(key, master_in),
            Voice::Snare | Voice::OpenHat => {
                b.connect(key, master_in);
                b.connect(key, NodeKey::Reverb);
            }
            Voice::Hat => {
                b.connect(key, master_in);
                if genre != Genre::ArenaRock {
                    b.connect(key, NodeKey::Reverb);
                }
            }
            Voice::Pad => {
                b.connect(key, master_in);
                b.connect(key, NodeKey::Reverb);
                if fx.delay_wet > 0.0 {
                    b.connect(key, NodeKey::Delay);
                }
                if chorus {
                    b.connect(key, NodeKey::Chorus);
                }
            }
            Voice::Bass => {
                if distortion {
                    b.connect(key, NodeKey::Distortion);
                } else {
                    b.connect(key, master_in);
                }
            }
            Voice::Lead => {
                b.connect(key, master_in);
                b.connect(key, NodeKey::Reverb);
                b.connect(key, NodeKey::Delay);
            }
        }
    }

    GraphPlan {
        nodes: b.nodes,
        connections: b.connections,
        sequences: plan_sequences(blueprint),
        transport: TransportSettings {
            bpm: profile.bpm as f64,
            swing: profile.swing,
            swing_subdivision: Subdivision::Eighth,
        },
    }
}

fn plan_sequences(blueprint: &Blueprint) -> Vec<PlannedSequence> {
    let drums = &blueprint.drums;
    let hits = |steps: &[bool], trigger: Trigger| -> Vec<Option<Trigger>> {
        steps
            .iter()
            .map(|hit| hit.then(|| trigger.clone()))
            .collect()
    };
    let drum = |voice, events, duration, velocity| PlannedSequence {
        voice,
        events,
        subdivision: drums.subdivision,
        duration,
        velocity,
    };

    let mut sequences = vec![
        PlannedSequence {
            voice: Voice::Pad,
            events: blueprint
                .pad
                .events
                .iter()
                .map(|e| e.clone().map(Trigger::Chord))
                .collect(),
            subdivision: blueprint.pad.subdivision,
            duration: blueprint.pad.duration,
            velocity: 1.0,
        },
        PlannedSequence {
            voice: Voice::Bass,
            events: blueprint.bass.events.iter().map(|e| e.map(Trigger::Note)).collect(),
            subdivision: blueprint.bass.subdivision,
            duration: blueprint.bass.duration,
            velocity: 0.9,
        },
        drum(
            Voice::Kick,
            hits(&drums.kick, Trigger::Note(KICK_NOTE)),
            Subdivision::Sixteenth,
            0.9,
        ),
        drum(
            Voice::Snare,
            hits(&drums.snare, Trigger::Hit),
            Subdivision::Sixteenth,
            0.7,
        ),
        drum(
            Voice::Hat,
            hits(&drums.hat, Trigger::Hit),
            Subdivision::ThirtySecond,
            0.35,
        ),
        drum(
            Voice::OpenHat,
            hits(&drums.open_hat, Trigger::Hit),
            Subdivision::Sixteenth,
            0.25,
        ),
    ];

    if let Some(lead) = &blueprint.lead {
        sequences.push(PlannedSequence {
            voice: Voice::Lead,
            events: lead.events.iter().map(|e| e.map(Trigger::Note)).collect(),
            subdivision: lead.subdivision,
            duration: lead.duration,
            velocity: 0.6,
        });
    }

    sequences
}

#[cfg(test)]
mod tests {
    use super::*;
    use officedj_compose::Arrangement;
    use pretty_assertions::assert_eq;

    fn plan(text: &str, path: &str) -> GraphPlan {
        let a = Arrangement::compose(text, path, 0);
        build_graph_plan(&a.profile, &a.blueprint)
    }

    #[test]
    fn test_techno_master_filter_and_distortion() {
        let plan = plan("LED 조명 7개 설치", "/jiwon");
        assert_eq!(
            plan.node(NodeKey::MasterFilter).map(|n| &n.spec),
            Some(&NodeSpec::Lowpass {
                frequency: 2400.0,
                q: MASTER_FILTER_Q
            })
        );
        assert!(plan.is_connected(NodeKey::MasterFilter, PlannedTarget::Node(NodeKey::Output)));
        assert!(plan.is_connected(NodeKey::Output, PlannedTarget::Destination));
        assert!(plan.node(NodeKey::Distortion).is_some());
        assert_eq!(
            plan.targets_of(NodeKey::Instrument(Voice::Bass)),
            vec![PlannedTarget::Node(NodeKey::Distortion)]
        );
        assert!(plan.node(NodeKey::Chorus).is_none());
        assert!(plan.node(NodeKey::Instrument(Voice::Lead)).is_none());
        assert_eq!(plan.sequences.len(), 6);
    }

    #[test]
    fn test_rock_has_no_filter_and_dry_hat() {
        let plan = plan("", "/jungah");
        assert!(plan.node(NodeKey::MasterFilter).is_none());
        assert_eq!(
            plan.targets_of(NodeKey::Instrument(Voice::Hat)),
            vec![PlannedTarget::Node(NodeKey::Output)]
        );
        assert!(plan.is_connected(NodeKey::Reverb, PlannedTarget::Node(NodeKey::Output)));
    }

    #[test]
    fn test_pop_lead_and_pad_routing() {
        let plan = plan("", "/yeju");
        let lead = NodeKey::Instrument(Voice::Lead);
        assert!(plan.node(lead).is_some());
        assert_eq!(
            plan.targets_of(lead),
            vec![
                PlannedTarget::Node(NodeKey::MasterFilter),
                PlannedTarget::Node(NodeKey::Reverb),
                PlannedTarget::Node(NodeKey::Delay)
            ]
        );
        assert_eq!(
            plan.targets_of(NodeKey::Instrument(Voice::Pad)),
            vec![
                PlannedTarget::Node(NodeKey::MasterFilter),
                PlannedTarget::Node(NodeKey::Reverb),
                PlannedTarget::Node(NodeKey::Delay),
                PlannedTarget::Node(NodeKey::Chorus)
            ]
        );
        match &plan.node(NodeKey::Delay).unwrap().spec {
            NodeSpec::FeedbackDelay { time, .. } => assert_eq!(*time, Subdivision::Eighth),
            other => panic!("unexpected spec {:?}", other),
        }
        let lead_seq = plan.sequences.last().unwrap();
        assert_eq!(lead_seq.voice, Voice::Lead);
        assert_eq!(lead_seq.velocity, 0.6);
    }

    #[test]
    fn test_indie_reverb_decay_and_transport() {
        let a = Arrangement::compose("", "/seowoo", 0);
        let plan = build_graph_plan(&a.profile, &a.blueprint);
        match &plan.node(NodeKey::Reverb).unwrap().spec {
            NodeSpec::Reverb { decay, wet, .. } => {
                assert_eq!(*decay, 5.0);
                assert_eq!(*wet, 0.42);
            }
            other => panic!("unexpected spec {:?}", other),
        }
        assert_eq!(plan.transport.bpm, a.profile.bpm as f64);
        assert_eq!(plan.transport.swing, 0.08);
        assert_eq!(plan.transport.swing_subdivision, Subdivision::Eighth);
    }

    #[test]
    fn test_drum_sequences() {
        let plan = plan("", "/jasang");
        let kick = plan
            .sequences
            .iter()
            .find(|s| s.voice == Voice::Kick)
            .unwrap();
        assert_eq!(kick.events.len(), 16);
        assert_eq!(kick.events[0], Some(Trigger::Note(KICK_NOTE)));
        assert_eq!(kick.events[1], None);
        assert_eq!(kick.velocity, 0.9);
        let hat = plan.sequences.iter().find(|s| s.voice == Voice::Hat).unwrap();
        assert_eq!(hat.duration, Subdivision::ThirtySecond);
    }

    #[test]
    fn test_plan_is_deterministic() {
        assert_eq!(plan("휴식 공간", "/chaebin"), plan("휴식 공간", "/chaebin"));
    }
}
