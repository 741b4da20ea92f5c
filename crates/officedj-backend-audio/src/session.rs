//! Playback session.
//!
//! A [`Session`] owns an engine, the current arrangement and the handles of
//! the one graph built from it. Building always tears the previous graph
//! down first, so at most one graph is ever alive on the engine.

use std::collections::BTreeMap;

use officedj_compose::{render_details, render_summary, Arrangement};
use officedj_spec::{Blueprint, Profile, SessionConfig};

use crate::engine::{AudioEngine, NodeId, PartId, Target};
use crate::error::EngineError;
use crate::graph::{build_graph_plan, GraphPlan, NodeKey, PlannedTarget};

/// Status shown when the engine refuses to start.
pub const PERMISSION_MESSAGE: &str = "⚠️ 오디오 권한이 필요합니다. 다시 탭해주세요.";

/// Result of [`Session::start`].
#[derive(Debug)]
pub enum StartOutcome {
    /// The engine started and the graph is playing.
    Started,
    /// A previous start already succeeded or is in progress.
    AlreadyStarted,
    /// The engine cannot play; nothing was done.
    Unavailable,
    /// The engine or graph failed; the session can be started again.
    Failed(EngineError),
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started)
    }
}

/// Handles of the graph currently alive on the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveGraph {
    /// Nodes in creation order.
    pub nodes: Vec<NodeId>,
    /// Parts in scheduling order.
    pub parts: Vec<PartId>,
}

impl ActiveGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.parts.is_empty()
    }
}

/// One page's music: arrangement, engine and live graph.
pub struct Session<E: AudioEngine> {
    engine: E,
    config: SessionConfig,
    text: String,
    arrangement: Arrangement,
    active: ActiveGraph,
    has_started: bool,
    status: Option<String>,
}

impl<E: AudioEngine> Session<E> {
    /// Creates a session and derives its first arrangement.
    ///
    /// # Arguments
    /// * `engine` - Engine the graph is built on
    /// * `text` - Explanation text the music is derived from
    /// * `config` - Path hint, display name and playback settings
    pub fn new(engine: E, text: impl Into<String>, config: SessionConfig) -> Self {
        Self::at_generation(engine, text, config, 0)
    }

    /// Creates a session whose arrangement is already at remix `generation`.
    ///
    /// Equivalent to `new` followed by `generation` calls to `remix`, without
    /// composing the intermediate arrangements.
    pub fn at_generation(
        engine: E,
        text: impl Into<String>,
        config: SessionConfig,
        generation: u32,
    ) -> Self {
        let text = text.into();
        let arrangement = Arrangement::compose(&text, &config.path_hint, generation);
        Self {
            engine,
            config,
            text,
            arrangement,
            active: ActiveGraph::default(),
            has_started: false,
            status: None,
        }
    }

    /// Starts playback once.
    ///
    /// Unavailable engines and repeated calls are no-ops. On failure the
    /// guard is reset so that a later call can try again. A refused start
    /// asks the user for permission; other failures show their own message.
    pub async fn start(&mut self) -> StartOutcome {
        if !self.engine.is_available() {
            return StartOutcome::Unavailable;
        }
        if self.has_started {
            return StartOutcome::AlreadyStarted;
        }
        self.has_started = true;

        match self.try_start().await {
            Ok(()) => {
                self.status = None;
                StartOutcome::Started
            }
            Err(err) => {
                self.has_started = false;
                self.status = Some(match &err {
                    EngineError::StartRejected(_) => PERMISSION_MESSAGE.to_string(),
                    other => other.to_string(),
                });
                // Partially built graphs must not outlive a failed start.
                let _ = self.teardown();
                StartOutcome::Failed(err)
            }
        }
    }

    async fn try_start(&mut self) -> Result<(), EngineError> {
        self.engine.start().await?;
        self.rebuild()?;
        self.engine.start_transport(self.config.start_offset_seconds)
    }

    /// Replaces the arrangement with the next remix generation.
    ///
    /// If playback has started the transport is stopped, the graph rebuilt
    /// and the transport restarted.
    pub fn remix(&mut self) -> Result<(), EngineError> {
        self.arrangement = self.arrangement.remix(&self.text, &self.config.path_hint);
        if self.has_started && self.engine.is_available() {
            self.engine.stop_transport()?;
            self.rebuild()?;
            self.engine.start_transport(self.config.start_offset_seconds)?;
        }
        Ok(())
    }

    /// Stops and disposes every part, disposes every node and cancels the
    /// transport.
    ///
    /// Every step is attempted even if an earlier one fails; handles are
    /// always cleared. Returns the first error. Calling it again is a no-op.
    pub fn teardown(&mut self) -> Result<(), EngineError> {
        if !self.engine.is_available() {
            self.active = ActiveGraph::default();
            return Ok(());
        }

        let mut first = None;
        let active = std::mem::take(&mut self.active);
        for part in active.parts {
            keep_first(&mut first, self.engine.stop_part(part));
            keep_first(&mut first, self.engine.dispose_part(part));
        }
        for node in active.nodes.into_iter().rev() {
            keep_first(&mut first, self.engine.dispose_node(node));
        }
        keep_first(&mut first, self.engine.cancel_transport());

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Tears down the current graph and builds one from the current
    /// arrangement.
    pub fn rebuild(&mut self) -> Result<(), EngineError> {
        self.teardown()?;
        if !self.engine.is_available() {
            return Ok(());
        }
        let plan = self.plan();
        self.engine.configure_transport(plan.transport)?;

        let mut ids: BTreeMap<NodeKey, NodeId> = BTreeMap::new();
        for node in &plan.nodes {
            let id = self.engine.create_node(node.spec.clone())?;
            self.active.nodes.push(id);
            ids.insert(node.key, id);
        }

        let lookup = |key: NodeKey| {
            ids.get(&key).copied().ok_or_else(|| {
                EngineError::invalid_param("graph", format!("no node planned for {:?}", key))
            })
        };
        for connection in &plan.connections {
            let from = lookup(connection.from)?;
            let to = match connection.to {
                PlannedTarget::Node(key) => Target::Node(lookup(key)?),
                PlannedTarget::Destination => Target::Destination,
            };
            self.engine.connect(from, to)?;
        }

        for sequence in &plan.sequences {
            let instrument = lookup(NodeKey::Instrument(sequence.voice))?;
            let part = self.engine.schedule(sequence.bind(instrument))?;
            self.active.parts.push(part);
        }
        Ok(())
    }

    /// The graph plan for the current arrangement.
    pub fn plan(&self) -> GraphPlan {
        build_graph_plan(&self.arrangement.profile, &self.arrangement.blueprint)
    }

    /// User-visible status, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// True once a start has succeeded.
    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn profile(&self) -> &Profile {
        &self.arrangement.profile
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.arrangement.blueprint
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handles of the live graph.
    pub fn active(&self) -> &ActiveGraph {
        &self.active
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Code block for the current arrangement.
    pub fn code(&self) -> String {
        self.arrangement.code(self.config.display_name())
    }

    /// One-line summary for the current profile.
    pub fn summary(&self) -> String {
        render_summary(&self.arrangement.profile)
    }

    /// Detail line for the current profile.
    pub fn details(&self) -> String {
        render_details(&self.arrangement.profile)
    }

    /// Tears down the graph and returns the engine with the teardown result.
    pub fn into_engine(mut self) -> (E, Result<(), EngineError>) {
        let teardown = self.teardown();
        (self.engine, teardown)
    }
}

fn keep_first(slot: &mut Option<EngineError>, result: Result<(), EngineError>) {
    if let Err(err) = result {
        slot.get_or_insert(err);
    }
}
