//! Helpers for driving sessions on the offline engine.

use std::collections::BTreeMap;

use officedj_backend_audio::{
    build_graph_plan, AudioEngine, EngineError, NodeKey, OfflineEngine, Session, Target,
};
use officedj_backend_audio::graph::PlannedTarget;
use officedj_compose::Arrangement;
use officedj_spec::SessionConfig;

/// Sample rate for tests; low enough to keep renders fast.
pub const TEST_SAMPLE_RATE: u32 = 8_000;

/// A session on a fresh offline engine that has been started.
///
/// # Panics
/// Panics if the session does not start.
pub async fn started_session(text: &str, path: &str) -> Session<OfflineEngine> {
    let config = SessionConfig {
        path_hint: path.to_string(),
        sample_rate: TEST_SAMPLE_RATE,
        ..SessionConfig::default()
    };
    let seed = Arrangement::compose(text, path, 0).profile.seed;
    let engine = OfflineEngine::new(TEST_SAMPLE_RATE).with_seed(seed);
    let mut session = Session::new(engine, text, config);
    let outcome = session.start().await;
    assert!(outcome.is_started(), "session did not start: {:?}", outcome);
    session
}

/// Builds an arrangement's graph directly on an engine, without a session.
pub fn build_on<E: AudioEngine>(
    engine: &mut E,
    arrangement: &Arrangement,
) -> Result<(), EngineError> {
    let plan = build_graph_plan(&arrangement.profile, &arrangement.blueprint);
    engine.configure_transport(plan.transport)?;
    let mut ids = BTreeMap::new();
    for node in &plan.nodes {
        ids.insert(node.key, engine.create_node(node.spec.clone())?);
    }
    let id = |key: NodeKey| ids[&key];
    for connection in &plan.connections {
        let to = match connection.to {
            PlannedTarget::Node(key) => Target::Node(id(key)),
            PlannedTarget::Destination => Target::Destination,
        };
        engine.connect(id(connection.from), to)?;
    }
    for sequence in &plan.sequences {
        engine.schedule(sequence.bind(id(NodeKey::Instrument(sequence.voice))))?;
    }
    Ok(())
}
