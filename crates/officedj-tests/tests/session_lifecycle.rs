//! Session start guard, remix and teardown on the offline engine.

use officedj_backend_audio::{EngineError, OfflineEngine, Session, StartOutcome, PERMISSION_MESSAGE};
use officedj_spec::SessionConfig;
use officedj_tests::{started_session, TEST_SAMPLE_RATE};

fn config(path: &str) -> SessionConfig {
    SessionConfig {
        path_hint: path.to_string(),
        sample_rate: TEST_SAMPLE_RATE,
        ..SessionConfig::default()
    }
}

#[tokio::test]
async fn start_is_idempotent() {
    let mut session = started_session("LED 조명 7개 설치", "/jiwon").await;
    let nodes = session.engine().live_node_count();
    for _ in 0..3 {
        assert!(matches!(session.start().await, StartOutcome::AlreadyStarted));
    }
    assert_eq!(session.engine().start_calls(), 1);
    assert_eq!(session.engine().live_node_count(), nodes);
}

#[tokio::test]
async fn rejected_start_can_be_retried() {
    let engine = OfflineEngine::new(TEST_SAMPLE_RATE).with_start_failures(2);
    let mut session = Session::new(engine, "휴식", config("/chaebin"));

    for _ in 0..2 {
        match session.start().await {
            StartOutcome::Failed(EngineError::StartRejected(_)) => {}
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!session.has_started());
        assert_eq!(session.status(), Some(PERMISSION_MESSAGE));
        assert_eq!(session.engine().live_node_count(), 0);
    }

    assert!(session.start().await.is_started());
    assert_eq!(session.engine().start_calls(), 3);
    assert!(session.status().is_none());
}

#[tokio::test]
async fn always_rejecting_engine_never_builds() {
    let mut session = Session::new(OfflineEngine::rejecting(), "", config("/yeju"));
    assert!(matches!(session.start().await, StartOutcome::Failed(_)));
    assert!(matches!(session.start().await, StartOutcome::Failed(_)));
    assert_eq!(session.engine().live_node_count(), 0);
    assert_eq!(session.engine().live_part_count(), 0);
}

#[tokio::test]
async fn unavailable_engine_creates_nothing() {
    let mut session = Session::new(OfflineEngine::unavailable(), "LED", config("/jiwon"));
    assert!(matches!(session.start().await, StartOutcome::Unavailable));
    session.remix().unwrap();
    session.rebuild().unwrap();
    session.teardown().unwrap();
    assert_eq!(session.engine().live_node_count(), 0);
    assert_eq!(session.engine().start_calls(), 0);
    assert!(session.status().is_none());
}

#[tokio::test]
async fn rebuild_never_leaves_two_graphs() {
    let mut session = started_session("", "/yeju").await;
    let expected_nodes = session.plan().nodes.len();
    let expected_parts = session.plan().sequences.len();
    for _ in 0..4 {
        session.rebuild().unwrap();
        assert_eq!(session.engine().live_node_count(), expected_nodes);
        assert_eq!(session.engine().live_part_count(), expected_parts);
    }
}

#[tokio::test]
async fn remix_swaps_the_whole_graph() {
    let mut session = started_session("창가 자리", "/seowoo").await;
    let first = session.active().clone();
    let first_seed = session.profile().seed;

    session.remix().unwrap();
    let second = session.active().clone();
    assert_ne!(session.profile().seed, first_seed);
    assert_eq!(session.profile().generation, 1);
    assert!(first.nodes.iter().all(|n| session.engine().node(*n).is_none()));
    assert_eq!(session.engine().live_node_count(), second.nodes.len());
    assert!(session.engine().is_transport_running());
    assert_eq!(session.engine().transport_offset(), Some(0.05));
}

#[tokio::test]
async fn teardown_releases_everything() {
    let mut session = started_session("", "/jungah").await;
    session.teardown().unwrap();
    session.teardown().unwrap();
    assert!(session.active().is_empty());
    assert_eq!(session.engine().live_node_count(), 0);
    assert_eq!(session.engine().live_part_count(), 0);
    assert!(session.engine().connections().is_empty());
}

#[tokio::test]
async fn started_session_renders_audio() {
    let session = started_session("LED 조명 7개 설치", "/jiwon").await;
    let audio = session.engine().render(1).unwrap();
    assert!(audio.peak() > 0.0);
    assert!(audio.peak() <= 1.0);
    let expected = (4.0 * 60.0 / session.profile().bpm as f64 * TEST_SAMPLE_RATE as f64).round();
    assert_eq!(audio.samples.len(), expected as usize);
}
