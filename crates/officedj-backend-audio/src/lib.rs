//! Office DJ audio backend.
//!
//! This crate turns an [`Arrangement`](officedj_compose::Arrangement) into
//! sound:
//!
//! - [`graph`] plans nodes, routing and sequences for a profile and blueprint
//! - [`engine`] is the boundary to whatever actually makes sound
//! - [`session`] owns an engine and keeps exactly one graph alive on it
//! - [`offline`] is a deterministic engine that renders to a buffer
//! - [`wav`] writes rendered buffers as 16-bit mono WAV
//!
//! # Example
//!
//! ```no_run
//! use officedj_backend_audio::{OfflineEngine, Session};
//! use officedj_spec::SessionConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig {
//!     path_hint: "/jiwon".to_string(),
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::new(OfflineEngine::new(44_100), "LED 조명 7개 설치", config);
//! session.start().await;
//! let audio = session.engine().render(4)?;
//! audio.write_wav(std::path::Path::new("loop.wav"))?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod graph;
pub mod offline;
pub mod patch;
pub mod rng;
pub mod session;
pub mod wav;

pub use engine::{AudioEngine, NodeId, PartId, Target};
pub use error::{AudioError, AudioResult, EngineError};
pub use graph::{
    build_graph_plan, GraphPlan, NodeKey, NodeSpec, SequenceSpec, TransportSettings, Trigger,
};
pub use offline::{OfflineEngine, RenderedAudio};
pub use patch::{patch_for, Patch};
pub use session::{ActiveGraph, Session, StartOutcome, PERMISSION_MESSAGE};
