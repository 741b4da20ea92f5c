//! The audio engine boundary.
//!
//! A [`Session`](crate::session::Session) drives any engine through this
//! trait: a browser audio context, a native device, or the
//! [`OfflineEngine`](crate::offline::OfflineEngine) used for rendering and
//! tests.

use std::fmt;

use crate::error::EngineError;
use crate::graph::{NodeSpec, SequenceSpec, TransportSettings};

/// Handle to a node created by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Handle to a scheduled sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part#{}", self.0)
    }
}

/// Where a node's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Another node's input.
    Node(NodeId),
    /// The engine's final output.
    Destination,
}

/// An engine that can build node graphs and run a transport.
///
/// Only `start` is asynchronous; it may wait on user permission and may
/// fail, in which case the caller is expected to retry later.
#[allow(async_fn_in_trait)]
pub trait AudioEngine {
    /// True if the engine can produce sound at all.
    fn is_available(&self) -> bool;

    /// Resumes or unlocks the audio context.
    async fn start(&mut self) -> Result<(), EngineError>;

    /// Creates a node and returns its handle.
    fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, EngineError>;

    /// Routes the output of `from` into `to`.
    fn connect(&mut self, from: NodeId, to: Target) -> Result<(), EngineError>;

    /// Schedules a looping sequence starting at transport time 0.
    fn schedule(&mut self, sequence: SequenceSpec) -> Result<PartId, EngineError>;

    /// Stops a scheduled sequence.
    fn stop_part(&mut self, part: PartId) -> Result<(), EngineError>;

    /// Releases a sequence; its handle becomes invalid.
    fn dispose_part(&mut self, part: PartId) -> Result<(), EngineError>;

    /// Releases a node and its connections; its handle becomes invalid.
    fn dispose_node(&mut self, node: NodeId) -> Result<(), EngineError>;

    /// Sets tempo and swing.
    fn configure_transport(&mut self, settings: TransportSettings) -> Result<(), EngineError>;

    /// Clears every event scheduled on the transport.
    fn cancel_transport(&mut self) -> Result<(), EngineError>;

    /// Starts the transport `offset_seconds` from now.
    fn start_transport(&mut self, offset_seconds: f64) -> Result<(), EngineError>;

    /// Stops the transport.
    fn stop_transport(&mut self) -> Result<(), EngineError>;
}
