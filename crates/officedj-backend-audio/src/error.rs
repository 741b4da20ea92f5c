//! Error types for the audio backend.

use officedj_spec::BackendError;
use thiserror::Error;

use crate::engine::{NodeId, PartId};

/// Result type for rendering operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors raised by an [`AudioEngine`](crate::engine::AudioEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine cannot produce sound in this environment.
    #[error("audio engine is unavailable")]
    Unavailable,

    /// The engine refused to start, e.g. missing user permission.
    #[error("audio engine refused to start: {0}")]
    StartRejected(String),

    /// An operation was attempted before `start`.
    #[error("audio engine has not been started")]
    NotStarted,

    /// A node handle does not refer to a live node.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A part handle does not refer to a live part.
    #[error("unknown part {0}")]
    UnknownPart(PartId),

    /// A node or transport parameter is unusable.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl EngineError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl BackendError for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::Unavailable => "ENGINE_001",
            EngineError::StartRejected(_) => "ENGINE_002",
            EngineError::NotStarted => "ENGINE_003",
            EngineError::UnknownNode(_) => "ENGINE_004",
            EngineError::UnknownPart(_) => "ENGINE_005",
            EngineError::InvalidParameter { .. } => "ENGINE_006",
        }
    }

    fn category(&self) -> &'static str {
        "engine"
    }
}

/// Errors that can occur while rendering or writing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid render length.
    #[error("invalid bar count: {bars}")]
    InvalidBars {
        /// The invalid bar count.
        bars: u32,
    },

    /// The render would be longer than the renderer allows.
    #[error("render of {samples} samples exceeds the limit of {max}")]
    RenderTooLong {
        /// Samples the render would need.
        samples: usize,
        /// Largest allowed render.
        max: usize,
    },

    /// Rendering was requested before the transport was configured.
    #[error("transport has not been configured")]
    TransportNotConfigured,

    /// The node graph routes a node back into itself.
    #[error("routing cycle through node {0}")]
    RoutingCycle(NodeId),

    /// Engine-level failure.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// WAV encoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidSampleRate { .. } => "AUDIO_001",
            AudioError::InvalidBars { .. } => "AUDIO_002",
            AudioError::TransportNotConfigured => "AUDIO_003",
            AudioError::RoutingCycle(_) => "AUDIO_004",
            AudioError::Engine(e) => e.code(),
            AudioError::Wav(_) => "AUDIO_005",
            AudioError::Io(_) => "AUDIO_006",
            AudioError::RenderTooLong { .. } => "AUDIO_007",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AudioError::Engine(_) => "engine",
            _ => "audio",
        }
    }
}
