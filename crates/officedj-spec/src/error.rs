//! Error types for parsing and configuration, plus the trait backends use to
//! report stable error codes.

use thiserror::Error;

/// Errors from loading or parsing data model values.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A genre name did not match any known genre.
    #[error("unknown genre '{0}'")]
    UnknownGenre(String),

    /// A note name such as `F#4` could not be parsed.
    #[error("invalid note name '{0}'")]
    InvalidNote(String),

    /// A subdivision symbol such as `8n` could not be parsed.
    #[error("invalid subdivision '{0}'")]
    InvalidSubdivision(String),

    /// A config field is out of range.
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl SpecError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Stable code for CLI reports.
    pub fn code(&self) -> &'static str {
        match self {
            SpecError::JsonParse(_) => "SPEC_001",
            SpecError::Io(_) => "SPEC_002",
            SpecError::UnknownGenre(_) => "SPEC_003",
            SpecError::InvalidNote(_) => "SPEC_004",
            SpecError::InvalidSubdivision(_) => "SPEC_005",
            SpecError::InvalidConfig { .. } => "SPEC_006",
        }
    }
}

/// Errors raised by audio engines and renderers.
///
/// Each variant maps to a stable code so the CLI can group failures without
/// matching on message text.
pub trait BackendError: std::error::Error {
    /// Code such as `"ENGINE_002"`.
    fn code(&self) -> &'static str;

    /// Grouping such as `"engine"` or `"audio"`.
    fn category(&self) -> &'static str;

    fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = SpecError::invalid_config("bars", "must be at least 1");
        assert_eq!(err.to_string(), "invalid config field 'bars': must be at least 1");
        assert_eq!(err.code(), "SPEC_006");
    }

    #[test]
    fn test_json_error_converts() {
        let err: SpecError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.code(), "SPEC_001");
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
