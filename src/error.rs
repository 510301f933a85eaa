//! Structural errors raised by the engine
//!
//! Validation failures never show up here; they live in the error map.

use crate::value::FieldPath;

/// Programmer-facing errors: bad paths, shape violations, broken rule sets
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("no value at `{path}`")]
    MissingField { path: FieldPath },

    #[error("shape mismatch at `{path}`: expected {expected}, found {found}")]
    ShapeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("rule misconfigured at `{path}`: {reason}")]
    RuleMisconfiguration { path: FieldPath, reason: String },

    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl EngineError {
    pub(crate) fn invalid_path(path: impl ToString, reason: impl Into<String>) -> Self {
        EngineError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn misconfigured(path: &FieldPath, reason: impl Into<String>) -> Self {
        EngineError::RuleMisconfiguration {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the rule set rather than by a caller's path
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            EngineError::RuleMisconfiguration { .. } | EngineError::InvalidPattern { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
