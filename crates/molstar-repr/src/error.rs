//! Error types for the representation crate

use thiserror::Error;

/// Errors that can occur while building or updating representations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReprError {
    /// The task was cancelled before it completed
    #[error("Task '{task}' was cancelled")]
    Cancelled { task: String },

    /// Geometry or render object construction failed
    #[error("Build failed: {0}")]
    Build(String),

    /// A theme name is not registered
    #[error("Unknown {kind} theme: {name}")]
    UnknownTheme { kind: &'static str, name: String },

    /// A parameter value does not match its definition
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// An update needs a structure but none was ever provided
    #[error("Representation '{0}' is not bound to a structure")]
    NotBound(String),
}

impl ReprError {
    /// Create a cancellation error for `task`
    pub fn cancelled(task: impl Into<String>) -> Self {
        ReprError::Cancelled { task: task.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ReprError::InvalidParam {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReprError::Cancelled { .. })
    }
}

/// Result type for representation operations
pub type ReprResult<T> = Result<T, ReprError>;
