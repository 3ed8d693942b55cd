//! Error types for the plugin crate

use molstar_repr::ReprError;
use thiserror::Error;

/// Errors raised by the plugin context and its animations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PluginError {
    /// The animation cannot run in the current plugin state
    #[error("Animation '{name}' cannot be applied: {reason}")]
    CannotApply { name: String, reason: String },

    /// The plugin holds no trajectory frames
    #[error("No trajectory loaded")]
    NoTrajectory,

    /// Invalid trajectory frame index
    #[error("Invalid frame index: {index} (trajectory has {count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    /// Updating a representation failed
    #[error("Representation error: {0}")]
    Repr(#[from] ReprError),
}

impl PluginError {
    pub fn cannot_apply(name: impl Into<String>, reason: impl Into<String>) -> Self {
        PluginError::CannotApply {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;
