//! molstar-plugin: plugin context and state animations
//!
//! The [`PluginContext`] holds a trajectory of structures and the
//! representations showing its current frame. Animations implement
//! [`PluginStateAnimation`] and are driven by an [`AnimationRunner`].

pub mod animation;
pub mod context;
pub mod error;

pub use animation::{
    AnimateModelIndex, AnimationContext, AnimationDisplay, AnimationDuration, AnimationInstance,
    AnimationRunner, AnimationTime, ApplyResult, ModelIndexMode, ModelIndexParams,
    ModelIndexState, PluginStateAnimation, TickStatus,
};
pub use context::PluginContext;
pub use error::{PluginError, PluginResult};
