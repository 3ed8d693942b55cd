//! Plugin state animations
//!
//! An animation is a definition ([`PluginStateAnimation`]) that advances
//! plugin state frame by frame. A definition is paired with its params in
//! an [`AnimationInstance`] and driven by an [`AnimationRunner`], which
//! calls [`PluginStateAnimation::apply`] with the time elapsed since the
//! animation started.

pub mod model_index;
pub mod runner;

use std::sync::Arc;

use molstar_repr::task::BoxFuture;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::context::PluginContext;
use crate::error::PluginResult;

pub use model_index::{AnimateModelIndex, ModelIndexMode, ModelIndexParams, ModelIndexState};
pub use runner::{AnimationRunner, TickStatus};

/// Human readable description of an animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDisplay {
    pub name: String,
    pub description: Option<String>,
}

/// How long an animation runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationDuration {
    Unknown,
    Infinite,
    /// Milliseconds
    Fixed(f64),
}

/// Times passed to [`PluginStateAnimation::apply`], in milliseconds since start
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationTime {
    /// Time of the last applied (not skipped) frame
    pub last_applied: f64,
    pub current: f64,
}

/// Outcome of applying one animation frame
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyResult<S> {
    /// The animation is over
    Finished,
    /// Nothing to do yet, the state is unchanged
    Skip,
    /// A frame was applied, continue with this state
    Next(S),
}

/// What [`PluginStateAnimation::apply`] works with
pub struct AnimationContext<'a, P> {
    pub params: &'a P,
    pub plugin: &'a mut PluginContext,
}

/// Definition of an animation over plugin state
pub trait PluginStateAnimation: Send + Sync {
    type Params: Clone + std::fmt::Debug + Send + Sync;
    /// Running state; serializable so a running animation can be saved and restored
    type State: Serialize + DeserializeOwned + Send + Sync;

    /// Unique name of the animation
    fn name(&self) -> &str;

    fn display(&self) -> AnimationDisplay;

    /// Default params for the current plugin state
    fn params(&self, ctx: &PluginContext) -> Self::Params;

    /// Fails with [`crate::PluginError::CannotApply`] if the animation cannot run
    fn can_apply(&self, _ctx: &PluginContext) -> PluginResult<()> {
        Ok(())
    }

    fn initial_state(&self, params: &Self::Params, ctx: &PluginContext) -> Self::State;

    fn duration(&self, _params: &Self::Params, _ctx: &PluginContext) -> AnimationDuration {
        AnimationDuration::Unknown
    }

    /// Called once before the first frame
    fn setup<'a>(
        &'a self,
        _params: &'a Self::Params,
        _ctx: &'a mut PluginContext,
    ) -> BoxFuture<'a, PluginResult<()>> {
        Box::pin(async { Ok(()) })
    }

    /// Called once after the animation finished or was stopped
    fn teardown<'a>(
        &'a self,
        _params: &'a Self::Params,
        _state: &'a Self::State,
        _ctx: &'a mut PluginContext,
    ) -> BoxFuture<'a, PluginResult<()>> {
        Box::pin(async { Ok(()) })
    }

    /// Apply the frame for `time` starting from `state`
    fn apply<'a>(
        &'a self,
        state: &'a Self::State,
        time: AnimationTime,
        ctx: AnimationContext<'a, Self::Params>,
    ) -> BoxFuture<'a, PluginResult<ApplyResult<Self::State>>>;
}

/// An animation definition together with the params to run it with
#[derive(Debug)]
pub struct AnimationInstance<A: PluginStateAnimation> {
    pub definition: Arc<A>,
    pub params: A::Params,
    /// Overrides the definition's duration when positive
    pub custom_duration_ms: Option<f64>,
}

impl<A: PluginStateAnimation> AnimationInstance<A> {
    pub fn new(definition: Arc<A>, params: A::Params) -> Self {
        Self {
            definition,
            params,
            custom_duration_ms: None,
        }
    }

    /// Instance with the definition's default params for `ctx`
    pub fn with_default_params(definition: Arc<A>, ctx: &PluginContext) -> Self {
        let params = definition.params(ctx);
        Self::new(definition, params)
    }

    pub fn with_custom_duration(mut self, duration_ms: f64) -> Self {
        self.custom_duration_ms = Some(duration_ms);
        self
    }

    /// Effective duration: the custom one, else a fixed definition duration
    pub fn duration_ms(&self, ctx: &PluginContext) -> Option<f64> {
        if let Some(custom) = self.custom_duration_ms.filter(|&d| d > 0.0) {
            return Some(custom);
        }
        match self.definition.duration(&self.params, ctx) {
            AnimationDuration::Fixed(ms) => Some(ms),
            AnimationDuration::Unknown | AnimationDuration::Infinite => None,
        }
    }
}

impl<A: PluginStateAnimation> Clone for AnimationInstance<A> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            params: self.params.clone(),
            custom_duration_ms: self.custom_duration_ms,
        }
    }
}
