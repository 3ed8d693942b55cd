//! Drives one animation instance over time

use super::{AnimationContext, AnimationInstance, AnimationTime, ApplyResult, PluginStateAnimation};
use crate::context::PluginContext;
use crate::error::PluginResult;

/// Result of one [`AnimationRunner::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Not running; nothing was applied
    Stopped,
    /// The animation asked to skip this tick
    Skipped,
    /// A frame was applied
    Applied,
    /// The animation finished and was torn down
    Finished,
}

struct Running<S> {
    state: S,
    started_at: f64,
    last_applied: f64,
}

/// Runs an [`AnimationInstance`] against a plugin context
///
/// Times are in milliseconds on any monotonic clock chosen by the caller.
pub struct AnimationRunner<A: PluginStateAnimation> {
    instance: AnimationInstance<A>,
    running: Option<Running<A::State>>,
}

impl<A: PluginStateAnimation> AnimationRunner<A> {
    pub fn new(instance: AnimationInstance<A>) -> Self {
        Self {
            instance,
            running: None,
        }
    }

    pub fn instance(&self) -> &AnimationInstance<A> {
        &self.instance
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Current animation state, if running
    pub fn state(&self) -> Option<&A::State> {
        self.running.as_ref().map(|r| &r.state)
    }

    /// Check, set up and start the animation at `now_ms`
    ///
    /// A running animation is stopped first.
    pub async fn start(&mut self, ctx: &mut PluginContext, now_ms: f64) -> PluginResult<()> {
        self.stop(ctx).await?;
        self.instance.definition.can_apply(ctx)?;
        let state = self.instance.definition.initial_state(&self.instance.params, ctx);
        self.begin(ctx, state, now_ms).await
    }

    /// Like [`start`](Self::start), but continue from a saved `state`
    ///
    /// The state usually comes from deserializing [`state`](Self::state)
    /// of an earlier run.
    pub async fn resume(
        &mut self,
        ctx: &mut PluginContext,
        state: A::State,
        now_ms: f64,
    ) -> PluginResult<()> {
        self.stop(ctx).await?;
        self.instance.definition.can_apply(ctx)?;
        self.begin(ctx, state, now_ms).await
    }

    async fn begin(&mut self, ctx: &mut PluginContext, state: A::State, now_ms: f64) -> PluginResult<()> {
        let definition = &self.instance.definition;
        definition.setup(&self.instance.params, ctx).await?;
        log::debug!("Started animation '{}'", definition.name());

        self.running = Some(Running {
            state,
            started_at: now_ms,
            last_applied: 0.0,
        });
        Ok(())
    }

    /// Apply the frame due at `now_ms`
    pub async fn tick(&mut self, ctx: &mut PluginContext, now_ms: f64) -> PluginResult<TickStatus> {
        let running = match &mut self.running {
            Some(running) => running,
            None => return Ok(TickStatus::Stopped),
        };
        let current = now_ms - running.started_at;
        let time = AnimationTime {
            last_applied: running.last_applied,
            current,
        };
        let definition = &self.instance.definition;
        let result = definition
            .apply(
                &running.state,
                time,
                AnimationContext {
                    params: &self.instance.params,
                    plugin: &mut *ctx,
                },
            )
            .await?;

        match result {
            ApplyResult::Skip => Ok(TickStatus::Skipped),
            ApplyResult::Next(state) => {
                running.state = state;
                running.last_applied = current;
                Ok(TickStatus::Applied)
            }
            ApplyResult::Finished => {
                log::debug!("Animation '{}' finished", definition.name());
                self.stop(ctx).await?;
                Ok(TickStatus::Finished)
            }
        }
    }

    /// Tear down the animation if it is running
    pub async fn stop(&mut self, ctx: &mut PluginContext) -> PluginResult<()> {
        if let Some(running) = self.running.take() {
            self.instance
                .definition
                .teardown(&self.instance.params, &running.state, ctx)
                .await?;
        }
        Ok(())
    }
}

impl<A: PluginStateAnimation> std::fmt::Debug for AnimationRunner<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRunner")
            .field("animation", &self.instance.definition.name())
            .field("running", &self.is_running())
            .finish()
    }
}
