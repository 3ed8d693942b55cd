//! Step through the frames of the loaded trajectory

use serde::{Deserialize, Serialize};

use super::{
    AnimationContext, AnimationDisplay, AnimationDuration, AnimationTime, ApplyResult,
    PluginStateAnimation,
};
use crate::context::PluginContext;
use crate::error::{PluginError, PluginResult};
use molstar_repr::task::BoxFuture;

/// What happens at the ends of the trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelIndexMode {
    /// Stop at the last frame
    Once,
    /// Jump back to the first frame
    #[default]
    Loop,
    /// Reverse direction (ping-pong)
    Palindrome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelIndexParams {
    pub mode: ModelIndexMode,
    /// Initial direction
    pub direction: Direction,
    /// Frames per second, at least 0.1
    pub fps: f64,
}

impl Default for ModelIndexParams {
    fn default() -> Self {
        Self {
            mode: ModelIndexMode::default(),
            direction: Direction::default(),
            fps: 30.0,
        }
    }
}

impl ModelIndexParams {
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.fps.max(0.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelIndexState {
    pub direction: Direction,
    pub frame_ms: f64,
}

/// Frame following `index` and the direction to continue in, `None` at the end
fn step(
    mode: ModelIndexMode,
    direction: Direction,
    index: usize,
    count: usize,
) -> Option<(usize, Direction)> {
    let last = count.checked_sub(1)?;
    let index = index.min(last);
    match (mode, direction) {
        (ModelIndexMode::Once, Direction::Forward) => (index < last).then(|| (index + 1, direction)),
        (ModelIndexMode::Once, Direction::Backward) => (index > 0).then(|| (index - 1, direction)),
        (ModelIndexMode::Loop, Direction::Forward) => Some(((index + 1) % count, direction)),
        (ModelIndexMode::Loop, Direction::Backward) => Some(((index + last) % count, direction)),
        (ModelIndexMode::Palindrome, Direction::Forward) => Some(if index < last {
            (index + 1, Direction::Forward)
        } else {
            (index.saturating_sub(1), Direction::Backward)
        }),
        (ModelIndexMode::Palindrome, Direction::Backward) => Some(if index > 0 {
            (index - 1, Direction::Backward)
        } else {
            ((index + 1).min(last), Direction::Forward)
        }),
    }
}

/// Animates the current trajectory frame
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimateModelIndex;

impl PluginStateAnimation for AnimateModelIndex {
    type Params = ModelIndexParams;
    type State = ModelIndexState;

    fn name(&self) -> &str {
        "built-in.animate-model-index"
    }

    fn display(&self) -> AnimationDisplay {
        AnimationDisplay {
            name: "Animate Trajectory".to_string(),
            description: Some("Step through the frames of the loaded trajectory".to_string()),
        }
    }

    fn params(&self, _ctx: &PluginContext) -> ModelIndexParams {
        ModelIndexParams::default()
    }

    fn can_apply(&self, ctx: &PluginContext) -> PluginResult<()> {
        if ctx.frame_count() > 1 {
            Ok(())
        } else {
            Err(PluginError::cannot_apply(
                self.name(),
                "the trajectory has fewer than two frames",
            ))
        }
    }

    fn initial_state(&self, params: &ModelIndexParams, _ctx: &PluginContext) -> ModelIndexState {
        ModelIndexState {
            direction: params.direction,
            frame_ms: params.frame_ms(),
        }
    }

    fn duration(&self, params: &ModelIndexParams, ctx: &PluginContext) -> AnimationDuration {
        let count = ctx.frame_count();
        if count < 2 {
            return AnimationDuration::Unknown;
        }
        match params.mode {
            ModelIndexMode::Once => {
                let steps = match params.direction {
                    Direction::Forward => count - 1 - ctx.current_frame().min(count - 1),
                    Direction::Backward => ctx.current_frame().min(count - 1),
                };
                AnimationDuration::Fixed(steps as f64 * params.frame_ms())
            }
            ModelIndexMode::Loop | ModelIndexMode::Palindrome => AnimationDuration::Infinite,
        }
    }

    fn apply<'a>(
        &'a self,
        state: &'a ModelIndexState,
        time: AnimationTime,
        ctx: AnimationContext<'a, ModelIndexParams>,
    ) -> BoxFuture<'a, PluginResult<ApplyResult<ModelIndexState>>> {
        Box::pin(async move {
            if time.current - time.last_applied < state.frame_ms {
                return Ok(ApplyResult::Skip);
            }
            let plugin = ctx.plugin;
            let next = step(
                ctx.params.mode,
                state.direction,
                plugin.current_frame(),
                plugin.frame_count(),
            );
            match next {
                Some((index, direction)) if plugin.frame_count() > 1 => {
                    plugin.set_frame(index).await?;
                    Ok(ApplyResult::Next(ModelIndexState { direction, ..*state }))
                }
                _ => Ok(ApplyResult::Finished),
            }
        })
    }
}
