//! Plugin context: the trajectory being shown and its representations

use std::sync::Arc;

use molstar_mol::Structure;
use molstar_repr::{Representation, RepresentationContext, Values};

use crate::error::{PluginError, PluginResult};

/// State shared by everything running inside one plugin
///
/// Holds a trajectory of structures with a current frame. Every
/// representation added to the context shows the current frame and is
/// rebound whenever the frame changes.
pub struct PluginContext {
    repr_ctx: RepresentationContext,
    trajectory: Vec<Arc<Structure>>,
    current: usize,
    representations: Vec<Box<dyn Representation>>,
}

impl PluginContext {
    pub fn new(repr_ctx: RepresentationContext) -> Self {
        Self {
            repr_ctx,
            trajectory: Vec::new(),
            current: 0,
            representations: Vec::new(),
        }
    }

    /// Replace the trajectory; the current frame resets to the first one
    ///
    /// Representations are not rebound until the next frame change.
    pub fn with_trajectory(mut self, frames: Vec<Arc<Structure>>) -> Self {
        self.trajectory = frames;
        self.current = 0;
        self
    }

    pub fn repr_ctx(&self) -> &RepresentationContext {
        &self.repr_ctx
    }

    pub fn frame_count(&self) -> usize {
        self.trajectory.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Structure of the current frame
    pub fn current_structure(&self) -> Option<&Arc<Structure>> {
        self.trajectory.get(self.current)
    }

    pub fn frame(&self, index: usize) -> Option<&Arc<Structure>> {
        self.trajectory.get(index)
    }

    pub fn representations(&self) -> &[Box<dyn Representation>] {
        &self.representations
    }

    /// Bind `repr` to the current frame with `props` and keep it
    ///
    /// Returns the index of the representation.
    pub async fn add_representation(
        &mut self,
        mut repr: Box<dyn Representation>,
        props: Values,
    ) -> PluginResult<usize> {
        let structure = self
            .current_structure()
            .cloned()
            .ok_or(PluginError::NoTrajectory)?;
        repr.create_or_update(&self.repr_ctx, props, Some(structure))?
            .run()
            .await?;
        log::debug!("Added {} representation", repr.label());
        self.representations.push(repr);
        Ok(self.representations.len() - 1)
    }

    /// Make `index` the current frame and rebind every representation to it
    ///
    /// The current frame only changes once every representation was rebound.
    /// When a rebind fails the current frame stays put; representations
    /// before the failing one already show `index`.
    pub async fn set_frame(&mut self, index: usize) -> PluginResult<()> {
        let structure = match self.trajectory.get(index) {
            Some(structure) => Arc::clone(structure),
            None if self.trajectory.is_empty() => return Err(PluginError::NoTrajectory),
            None => {
                return Err(PluginError::FrameOutOfRange {
                    index,
                    count: self.trajectory.len(),
                })
            }
        };
        for repr in &mut self.representations {
            repr.create_or_update(&self.repr_ctx, Values::new(), Some(Arc::clone(&structure)))?
                .run()
                .await?;
        }
        self.current = index;
        log::trace!("Frame {}/{}", index + 1, self.trajectory.len());
        Ok(())
    }

    /// Destroy every representation
    pub fn clear_representations(&mut self) {
        for repr in &mut self.representations {
            repr.destroy();
        }
        self.representations.clear();
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("frames", &self.trajectory.len())
            .field("current", &self.current)
            .field("representations", &self.representations.len())
            .finish()
    }
}
