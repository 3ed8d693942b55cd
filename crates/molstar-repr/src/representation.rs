//! Representation lifecycle
//!
//! A [`Representation`] is bound to at most one structure at a time and
//! turns it into render objects through a visual. Every
//! [`Representation::create_or_update`] call resolves params and props
//! synchronously and returns a [`Task`] that performs the visual update;
//! once the task finishes the representation's version is bumped and
//! published on its `updated` channel.

use std::sync::atomic::AtomicU32;
use std::sync::Arc;

use molstar_mol::{Loci, Structure};
use tokio::sync::broadcast;

use crate::error::ReprResult;
use crate::marker::MarkerAction;
use crate::param::{Params, Values};
use crate::picking::PickingId;
use crate::renderable::RenderObject;
use crate::task::Task;
use crate::theme::{Theme, ThemeRegistry};

/// Shared context of all representations of one plugin
#[derive(Debug, Clone)]
pub struct RepresentationContext {
    pub themes: Arc<ThemeRegistry>,
    object_ids: Arc<AtomicU32>,
}

impl RepresentationContext {
    pub fn new(themes: ThemeRegistry) -> Self {
        Self {
            themes: Arc::new(themes),
            object_ids: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Render object id generator shared with visuals
    pub fn object_ids(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.object_ids)
    }
}

impl Default for RepresentationContext {
    fn default() -> Self {
        Self::new(ThemeRegistry::with_builtins())
    }
}

/// Resolves the params a representation offers for a structure
pub type RepresentationParamsGetter = fn(&RepresentationContext, &Structure) -> Params;

/// A long-lived, updatable visual representation of a structure
pub trait Representation: Send {
    fn label(&self) -> &str;

    /// Params resolved for the bound structure
    fn params(&self) -> Option<&Params>;

    /// Current prop values: defaults merged with every update so far
    fn props(&self) -> Option<&Values>;

    fn theme(&self) -> Option<&Theme>;

    /// Last published version, `None` before the first completed update
    fn version(&self) -> Option<u64>;

    /// Receive every version published after this call
    fn subscribe_updated(&self) -> broadcast::Receiver<u64>;

    fn render_objects(&self) -> Vec<Arc<RenderObject>>;

    fn structure(&self) -> Option<&Arc<Structure>>;

    /// Merge `props` into the current props and rebuild for `structure`
    ///
    /// Without a structure the bound one is reused. Errors that can be
    /// detected up front (no bound structure, unknown theme) are returned
    /// before any state changes; the returned task performs the visual
    /// update and must be run to take effect.
    fn create_or_update<'a>(
        &'a mut self,
        ctx: &RepresentationContext,
        props: Values,
        structure: Option<Arc<Structure>>,
    ) -> ReprResult<Task<'a, ()>>;

    fn get_loci(&self, id: &PickingId) -> Loci;

    fn mark(&mut self, loci: &Loci, action: MarkerAction) -> bool;

    fn set_visibility(&mut self, visible: bool);

    fn set_pickable(&mut self, pickable: bool);

    /// Release the visual; calling it again does nothing
    fn destroy(&mut self);
}
