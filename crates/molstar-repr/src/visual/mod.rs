//! Visuals: the geometry-producing delegates of a representation
//!
//! A visual owns at most one [`RenderObject`] and knows how to (re)build it
//! from a structure, a theme and prop values. Representations create their
//! visual once and drive it through [`Visual::create_or_update`].

pub mod element_sphere;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use molstar_mol::{Loci, Structure};

use crate::error::ReprResult;
use crate::marker::MarkerAction;
use crate::param::Values;
use crate::picking::PickingId;
use crate::renderable::RenderObject;
use crate::task::{BoxFuture, RuntimeContext};
use crate::theme::Theme;

pub use element_sphere::ElementSphereVisual;

/// Context handed to a visual for one update
#[derive(Debug, Clone)]
pub struct VisualContext {
    pub runtime: RuntimeContext,
    object_ids: Arc<AtomicU32>,
}

impl VisualContext {
    pub fn new(runtime: RuntimeContext, object_ids: Arc<AtomicU32>) -> Self {
        Self {
            runtime,
            object_ids,
        }
    }

    /// Allocate a render object id unique within the owning plugin
    pub fn next_object_id(&self) -> u32 {
        self.object_ids.fetch_add(1, Ordering::Relaxed)
    }
}

/// Geometry-producing delegate of a representation
pub trait Visual: Send {
    /// Build or update the render object for `structure`
    ///
    /// Implementations check the runtime for cancellation while building
    /// and only replace the committed render object once a build completes.
    fn create_or_update(
        &mut self,
        ctx: VisualContext,
        theme: Theme,
        props: Values,
        structure: Option<Arc<Structure>>,
    ) -> BoxFuture<'_, ReprResult<()>>;

    fn render_object(&self) -> Option<&Arc<RenderObject>>;

    /// Locus under a picking id, [`Loci::Empty`] if it is not ours
    fn get_loci(&self, id: &PickingId) -> Loci;

    /// Apply a marker action to `loci`; true if any marker changed
    fn mark(&mut self, loci: &Loci, action: MarkerAction) -> bool;

    fn set_visibility(&mut self, visible: bool);

    fn set_pickable(&mut self, pickable: bool);

    /// Release the render object
    fn destroy(&mut self);
}
