//! One tessellated sphere per structure element

use std::sync::Arc;

use molstar_mol::{ElementLoci, Loci, Structure};

use super::{Visual, VisualContext};
use crate::color::Color;
use crate::error::ReprResult;
use crate::geometry::{sphere, Mesh, MAX_DETAIL};
use crate::marker::{apply_marker_action, MarkerAction};
use crate::param::Values;
use crate::picking::PickingId;
use crate::renderable::{MeshRenderable, MeshValues, RenderObject};
use crate::task::{BoxFuture, RuntimeContext};
use crate::theme::Theme;

/// Sphere tessellation level
pub const DETAIL_PROP: &str = "detail";
/// Factor applied to the size theme radius
pub const SIZE_FACTOR_PROP: &str = "size_factor";
pub const ALPHA_PROP: &str = "alpha";

/// Elements built between two progress updates
const CHUNK: usize = 10_000;

/// What the committed render object was built from
#[derive(Debug, Clone)]
struct BuildState {
    structure: Arc<Structure>,
    theme: Theme,
    detail: usize,
    size_factor: f32,
    alpha: f32,
}

impl BuildState {
    fn from_props(structure: Arc<Structure>, theme: Theme, props: &Values) -> Self {
        let detail = props.number_or(DETAIL_PROP, 0.0).clamp(0.0, MAX_DETAIL as f64) as usize;
        Self {
            structure,
            theme,
            detail,
            size_factor: props.number_or(SIZE_FACTOR_PROP, 1.0) as f32,
            alpha: props.number_or(ALPHA_PROP, 1.0) as f32,
        }
    }

    fn geometry_changed(&self, next: &BuildState) -> bool {
        !Arc::ptr_eq(&self.structure, &next.structure)
            || self.detail != next.detail
            || self.size_factor != next.size_factor
            || !Arc::ptr_eq(&self.theme.size, &next.theme.size)
    }

    fn color_changed(&self, next: &BuildState) -> bool {
        !Arc::ptr_eq(&self.theme.color, &next.theme.color) || self.alpha != next.alpha
    }

    fn colors(&self) -> Vec<Color> {
        (0..self.structure.element_count())
            .map(|i| self.theme.color.color(&self.structure, i))
            .collect()
    }
}

/// Spacefill visual: element spheres sized by the size theme
#[derive(Debug)]
pub struct ElementSphereVisual {
    render_object: Option<Arc<RenderObject>>,
    state: Option<BuildState>,
    visible: bool,
    pickable: bool,
    build_count: usize,
}

impl Default for ElementSphereVisual {
    fn default() -> Self {
        Self {
            render_object: None,
            state: None,
            visible: true,
            pickable: true,
            build_count: 0,
        }
    }
}

impl ElementSphereVisual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed geometry builds
    pub fn build_count(&self) -> usize {
        self.build_count
    }

    async fn build_mesh(runtime: &RuntimeContext, state: &BuildState) -> ReprResult<MeshValues> {
        let structure = &state.structure;
        let count = structure.element_count();
        let tessellation = sphere(state.detail);
        let mut mesh = Mesh::with_capacity(
            count * tessellation.vertex_count(),
            count * tessellation.triangle_count(),
        );
        let mut colors = Vec::with_capacity(count);

        for (i, &position) in structure.positions().iter().enumerate() {
            if i % CHUNK == 0 {
                runtime
                    .update(format!("Creating spheres {}/{}", i, count))
                    .await?;
            }
            let radius = state.theme.size.size(structure, i) * state.size_factor;
            mesh.add_sphere(position, radius, state.detail, i as u32);
            colors.push(state.theme.color.color(structure, i));
        }
        runtime.check()?;

        Ok(MeshValues::from_mesh(mesh, &colors, state.alpha))
    }

    /// Install freshly built values
    ///
    /// Markers carry over only when the structure is the one they were set on.
    fn commit(&mut self, ctx: &VisualContext, mut values: MeshValues, same_structure: bool) {
        match &self.render_object {
            Some(object) => {
                if same_structure {
                    object.with_renderable(|previous| {
                        let marker = &previous.values().marker;
                        if marker.len() == values.marker.len() {
                            values.marker.copy_from_slice(marker);
                        }
                    });
                }
                object.replace_renderable(MeshRenderable::create(values));
            }
            None => {
                let object = RenderObject::new(ctx.next_object_id(), MeshRenderable::create(values));
                object.set_visible(self.visible);
                object.set_pickable(self.pickable);
                self.render_object = Some(object);
            }
        }
    }
}

impl Visual for ElementSphereVisual {
    fn create_or_update(
        &mut self,
        ctx: VisualContext,
        theme: Theme,
        props: Values,
        structure: Option<Arc<Structure>>,
    ) -> BoxFuture<'_, ReprResult<()>> {
        Box::pin(async move {
            let structure = match structure.or_else(|| self.state.as_ref().map(|s| s.structure.clone())) {
                Some(structure) => structure,
                None => return Ok(()),
            };
            let next = BuildState::from_props(structure, theme, &props);

            let reusable = match (&self.state, &self.render_object) {
                (Some(previous), Some(object)) if !previous.geometry_changed(&next) => {
                    Some((previous.color_changed(&next), Arc::clone(object)))
                }
                _ => None,
            };
            match reusable {
                Some((true, object)) => {
                    log::debug!("Recoloring {} spheres", next.structure.element_count());
                    object.update_color(&next.colors(), next.alpha);
                }
                Some((false, _)) => {}
                None => {
                    let values = Self::build_mesh(&ctx.runtime, &next).await?;
                    log::debug!(
                        "Built {} spheres at detail {}",
                        next.structure.element_count(),
                        next.detail
                    );
                    let same_structure = self
                        .state
                        .as_ref()
                        .is_some_and(|previous| Arc::ptr_eq(&previous.structure, &next.structure));
                    self.commit(&ctx, values, same_structure);
                    self.build_count += 1;
                }
            }
            self.state = Some(next);
            Ok(())
        })
    }

    fn render_object(&self) -> Option<&Arc<RenderObject>> {
        self.render_object.as_ref()
    }

    fn get_loci(&self, id: &PickingId) -> Loci {
        match (&self.render_object, &self.state) {
            (Some(object), Some(state))
                if object.id() == id.object_id
                    && (id.group_id as usize) < state.structure.element_count() =>
            {
                ElementLoci::single(state.structure.clone(), id.group_id as usize).into()
            }
            _ => Loci::Empty,
        }
    }

    fn mark(&mut self, loci: &Loci, action: MarkerAction) -> bool {
        let (object, state) = match (&self.render_object, &self.state) {
            (Some(object), Some(state)) => (object, state),
            _ => return false,
        };
        match loci {
            Loci::Every => object.update_marker(|marker| {
                let len = marker.len();
                apply_marker_action(marker, 0..len, action)
            }),
            Loci::Elements(elements) if Arc::ptr_eq(elements.structure(), &state.structure) => {
                object.update_marker(|marker| {
                    let mut changed = false;
                    for i in elements.indices() {
                        changed |= apply_marker_action(marker, i..i + 1, action);
                    }
                    changed
                })
            }
            _ => false,
        }
    }

    fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(object) = &self.render_object {
            object.set_visible(visible);
        }
    }

    fn set_pickable(&mut self, pickable: bool) {
        self.pickable = pickable;
        if let Some(object) = &self.render_object {
            object.set_pickable(pickable);
        }
    }

    fn destroy(&mut self) {
        self.render_object = None;
        self.state = None;
    }
}
