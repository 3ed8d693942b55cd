//! Representation driving a single visual over the whole structure

use std::sync::Arc;

use molstar_mol::{Loci, Structure};
use tokio::sync::broadcast;

use crate::error::{ReprError, ReprResult};
use crate::marker::MarkerAction;
use crate::param::{Params, Values};
use crate::picking::PickingId;
use crate::renderable::RenderObject;
use crate::representation::{Representation, RepresentationContext, RepresentationParamsGetter};
use crate::task::Task;
use crate::theme::{create_theme, Theme, ThemeDataContext};
use crate::visual::{Visual, VisualContext};

const UPDATED_CAPACITY: usize = 16;

/// Representation with one visual covering the entire structure
pub struct ComplexRepresentation<V> {
    label: String,
    get_params: RepresentationParamsGetter,
    create_visual: fn() -> V,
    visual: Option<V>,
    structure: Option<Arc<Structure>>,
    params: Option<Params>,
    props: Option<Values>,
    theme: Option<Theme>,
    version: Option<u64>,
    updated: broadcast::Sender<u64>,
}

impl<V: Visual> ComplexRepresentation<V> {
    pub fn new(
        label: impl Into<String>,
        get_params: RepresentationParamsGetter,
        create_visual: fn() -> V,
    ) -> Self {
        let (updated, _) = broadcast::channel(UPDATED_CAPACITY);
        Self {
            label: label.into(),
            get_params,
            create_visual,
            visual: None,
            structure: None,
            params: None,
            props: None,
            theme: None,
            version: None,
            updated,
        }
    }

    /// The visual, once the first update created it
    pub fn visual(&self) -> Option<&V> {
        self.visual.as_ref()
    }
}

impl<V> std::fmt::Debug for ComplexRepresentation<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexRepresentation")
            .field("label", &self.label)
            .field("bound", &self.structure.is_some())
            .field("has_visual", &self.visual.is_some())
            .field("version", &self.version)
            .finish()
    }
}

impl<V: Visual> Representation for ComplexRepresentation<V> {
    fn label(&self) -> &str {
        &self.label
    }

    fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    fn props(&self) -> Option<&Values> {
        self.props.as_ref()
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    fn version(&self) -> Option<u64> {
        self.version
    }

    fn subscribe_updated(&self) -> broadcast::Receiver<u64> {
        self.updated.subscribe()
    }

    fn render_objects(&self) -> Vec<Arc<RenderObject>> {
        self.visual
            .as_ref()
            .and_then(|v| v.render_object())
            .cloned()
            .into_iter()
            .collect()
    }

    fn structure(&self) -> Option<&Arc<Structure>> {
        self.structure.as_ref()
    }

    fn create_or_update<'a>(
        &'a mut self,
        ctx: &RepresentationContext,
        props: Values,
        structure: Option<Arc<Structure>>,
    ) -> ReprResult<Task<'a, ()>> {
        let structure = match structure.or_else(|| self.structure.clone()) {
            Some(structure) => structure,
            None => return Err(ReprError::NotBound(self.label.clone())),
        };
        let structure_changed = !matches!(&self.structure, Some(s) if Arc::ptr_eq(s, &structure));

        let params = match &self.params {
            Some(params) if !structure_changed => params.clone(),
            _ => (self.get_params)(ctx, &structure),
        };
        let base = match &self.props {
            Some(props) => props.clone(),
            None => params.default_values(),
        };
        for (name, _) in props.iter().filter(|(name, _)| !params.contains(name)) {
            log::debug!("{}: ignoring unknown prop '{}'", self.label, name);
        }
        let merged = base.merged(&props);

        let data = ThemeDataContext::new(Arc::clone(&structure));
        let theme = create_theme(&ctx.themes, &data, &merged, self.theme.as_ref())?;

        self.structure = Some(Arc::clone(&structure));
        self.params = Some(params);
        self.props = Some(merged.clone());
        self.theme = Some(theme.clone());

        let object_ids = ctx.object_ids();
        let name = format!("Creating or updating {} representation", self.label);
        Ok(Task::create(name, move |runtime| async move {
            let create_visual = self.create_visual;
            let visual = self.visual.get_or_insert_with(create_visual);
            visual
                .create_or_update(
                    VisualContext::new(runtime, object_ids),
                    theme,
                    merged,
                    Some(structure),
                )
                .await?;

            let version = self.version.map_or(0, |v| v + 1);
            self.version = Some(version);
            // No receivers is fine
            let _ = self.updated.send(version);
            log::debug!("{} updated to version {}", self.label, version);
            Ok(())
        }))
    }

    fn get_loci(&self, id: &PickingId) -> Loci {
        self.visual
            .as_ref()
            .map_or(Loci::Empty, |visual| visual.get_loci(id))
    }

    fn mark(&mut self, loci: &Loci, action: MarkerAction) -> bool {
        self.visual
            .as_mut()
            .is_some_and(|visual| visual.mark(loci, action))
    }

    fn set_visibility(&mut self, visible: bool) {
        if let Some(visual) = &mut self.visual {
            visual.set_visibility(visible);
        }
    }

    fn set_pickable(&mut self, pickable: bool) {
        if let Some(visual) = &mut self.visual {
            visual.set_pickable(pickable);
        }
    }

    fn destroy(&mut self) {
        if let Some(mut visual) = self.visual.take() {
            log::debug!("Destroying {} visual", self.label);
            visual.destroy();
        }
    }
}
