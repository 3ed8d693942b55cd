//! Spacefill example
//!
//! Builds a small mmCIF frame in memory, projects it through the mmCIF
//! schema, creates a spacefill representation and "draws" its render
//! objects through a backend that only logs the draw calls.
//!
//! Run with `RUST_LOG=debug` to see cache fills and rebuild decisions.

use std::sync::Arc;

use molstar_io::cif::{mmcif, to_typed_frame, Category, Frame, TextField};
use molstar_mol::Structure;
use molstar_repr::renderable::{DrawBackend, DrawCall};
use molstar_repr::theme::COLOR_THEME_PROP;
use molstar_repr::{
    spacefill_representation, MarkerAction, ParamValue, PickingId, Representation,
    RepresentationContext, Values,
};

struct LoggingBackend;

impl DrawBackend for LoggingBackend {
    fn draw(&mut self, call: &DrawCall<'_>) {
        log::info!(
            "draw object {}: {} indices x {} instances, {} groups, alpha {}",
            call.object_id,
            call.draw_count,
            call.instance_count,
            call.values.group_count(),
            call.values.alpha
        );
    }
}

fn sample_frame() -> Result<Arc<Frame>, Box<dyn std::error::Error>> {
    let text = |values: &[&str]| Arc::new(TextField::from_values(values));
    let atom_site = Category::new("_atom_site", 5)
        .with_field("label_atom_id", text(&["N", "CA", "C", "O", "CB"]))?
        .with_field("type_symbol", text(&["N", "C", "C", "O", "C"]))?
        .with_field("label_asym_id", text(&["A", "A", "A", "A", "B"]))?
        .with_field("Cartn_x", text(&["-0.677", "0.000", "1.520", "2.156", "-0.520"]))?
        .with_field("Cartn_y", text(&["-1.230", "0.000", "0.000", "-1.051", "0.770"]))?
        .with_field("Cartn_z", text(&["-0.491", "0.000", "0.000", "0.000", "-1.232"]))?
        .with_field("pdbx_PDB_model_num", text(&["1", "1", "1", "1", "1"]))?;
    Ok(Arc::new(Frame::new("DEMO").with_category(atom_site)?))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let typed = to_typed_frame(&mmcif::mmcif_schema(), sample_frame()?)?;
    let structure = Arc::new(Structure::from_frame(&typed)?);
    log::info!(
        "Loaded '{}' with {} elements in {} chains",
        structure.label(),
        structure.element_count(),
        structure.chain_count()
    );

    let ctx = RepresentationContext::default();
    let mut repr = spacefill_representation();
    let mut updated = repr.subscribe_updated();

    repr.create_or_update(&ctx, Values::new(), Some(structure))?
        .run()
        .await?;

    let chain_colors = Values::new().with(COLOR_THEME_PROP, ParamValue::Select("chain-id".into()));
    repr.create_or_update(&ctx, chain_colors, None)?.run().await?;

    while let Ok(version) = updated.try_recv() {
        log::info!("{} reached version {}", repr.label(), version);
    }

    let mut backend = LoggingBackend;
    for object in repr.render_objects() {
        let loci = repr.get_loci(&PickingId::new(object.id(), 0, 1));
        if repr.mark(&loci, MarkerAction::Highlight) {
            log::info!("Highlighted element 1 of object {}", object.id());
        }
        object.draw(&mut backend);
    }

    repr.destroy();
    Ok(())
}
