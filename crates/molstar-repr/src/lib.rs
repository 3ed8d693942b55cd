//! molstar-repr: structure representations and their update lifecycle
//!
//! This crate turns a [`molstar_mol::Structure`] into backend-independent
//! render objects:
//!
//! - **Params**: typed parameter declarations and prop values
//! - **Themes**: color and size themes looked up in an injected registry
//! - **Visuals**: geometry builders owning one render object each
//! - **Representations**: long-lived owners of a visual that merge prop
//!   updates and publish a version after every completed update
//! - **Tasks**: cancellable async work with cooperative progress checkpoints
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lin_alg::f32::Vec3;
//! use molstar_mol::{AtomSite, Element, Structure};
//! use molstar_repr::{spacefill_representation, Representation, RepresentationContext, Values};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let structure = Arc::new(Structure::from_atoms(
//!     "water",
//!     vec![AtomSite::new("O", Element::OXYGEN, Vec3::new(0.0, 0.0, 0.0), "A")],
//! ));
//! let ctx = RepresentationContext::default();
//! let mut repr = spacefill_representation();
//!
//! repr.create_or_update(&ctx, Values::new(), Some(structure))
//!     .unwrap()
//!     .run()
//!     .await
//!     .unwrap();
//! assert_eq!(repr.render_objects().len(), 1);
//! assert_eq!(repr.version(), Some(0));
//! # });
//! ```

pub mod color;
pub mod complex_representation;
pub mod error;
pub mod geometry;
pub mod marker;
pub mod param;
pub mod picking;
pub mod renderable;
pub mod representation;
pub mod spacefill;
pub mod task;
pub mod theme;
pub mod visual;

pub use color::Color;
pub use complex_representation::ComplexRepresentation;
pub use error::{ReprError, ReprResult};
pub use marker::{MarkerAction, MarkerFlags};
pub use param::{ParamDefinition, ParamValue, Params, Values};
pub use picking::PickingId;
pub use renderable::{DrawBackend, DrawCall, MeshRenderable, MeshValues, RenderObject};
pub use representation::{Representation, RepresentationContext, RepresentationParamsGetter};
pub use spacefill::{spacefill_representation, SpacefillRepresentation};
pub use task::{CancellationToken, RuntimeContext, Task};
pub use theme::{create_theme, ColorTheme, SizeTheme, Theme, ThemeDataContext, ThemeRegistry};
pub use visual::{Visual, VisualContext};
