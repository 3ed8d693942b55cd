//! Molecular structures and loci
//!
//! - [`Element`] - chemical elements with van der Waals radii
//! - [`Structure`] - immutable atom list built from mmCIF `atom_site` data
//! - [`Loci`] - subsets of a structure used for picking and marking
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use molstar_io::cif::{mmcif, to_typed_frame, Category, Frame, TextField};
//! use molstar_mol::Structure;
//!
//! let text = |v: &[&str]| Arc::new(TextField::from_values(v));
//! let atom_site = Category::new("_atom_site", 2)
//!     .with_field("type_symbol", text(&["N", "C"])).unwrap()
//!     .with_field("Cartn_x", text(&["0.0", "1.5"])).unwrap()
//!     .with_field("Cartn_y", text(&["0.0", "0.0"])).unwrap()
//!     .with_field("Cartn_z", text(&["0.0", "0.0"])).unwrap();
//! let frame = Arc::new(Frame::new("demo").with_category(atom_site).unwrap());
//!
//! let typed = to_typed_frame(&mmcif::mmcif_schema(), frame).unwrap();
//! let structure = Structure::from_frame(&typed).unwrap();
//! assert_eq!(structure.element_count(), 2);
//! assert_eq!(structure.label(), "demo");
//! ```

pub mod element;
pub mod error;
pub mod loci;
pub mod structure;

pub use element::Element;
pub use error::{MolError, MolResult};
pub use loci::{ElementLoci, Loci};
pub use structure::{AtomSite, Structure};
