//! Geometry generation

pub mod mesh;
pub mod sphere;

pub use mesh::Mesh;
pub use sphere::{sphere, SphereTessellation, MAX_DETAIL};
