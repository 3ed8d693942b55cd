//! Error types for structure construction

use molstar_io::CifError;
use thiserror::Error;

/// Errors that can occur when building structures
#[derive(Error, Debug, Clone)]
pub enum MolError {
    /// The atom_site category lacks a coordinate field
    #[error("Missing coordinates: atom_site.{0} is not defined")]
    MissingCoordinates(String),

    /// Element index is out of bounds
    #[error("Element index {index} is out of bounds (count: {count})")]
    ElementOutOfBounds { index: usize, count: usize },

    /// Typed CIF access failed
    #[error("CIF error: {0}")]
    Cif(#[from] CifError),
}

/// Result type for structure operations
pub type MolResult<T> = Result<T, MolError>;
