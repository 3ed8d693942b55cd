//! CIF data access for molecular data
//!
//! This crate provides the data layer between parsed CIF blocks and typed
//! consumers:
//!
//! - [`cif::data_model`] - raw frames, categories and fields
//! - [`cif::TextField`] / [`cif::BinaryField`] - in-memory field storage
//! - [`column`] - typed column views and bulk extraction
//! - [`cif::schema`] - schema declarations and lazy typed projection
//! - [`cif::mmcif`] - mmCIF category schemas
//!
//! Parsing CIF text or BinaryCIF is not part of this crate; fields are built
//! from already tokenized or decoded data.

pub mod cif;
pub mod column;
pub mod error;

// Re-exports
pub use cif::{
    to_typed_category, to_typed_frame, to_typed_frame_with, Category, CategorySchema, Field,
    FieldSchema, Frame, FrameSchema, SchemaOptions, TypedCategory, TypedFrame, ValueKind,
};
pub use column::{AnyColumn, Column, ColumnType, ToArrayParams};
pub use error::{CifError, CifResult};
