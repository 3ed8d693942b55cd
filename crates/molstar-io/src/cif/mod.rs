//! CIF data model and typed schema projection
//!
//! The raw model ([`Frame`], [`Category`], [`Field`]) describes already parsed
//! data blocks. [`schema`] projects typed, lazily built columns over it and
//! [`mmcif`] declares the mmCIF categories used to build structures.

pub mod binary_field;
pub mod data_model;
pub mod mmcif;
pub mod schema;
pub mod text_field;

pub use binary_field::{BinaryField, FieldData};
pub use data_model::{
    default_undefined_field, get_matrix, get_vector, matrix_field_name, vector_field_name,
    Category, ComponentFields, Field, Frame, UndefinedField, UndefinedFieldFactory, ValueKind,
};
pub use schema::{
    to_typed_category, to_typed_frame, to_typed_frame_with, CategorySchema, FieldKind,
    FieldSchema, FrameSchema, MissingRowCount, SchemaOptions, TypedCategory, TypedFrame,
};
pub use text_field::TextField;
