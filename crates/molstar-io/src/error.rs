//! Error types for the CIF data model and schema projection
//!
//! Missing optional data is never an error; these variants describe
//! programming or configuration defects that should surface loudly.

use thiserror::Error;

use crate::column::ColumnType;

/// Errors raised while building raw frames or projecting typed views
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CifError {
    /// An alias is empty or contains characters that cannot name a category or field
    #[error("Invalid alias '{alias}' for '{key}'")]
    InvalidAlias { key: String, alias: String },

    /// A key was declared twice in the same schema or data block
    #[error("Duplicate key '{key}' in '{scope}'")]
    DuplicateKey { scope: String, key: String },

    /// A vector or matrix field was declared with a zero dimension
    #[error("Invalid shape for field '{key}': {reason}")]
    InvalidShape { key: String, reason: String },

    /// A category key that the schema does not declare was requested
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A field key that the category schema does not declare was requested
    #[error("Unknown field '{field}' in category '{category}'")]
    UnknownField { category: String, field: String },

    /// A column was requested as the wrong kind
    #[error("Column '{field}' has type {actual}, requested {requested}")]
    ColumnTypeMismatch {
        field: String,
        requested: ColumnType,
        actual: ColumnType,
    },

    /// A field does not have the row count of its category
    #[error("Field '{field}' has {actual} rows, category '{category}' has {expected}")]
    RowCountMismatch {
        category: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A text token points outside its backing data or splits a character
    #[error("Token {index} ({start}..{end}) is outside the field data")]
    InvalidToken {
        index: usize,
        start: usize,
        end: usize,
    },
}

impl CifError {
    /// Create an invalid alias error
    pub fn invalid_alias(key: impl Into<String>, alias: impl Into<String>) -> Self {
        CifError::InvalidAlias {
            key: key.into(),
            alias: alias.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(scope: impl Into<String>, key: impl Into<String>) -> Self {
        CifError::DuplicateKey {
            scope: scope.into(),
            key: key.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(category: impl Into<String>, field: impl Into<String>) -> Self {
        CifError::UnknownField {
            category: category.into(),
            field: field.into(),
        }
    }
}

/// Result type for CIF data model operations
pub type CifResult<T> = Result<T, CifError>;
