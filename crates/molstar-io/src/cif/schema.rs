//! Typed schema projection over raw CIF frames
//!
//! A schema declares the categories and fields a consumer expects and the
//! semantic type of each field. Projecting a raw [`Frame`] through a
//! [`FrameSchema`] yields a [`TypedFrame`]; every field column is built on
//! first access and cached for the lifetime of its [`TypedCategory`].
//!
//! Missing data is never an error: an absent category projects to an empty,
//! undefined category and an absent field to an undefined column. Schema
//! misconfiguration is reported when the schema is projected.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use molstar_io::cif::{to_typed_frame, Category, CategorySchema, FieldSchema, Frame, FrameSchema, TextField};
//! use molstar_io::column::Column;
//!
//! let atom_site = Category::new("_atom_site", 2)
//!     .with_field("label_atom_id", Arc::new(TextField::from_values(&["N", "CA"])))
//!     .unwrap();
//! let frame = Arc::new(Frame::new("1ABC").with_category(atom_site).unwrap());
//!
//! let schema = FrameSchema::new().category(
//!     "atom_site",
//!     CategorySchema::new().field("label_atom_id", FieldSchema::str()),
//! );
//!
//! let typed = to_typed_frame(&schema, frame).unwrap();
//! let column = typed.category("atom_site").unwrap().str("label_atom_id").unwrap();
//! assert_eq!(column.value(1), "CA");
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::column::{
    AnyColumn, ColumnType, FloatColumn, IntColumn, MatrixColumn, StrColumn, VectorColumn,
};
use crate::error::{CifError, CifResult};

use super::data_model::{
    default_undefined_field, Category, ComponentFields, Field, Frame, UndefinedFieldFactory,
};

/// Semantic kind of a schema field with its kind-specific parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Str,
    Int,
    Float,
    /// `size` components read from `key[1]..key[size]`
    Vector { size: usize },
    /// `rows x cols` components read from `key[i][j]`
    Matrix { rows: usize, cols: usize },
}

impl FieldKind {
    pub fn column_type(&self) -> ColumnType {
        match self {
            FieldKind::Str => ColumnType::Str,
            FieldKind::Int => ColumnType::Int,
            FieldKind::Float => ColumnType::Float,
            FieldKind::Vector { .. } => ColumnType::Vector,
            FieldKind::Matrix { .. } => ColumnType::Matrix,
        }
    }
}

/// Declaration of one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub kind: FieldKind,
    /// Name of the raw field when it differs from the schema key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Factory for the stand-in field used when the raw field is absent
    #[serde(skip)]
    pub undefined_field: Option<UndefinedFieldFactory>,
}

impl FieldSchema {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            alias: None,
            undefined_field: None,
        }
    }

    pub fn str() -> Self {
        Self::new(FieldKind::Str)
    }

    pub fn int() -> Self {
        Self::new(FieldKind::Int)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn vector(size: usize) -> Self {
        Self::new(FieldKind::Vector { size })
    }

    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self::new(FieldKind::Matrix { rows, cols })
    }

    /// Read the column from raw field `alias` instead of the schema key
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Use `factory` instead of the library default when the raw field is absent
    pub fn with_undefined_field(mut self, factory: UndefinedFieldFactory) -> Self {
        self.undefined_field = Some(factory);
        self
    }

    fn validate(&self, key: &str) -> CifResult<()> {
        if let Some(alias) = &self.alias {
            validate_alias(key, alias)?;
        }
        match self.kind {
            FieldKind::Vector { size: 0 } => Err(CifError::InvalidShape {
                key: key.to_string(),
                reason: "vector size must be positive".to_string(),
            }),
            FieldKind::Matrix { rows, cols } if rows == 0 || cols == 0 => {
                Err(CifError::InvalidShape {
                    key: key.to_string(),
                    reason: format!("matrix shape {}x{} has a zero dimension", rows, cols),
                })
            }
            _ => Ok(()),
        }
    }
}

fn validate_alias(key: &str, alias: &str) -> CifResult<()> {
    if alias.is_empty() || alias.contains('.') || alias.chars().any(char::is_whitespace) {
        return Err(CifError::invalid_alias(key, alias));
    }
    Ok(())
}

/// Ordered field declarations of one category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySchema {
    /// Raw category name when it differs from the schema key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub fields: Vec<(String, FieldSchema)>,
}

impl CategorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the category against raw name `alias` (with or without the leading `_`)
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Declare a field, builder style
    pub fn field(mut self, key: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.push((key.into(), schema));
        self
    }

    /// Index of the field declared under `key`
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Field keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Check aliases, key uniqueness and vector/matrix shapes
    pub fn validate(&self, key: &str) -> CifResult<()> {
        if let Some(alias) = &self.alias {
            validate_alias(key, alias)?;
        }
        for (i, (field_key, schema)) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|(k, _)| k == field_key) {
                return Err(CifError::duplicate_key(key, field_key.as_str()));
            }
            schema.validate(field_key)?;
        }
        Ok(())
    }

    /// Raw category name for schema key `key`
    ///
    /// The alias, or the key itself, prefixed with `_` unless already present.
    pub fn category_name(&self, key: &str) -> String {
        let name = self.alias.as_deref().unwrap_or(key);
        if name.starts_with('_') {
            name.to_string()
        } else {
            format!("_{}", name)
        }
    }
}

/// Ordered category declarations of one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSchema {
    pub categories: Vec<(String, CategorySchema)>,
}

impl FrameSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a category, builder style
    pub fn category(mut self, key: impl Into<String>, schema: CategorySchema) -> Self {
        self.categories.push((key.into(), schema));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CategorySchema> {
        self.categories.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn validate(&self) -> CifResult<()> {
        for (i, (key, schema)) in self.categories.iter().enumerate() {
            if self.categories[..i].iter().any(|(k, _)| k == key) {
                return Err(CifError::duplicate_key("frame schema", key.as_str()));
            }
            schema.validate(key)?;
        }
        Ok(())
    }
}

/// Row count given to categories that are missing from a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRowCount {
    /// Missing categories are empty
    #[default]
    Zero,
    /// Missing categories report a fixed row count, all of it undefined
    Fixed(usize),
}

impl MissingRowCount {
    pub fn rows(&self) -> usize {
        match self {
            MissingRowCount::Zero => 0,
            MissingRowCount::Fixed(n) => *n,
        }
    }
}

/// Projection options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    pub missing_category_rows: MissingRowCount,
}

/// Typed, lazily materialized view over one raw category
pub struct TypedCategory {
    category: Arc<Category>,
    schema: Arc<CategorySchema>,
    is_defined: bool,
    columns: Vec<OnceLock<AnyColumn>>,
}

impl TypedCategory {
    fn new(category: Arc<Category>, schema: Arc<CategorySchema>, is_defined: bool) -> Self {
        let columns = schema.fields.iter().map(|_| OnceLock::new()).collect();
        Self {
            category,
            schema,
            is_defined,
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.category.row_count()
    }

    /// Whether the raw category was present in the source frame
    pub fn is_defined(&self) -> bool {
        self.is_defined
    }

    /// The raw category this view reads from
    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    pub fn schema(&self) -> &CategorySchema {
        &self.schema
    }

    /// Column for schema field `key`, built on first access
    pub fn column(&self, key: &str) -> CifResult<&AnyColumn> {
        let index = self
            .schema
            .position(key)
            .ok_or_else(|| CifError::unknown_field(self.category.name(), key))?;
        let (_, field_schema) = &self.schema.fields[index];
        Ok(self.columns[index].get_or_init(|| {
            log::debug!(
                "Materializing column {}.{} ({})",
                self.category.name(),
                key,
                field_schema.kind.column_type()
            );
            build_column(&self.category, key, field_schema)
        }))
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        requested: ColumnType,
        cast: impl FnOnce(&'a AnyColumn) -> Option<&'a T>,
    ) -> CifResult<&'a T> {
        let column = self.column(key)?;
        cast(column).ok_or_else(|| CifError::ColumnTypeMismatch {
            field: key.to_string(),
            requested,
            actual: column.column_type(),
        })
    }

    pub fn str(&self, key: &str) -> CifResult<&StrColumn> {
        self.typed(key, ColumnType::Str, AnyColumn::as_str)
    }

    pub fn int(&self, key: &str) -> CifResult<&IntColumn> {
        self.typed(key, ColumnType::Int, AnyColumn::as_int)
    }

    pub fn float(&self, key: &str) -> CifResult<&FloatColumn> {
        self.typed(key, ColumnType::Float, AnyColumn::as_float)
    }

    pub fn vector(&self, key: &str) -> CifResult<&VectorColumn> {
        self.typed(key, ColumnType::Vector, AnyColumn::as_vector)
    }

    pub fn matrix(&self, key: &str) -> CifResult<&MatrixColumn> {
        self.typed(key, ColumnType::Matrix, AnyColumn::as_matrix)
    }

    /// Number of columns built so far
    pub fn materialized_count(&self) -> usize {
        self.columns.iter().filter(|c| c.get().is_some()).count()
    }
}

impl fmt::Debug for TypedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCategory")
            .field("name", &self.category.name())
            .field("row_count", &self.row_count())
            .field("is_defined", &self.is_defined)
            .field("fields", &self.schema.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build the column for one schema field over `category`
fn build_column(category: &Category, key: &str, schema: &FieldSchema) -> AnyColumn {
    let name = schema.alias.as_deref().unwrap_or(key);
    let undefined = schema.undefined_field.unwrap_or(default_undefined_field);
    let row_count = category.row_count();
    let raw = category.get_field(name).cloned();
    let field = |fallback: Option<&Arc<dyn Field>>| -> Arc<dyn Field> {
        raw.clone()
            .or_else(|| fallback.cloned())
            .unwrap_or_else(|| undefined(row_count))
    };

    match schema.kind {
        FieldKind::Str => AnyColumn::Str(StrColumn::new(field(None))),
        FieldKind::Int => AnyColumn::Int(IntColumn::new(field(None))),
        FieldKind::Float => AnyColumn::Float(FloatColumn::new(field(None))),
        FieldKind::Vector { size } => {
            let components = ComponentFields::vector(category, name, size);
            let field = field(components.first());
            AnyColumn::Vector(VectorColumn::new(field, size, components))
        }
        FieldKind::Matrix { rows, cols } => {
            let components = ComponentFields::matrix(category, name, rows, cols);
            let field = field(components.first());
            AnyColumn::Matrix(MatrixColumn::new(field, rows, cols, components))
        }
    }
}

/// Project a raw category; the result is marked defined
pub fn to_typed_category(schema: &CategorySchema, category: Arc<Category>) -> CifResult<TypedCategory> {
    schema.validate(category.name())?;
    Ok(TypedCategory::new(category, Arc::new(schema.clone()), true))
}

/// Typed view over one raw frame
pub struct TypedFrame {
    frame: Arc<Frame>,
    categories: Vec<(String, TypedCategory)>,
}

impl TypedFrame {
    /// Data block header of the source frame
    pub fn header(&self) -> &str {
        self.frame.header()
    }

    pub fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }

    /// Typed category for schema key `key`
    pub fn category(&self, key: &str) -> CifResult<&TypedCategory> {
        self.categories
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
            .ok_or_else(|| CifError::UnknownCategory(key.to_string()))
    }

    /// Typed categories in schema order
    pub fn categories(&self) -> impl Iterator<Item = (&str, &TypedCategory)> + '_ {
        self.categories.iter().map(|(k, c)| (k.as_str(), c))
    }
}

impl fmt::Debug for TypedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFrame")
            .field("header", &self.header())
            .field("categories", &self.categories)
            .finish()
    }
}

/// Project a raw frame with default options
pub fn to_typed_frame(schema: &FrameSchema, frame: Arc<Frame>) -> CifResult<TypedFrame> {
    to_typed_frame_with(schema, frame, &SchemaOptions::default())
}

/// Project a raw frame
///
/// Categories are looked up by their resolved name (`_`-prefixed alias or
/// key), then by the bare key. Categories missing from the frame become
/// empty, undefined placeholders.
pub fn to_typed_frame_with(
    schema: &FrameSchema,
    frame: Arc<Frame>,
    options: &SchemaOptions,
) -> CifResult<TypedFrame> {
    schema.validate()?;

    let mut categories = Vec::with_capacity(schema.categories.len());
    for (key, category_schema) in &schema.categories {
        let name = category_schema.category_name(key);
        let raw = frame
            .get_category(&name)
            .or_else(|| frame.get_category(key))
            .cloned();
        let typed = match raw {
            Some(category) => TypedCategory::new(category, Arc::new(category_schema.clone()), true),
            None => {
                log::debug!("Category {} not in frame '{}'", name, frame.header());
                let placeholder = Category::new(name, options.missing_category_rows.rows());
                TypedCategory::new(
                    Arc::new(placeholder),
                    Arc::new(category_schema.clone()),
                    false,
                )
            }
        };
        categories.push((key.clone(), typed));
    }

    Ok(TypedFrame { frame, categories })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cif::TextField;
    use crate::column::Column;

    fn text(values: &[&str]) -> Arc<dyn Field> {
        Arc::new(TextField::from_values(values))
    }

    #[test]
    fn test_category_name_resolution() {
        assert_eq!(CategorySchema::new().category_name("atom_site"), "_atom_site");
        assert_eq!(CategorySchema::new().category_name("_cell"), "_cell");
        assert_eq!(
            CategorySchema::new().with_alias("foo").category_name("bar"),
            "_foo"
        );
    }

    #[test]
    fn test_validate_rejects_bad_aliases() {
        for alias in ["", "a b", "a.b"] {
            let schema = CategorySchema::new().field("x", FieldSchema::str().with_alias(alias));
            assert!(matches!(
                schema.validate("test"),
                Err(CifError::InvalidAlias { .. })
            ));
        }
        let schema = CategorySchema::new().with_alias(" ");
        assert!(schema.validate("test").is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_shapes() {
        let duplicate = CategorySchema::new()
            .field("x", FieldSchema::int())
            .field("x", FieldSchema::float());
        assert!(matches!(
            duplicate.validate("test"),
            Err(CifError::DuplicateKey { .. })
        ));

        let vector = CategorySchema::new().field("v", FieldSchema::vector(0));
        assert!(matches!(
            vector.validate("test"),
            Err(CifError::InvalidShape { .. })
        ));

        let matrix = CategorySchema::new().field("m", FieldSchema::matrix(3, 0));
        assert!(matches!(
            matrix.validate("test"),
            Err(CifError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_field_alias_reads_renamed_field() {
        let category = Category::new("_entity", 1)
            .with_field("pdbx_description", text(&["Lysozyme"]))
            .unwrap();
        let schema =
            CategorySchema::new().field("description", FieldSchema::str().with_alias("pdbx_description"));
        let typed = to_typed_category(&schema, Arc::new(category)).unwrap();
        assert_eq!(typed.str("description").unwrap().value(0), "Lysozyme");
    }

    #[test]
    fn test_typed_accessor_errors() {
        let schema = CategorySchema::new().field("id", FieldSchema::int());
        let typed = to_typed_category(&schema, Arc::new(Category::new("_entry", 0))).unwrap();

        assert!(matches!(
            typed.str("id"),
            Err(CifError::ColumnTypeMismatch {
                requested: ColumnType::Str,
                actual: ColumnType::Int,
                ..
            })
        ));
        assert!(matches!(typed.int("missing"), Err(CifError::UnknownField { .. })));
    }

    #[test]
    fn test_columns_materialize_lazily() {
        let schema = CategorySchema::new()
            .field("a", FieldSchema::int())
            .field("b", FieldSchema::int());
        let typed = to_typed_category(&schema, Arc::new(Category::new("_t", 0))).unwrap();
        assert_eq!(typed.materialized_count(), 0);
        typed.column("b").unwrap();
        assert_eq!(typed.materialized_count(), 1);
    }

    #[test]
    fn test_vector_definedness_from_first_component() {
        let category = Category::new("_atom_sites", 1)
            .with_field("v[1]", text(&["1"]))
            .unwrap()
            .with_field("v[2]", text(&["2"]))
            .unwrap();
        let schema = CategorySchema::new().field("v", FieldSchema::vector(2));
        let typed = to_typed_category(&schema, Arc::new(category)).unwrap();
        let column = typed.vector("v").unwrap();
        assert!(column.is_defined());
        assert_eq!(column.row_count(), 1);
        assert_eq!(column.value(0), vec![1.0, 2.0]);
    }
}
