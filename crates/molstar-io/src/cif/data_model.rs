//! Raw CIF data model
//!
//! A [`Frame`] is one parsed data block: named [`Category`] tables whose
//! untyped [`Field`]s share a row count. Nothing here knows about semantic
//! types; the schema layer in [`super::schema`] projects typed columns over it.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::column::{create_and_fill_array, ToArrayParams};
use crate::error::{CifError, CifResult};

/// Presence of the value stored in one row of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ValueKind {
    /// A value is present
    #[default]
    Present = 0,
    /// Explicitly absent (`.` in CIF)
    NotPresent = 1,
    /// Unknown (`?` in CIF)
    Unknown = 2,
}

impl ValueKind {
    /// Decode a BinaryCIF-style mask byte
    pub fn from_mask(mask: u8) -> Self {
        match mask {
            0 => ValueKind::Present,
            1 => ValueKind::NotPresent,
            _ => ValueKind::Unknown,
        }
    }

    /// Classify a raw CIF text token
    pub fn from_token(token: &str) -> Self {
        match token {
            "." => ValueKind::NotPresent,
            "?" => ValueKind::Unknown,
            _ => ValueKind::Present,
        }
    }
}

/// A single named column of raw values within a category
///
/// Accessors never fail: rows that are absent, unparsable or out of range
/// read as the kind-appropriate default (`""`, `0`, `0.0`).
pub trait Field: Send + Sync + fmt::Debug {
    /// Whether the field exists in the source data
    fn is_defined(&self) -> bool;

    /// Number of rows
    fn row_count(&self) -> usize;

    /// Value at `row` as a string
    fn str(&self, row: usize) -> Cow<'_, str>;

    /// Value at `row` as an integer
    fn int(&self, row: usize) -> i32;

    /// Value at `row` as a float
    fn float(&self, row: usize) -> f64;

    /// Presence of the value at `row`
    fn value_kind(&self, row: usize) -> ValueKind;

    /// Whether two rows hold the same raw value
    fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool;

    /// Whether the value at `row` equals `value`
    fn string_equals(&self, row: usize, value: &str) -> bool;

    /// Copy (a range of) the field as strings
    fn to_string_array(&self, params: &ToArrayParams) -> Vec<String> {
        create_and_fill_array(self.row_count(), |row| self.str(row).into_owned(), params)
    }

    /// Copy (a range of) the field as integers
    fn to_int_array(&self, params: &ToArrayParams) -> Vec<i32> {
        create_and_fill_array(self.row_count(), |row| self.int(row), params)
    }

    /// Copy (a range of) the field as floats
    fn to_float_array(&self, params: &ToArrayParams) -> Vec<f64> {
        create_and_fill_array(self.row_count(), |row| self.float(row), params)
    }
}

/// Factory for the synthetic field used when a named field is absent
pub type UndefinedFieldFactory = fn(usize) -> Arc<dyn Field>;

/// Field standing in for data that is not in the source
///
/// Reports `row_count` rows, every one of them [`ValueKind::NotPresent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndefinedField {
    row_count: usize,
}

impl UndefinedField {
    pub fn new(row_count: usize) -> Self {
        Self { row_count }
    }
}

impl Field for UndefinedField {
    fn is_defined(&self) -> bool {
        false
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn str(&self, _row: usize) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn int(&self, _row: usize) -> i32 {
        0
    }

    fn float(&self, _row: usize) -> f64 {
        0.0
    }

    fn value_kind(&self, _row: usize) -> ValueKind {
        ValueKind::NotPresent
    }

    fn are_values_equal(&self, _row_a: usize, _row_b: usize) -> bool {
        true
    }

    fn string_equals(&self, _row: usize, value: &str) -> bool {
        value.is_empty()
    }
}

/// Library-wide default for [`UndefinedFieldFactory`]
pub fn default_undefined_field(row_count: usize) -> Arc<dyn Field> {
    Arc::new(UndefinedField::new(row_count))
}

/// A named table of fields sharing a row count
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    row_count: usize,
    field_names: Vec<String>,
    fields: AHashMap<String, Arc<dyn Field>>,
}

impl Category {
    /// Create a category with no fields
    pub fn new(name: impl Into<String>, row_count: usize) -> Self {
        Self {
            name: name.into(),
            row_count,
            field_names: Vec::new(),
            fields: AHashMap::new(),
        }
    }

    /// Placeholder for a category missing from its frame
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    /// Add a field, builder style
    pub fn with_field(mut self, name: impl Into<String>, field: Arc<dyn Field>) -> CifResult<Self> {
        self.add_field(name, field)?;
        Ok(self)
    }

    /// Add a field
    ///
    /// The field must have the category's row count and a name not used yet.
    pub fn add_field(&mut self, name: impl Into<String>, field: Arc<dyn Field>) -> CifResult<()> {
        let name = name.into();
        if field.row_count() != self.row_count {
            return Err(CifError::RowCountMismatch {
                category: self.name.clone(),
                field: name,
                expected: self.row_count,
                actual: field.row_count(),
            });
        }
        if self.fields.contains_key(&name) {
            return Err(CifError::duplicate_key(&self.name, name));
        }
        self.field_names.push(name.clone());
        self.fields.insert(name, field);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Look up a field by name
    pub fn get_field(&self, name: &str) -> Option<&Arc<dyn Field>> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// One parsed data block
#[derive(Debug, Clone, Default)]
pub struct Frame {
    header: String,
    category_names: Vec<String>,
    categories: AHashMap<String, Arc<Category>>,
}

impl Frame {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            category_names: Vec::new(),
            categories: AHashMap::new(),
        }
    }

    /// Add a category, builder style
    pub fn with_category(mut self, category: Category) -> CifResult<Self> {
        self.add_category(category)?;
        Ok(self)
    }

    /// Add a category under its own name
    pub fn add_category(&mut self, category: Category) -> CifResult<()> {
        let name = category.name().to_string();
        if self.categories.contains_key(&name) {
            return Err(CifError::duplicate_key(&self.header, name));
        }
        self.category_names.push(name.clone());
        self.categories.insert(name, Arc::new(category));
        Ok(())
    }

    /// Data block header (the text after `data_`)
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Category names in insertion order
    pub fn category_names(&self) -> &[String] {
        &self.category_names
    }

    pub fn get_category(&self, name: &str) -> Option<&Arc<Category>> {
        self.categories.get(name)
    }

    /// Categories in insertion order
    pub fn categories(&self) -> impl Iterator<Item = &Arc<Category>> + '_ {
        self.category_names
            .iter()
            .filter_map(|name| self.categories.get(name))
    }
}

/// Name of the `index`-th (0-based) component of a vector field: `key[index + 1]`
pub fn vector_field_name(key: &str, index: usize) -> String {
    format!("{}[{}]", key, index + 1)
}

/// Name of the (`row`, `col`) (0-based) component of a matrix field: `key[row + 1][col + 1]`
pub fn matrix_field_name(key: &str, row: usize, col: usize) -> String {
    format!("{}[{}][{}]", key, row + 1, col + 1)
}

/// Component fields of a vector or matrix stored as numbered sub-fields
///
/// Resolves every component name once so positional reads do no string
/// formatting. Missing components read as `0.0`.
#[derive(Debug, Clone)]
pub struct ComponentFields {
    rows: usize,
    cols: usize,
    fields: Vec<Option<Arc<dyn Field>>>,
}

impl ComponentFields {
    /// Resolve the `size` components `key[1]..key[size]`
    pub fn vector(category: &Category, key: &str, size: usize) -> Self {
        let fields = (0..size)
            .map(|i| category.get_field(&vector_field_name(key, i)).cloned())
            .collect();
        Self {
            rows: size,
            cols: 1,
            fields,
        }
    }

    /// Resolve the `rows * cols` components `key[1][1]..key[rows][cols]`, row-major
    pub fn matrix(category: &Category, key: &str, rows: usize, cols: usize) -> Self {
        let mut fields = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                fields.push(category.get_field(&matrix_field_name(key, i, j)).cloned());
            }
        }
        Self { rows, cols, fields }
    }

    /// The first resolved component, if any
    pub fn first(&self) -> Option<&Arc<dyn Field>> {
        self.fields.first().and_then(|f| f.as_ref())
    }

    fn component(&self, index: usize, row: usize) -> f64 {
        match self.fields.get(index) {
            Some(Some(field)) => field.float(row),
            _ => 0.0,
        }
    }

    /// Components of `row` as a flat vector
    pub fn vector_at(&self, row: usize) -> Vec<f64> {
        (0..self.fields.len()).map(|i| self.component(i, row)).collect()
    }

    /// Components of `row` as a `rows x cols` matrix
    pub fn matrix_at(&self, row: usize) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|i| (0..self.cols).map(|j| self.component(i * self.cols + j, row)).collect())
            .collect()
    }
}

/// Read an `size`-component vector stored as sub-fields `key[1]..key[size]`
pub fn get_vector(category: &Category, key: &str, size: usize, row: usize) -> Vec<f64> {
    ComponentFields::vector(category, key, size).vector_at(row)
}

/// Read a `rows x cols` matrix stored as sub-fields `key[i][j]`
pub fn get_matrix(
    category: &Category,
    key: &str,
    rows: usize,
    cols: usize,
    row: usize,
) -> Vec<Vec<f64>> {
    ComponentFields::matrix(category, key, rows, cols).matrix_at(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cif::TextField;

    fn text(values: &[&str]) -> Arc<dyn Field> {
        Arc::new(TextField::from_values(values))
    }

    #[test]
    fn test_undefined_field_defaults() {
        let field = default_undefined_field(4);
        assert!(!field.is_defined());
        assert_eq!(field.row_count(), 4);
        assert_eq!(field.str(2), "");
        assert_eq!(field.int(2), 0);
        assert_eq!(field.float(2), 0.0);
        assert_eq!(field.value_kind(3), ValueKind::NotPresent);
        assert!(field.are_values_equal(0, 3));
        assert!(field.string_equals(0, ""));
        assert!(!field.string_equals(0, "x"));
        assert_eq!(field.to_float_array(&ToArrayParams::default()), vec![0.0; 4]);
    }

    #[test]
    fn test_category_rejects_row_count_mismatch() {
        let mut category = Category::new("_cell", 2);
        let err = category.add_field("length_a", text(&["1.0"])).unwrap_err();
        assert!(matches!(err, CifError::RowCountMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_category_rejects_duplicate_field() {
        let mut category = Category::new("_cell", 1);
        category.add_field("length_a", text(&["1.0"])).unwrap();
        let err = category.add_field("length_a", text(&["2.0"])).unwrap_err();
        assert!(matches!(err, CifError::DuplicateKey { .. }));
    }

    #[test]
    fn test_frame_preserves_category_order() {
        let frame = Frame::new("1ABC")
            .with_category(Category::new("_entry", 0))
            .unwrap()
            .with_category(Category::new("_cell", 0))
            .unwrap();
        let names: Vec<_> = frame.categories().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["_entry", "_cell"]);
        assert_eq!(frame.header(), "1ABC");
    }

    #[test]
    fn test_get_vector_and_matrix() {
        let category = Category::new("_atom_sites", 1)
            .with_field("fract_transf_vector[1]", text(&["0.5"]))
            .unwrap()
            .with_field("fract_transf_vector[3]", text(&["1.5"]))
            .unwrap()
            .with_field("fract_transf_matrix[1][1]", text(&["2"]))
            .unwrap()
            .with_field("fract_transf_matrix[2][2]", text(&["3"]))
            .unwrap();

        assert_eq!(
            get_vector(&category, "fract_transf_vector", 3, 0),
            vec![0.5, 0.0, 1.5]
        );
        assert_eq!(
            get_matrix(&category, "fract_transf_matrix", 2, 2, 0),
            vec![vec![2.0, 0.0], vec![0.0, 3.0]]
        );
    }

    #[test]
    fn test_value_kind_from_token() {
        assert_eq!(ValueKind::from_token("."), ValueKind::NotPresent);
        assert_eq!(ValueKind::from_token("?"), ValueKind::Unknown);
        assert_eq!(ValueKind::from_token("CA"), ValueKind::Present);
        assert_eq!(ValueKind::from_mask(2), ValueKind::Unknown);
    }
}
