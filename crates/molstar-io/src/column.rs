//! Typed column views over raw fields
//!
//! A column is the materialized, strongly typed face of a raw [`Field`]:
//! point access by row, presence queries, equality predicates and bulk
//! extraction. Scalar columns forward to the field accessor of their kind;
//! vector and matrix columns assemble values from numbered component fields.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cif::data_model::{ComponentFields, Field, ValueKind};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Str,
    Int,
    Float,
    Vector,
    Matrix,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Str => write!(f, "str"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Vector => write!(f, "vector"),
            ColumnType::Matrix => write!(f, "matrix"),
        }
    }
}

/// Row range for bulk extraction
///
/// `end` is exclusive and defaults to the row count; both ends are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToArrayParams {
    pub start: usize,
    pub end: Option<usize>,
}

impl ToArrayParams {
    /// Rows `start..end`
    pub fn range(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Clamp the range to `row_count` rows
    pub fn bounds(&self, row_count: usize) -> (usize, usize) {
        let end = self.end.unwrap_or(row_count).min(row_count);
        (self.start.min(end), end)
    }
}

/// Create an array by calling `value` for every row in the requested range
pub fn create_and_fill_array<T>(
    row_count: usize,
    value: impl Fn(usize) -> T,
    params: &ToArrayParams,
) -> Vec<T> {
    let (start, end) = params.bounds(row_count);
    (start..end).map(value).collect()
}

/// Capability set shared by every column kind
pub trait Column: Send + Sync {
    /// Value returned by point access, possibly borrowing from the column
    type Value<'a>
    where
        Self: 'a;

    /// Owned element produced by bulk extraction
    type Element;

    fn column_type(&self) -> ColumnType;

    /// Whether the backing field exists in the source data
    fn is_defined(&self) -> bool;

    fn row_count(&self) -> usize;

    fn value(&self, row: usize) -> Self::Value<'_>;

    fn value_kind(&self, row: usize) -> ValueKind;

    /// Whether `row` holds a present value
    fn is_present(&self, row: usize) -> bool {
        self.value_kind(row) == ValueKind::Present
    }

    fn string_equals(&self, row: usize, value: &str) -> bool;

    fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool;

    fn to_array(&self, params: &ToArrayParams) -> Vec<Self::Element>;
}

/// Implements the field-delegating part of [`Column`]
macro_rules! delegate_to_field {
    ($ty:expr) => {
        fn column_type(&self) -> ColumnType {
            $ty
        }

        fn is_defined(&self) -> bool {
            self.field.is_defined()
        }

        fn row_count(&self) -> usize {
            self.field.row_count()
        }

        fn value_kind(&self, row: usize) -> ValueKind {
            self.field.value_kind(row)
        }

        fn string_equals(&self, row: usize, value: &str) -> bool {
            self.field.string_equals(row, value)
        }

        fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool {
            self.field.are_values_equal(row_a, row_b)
        }
    };
}

/// String column
#[derive(Debug, Clone)]
pub struct StrColumn {
    field: Arc<dyn Field>,
}

impl StrColumn {
    pub fn new(field: Arc<dyn Field>) -> Self {
        Self { field }
    }
}

impl Column for StrColumn {
    type Value<'a> = Cow<'a, str>;
    type Element = String;

    delegate_to_field!(ColumnType::Str);

    fn value(&self, row: usize) -> Cow<'_, str> {
        self.field.str(row)
    }

    fn to_array(&self, params: &ToArrayParams) -> Vec<String> {
        self.field.to_string_array(params)
    }
}

/// Integer column
#[derive(Debug, Clone)]
pub struct IntColumn {
    field: Arc<dyn Field>,
}

impl IntColumn {
    pub fn new(field: Arc<dyn Field>) -> Self {
        Self { field }
    }
}

impl Column for IntColumn {
    type Value<'a> = i32;
    type Element = i32;

    delegate_to_field!(ColumnType::Int);

    fn value(&self, row: usize) -> i32 {
        self.field.int(row)
    }

    fn to_array(&self, params: &ToArrayParams) -> Vec<i32> {
        self.field.to_int_array(params)
    }
}

/// Float column
#[derive(Debug, Clone)]
pub struct FloatColumn {
    field: Arc<dyn Field>,
}

impl FloatColumn {
    pub fn new(field: Arc<dyn Field>) -> Self {
        Self { field }
    }
}

impl Column for FloatColumn {
    type Value<'a> = f64;
    type Element = f64;

    delegate_to_field!(ColumnType::Float);

    fn value(&self, row: usize) -> f64 {
        self.field.float(row)
    }

    fn to_array(&self, params: &ToArrayParams) -> Vec<f64> {
        self.field.to_float_array(params)
    }
}

/// Fixed-length vector column read from sub-fields `key[1]..key[n]`
#[derive(Debug, Clone)]
pub struct VectorColumn {
    field: Arc<dyn Field>,
    size: usize,
    components: ComponentFields,
}

impl VectorColumn {
    /// `field` carries presence and row count, `components` the values
    pub fn new(field: Arc<dyn Field>, size: usize, components: ComponentFields) -> Self {
        Self {
            field,
            size,
            components,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Column for VectorColumn {
    type Value<'a> = Vec<f64>;
    type Element = Vec<f64>;

    delegate_to_field!(ColumnType::Vector);

    fn value(&self, row: usize) -> Vec<f64> {
        self.components.vector_at(row)
    }

    fn to_array(&self, params: &ToArrayParams) -> Vec<Vec<f64>> {
        create_and_fill_array(self.row_count(), |row| self.value(row), params)
    }
}

/// Fixed-shape matrix column read from sub-fields `key[i][j]`
#[derive(Debug, Clone)]
pub struct MatrixColumn {
    field: Arc<dyn Field>,
    rows: usize,
    cols: usize,
    components: ComponentFields,
}

impl MatrixColumn {
    pub fn new(field: Arc<dyn Field>, rows: usize, cols: usize, components: ComponentFields) -> Self {
        Self {
            field,
            rows,
            cols,
            components,
        }
    }

    /// Matrix shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl Column for MatrixColumn {
    type Value<'a> = Vec<Vec<f64>>;
    type Element = Vec<Vec<f64>>;

    delegate_to_field!(ColumnType::Matrix);

    fn value(&self, row: usize) -> Vec<Vec<f64>> {
        self.components.matrix_at(row)
    }

    fn to_array(&self, params: &ToArrayParams) -> Vec<Vec<Vec<f64>>> {
        create_and_fill_array(self.row_count(), |row| self.value(row), params)
    }
}

/// A column of any kind, as stored by a typed category
#[derive(Debug, Clone)]
pub enum AnyColumn {
    Str(StrColumn),
    Int(IntColumn),
    Float(FloatColumn),
    Vector(VectorColumn),
    Matrix(MatrixColumn),
}

macro_rules! dispatch {
    ($self:expr, $col:ident => $body:expr) => {
        match $self {
            AnyColumn::Str($col) => $body,
            AnyColumn::Int($col) => $body,
            AnyColumn::Float($col) => $body,
            AnyColumn::Vector($col) => $body,
            AnyColumn::Matrix($col) => $body,
        }
    };
}

impl AnyColumn {
    pub fn column_type(&self) -> ColumnType {
        dispatch!(self, c => c.column_type())
    }

    pub fn is_defined(&self) -> bool {
        dispatch!(self, c => c.is_defined())
    }

    pub fn row_count(&self) -> usize {
        dispatch!(self, c => c.row_count())
    }

    pub fn value_kind(&self, row: usize) -> ValueKind {
        dispatch!(self, c => c.value_kind(row))
    }

    pub fn is_present(&self, row: usize) -> bool {
        dispatch!(self, c => c.is_present(row))
    }

    pub fn string_equals(&self, row: usize, value: &str) -> bool {
        dispatch!(self, c => c.string_equals(row, value))
    }

    pub fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool {
        dispatch!(self, c => c.are_values_equal(row_a, row_b))
    }

    pub fn as_str(&self) -> Option<&StrColumn> {
        match self {
            AnyColumn::Str(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&IntColumn> {
        match self {
            AnyColumn::Int(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&FloatColumn> {
        match self {
            AnyColumn::Float(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorColumn> {
        match self {
            AnyColumn::Vector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&MatrixColumn> {
        match self {
            AnyColumn::Matrix(c) => Some(c),
            _ => None,
        }
    }
}
