//! Typed-array field with an optional presence mask
//!
//! This is the in-memory shape of a decoded BinaryCIF column: one typed
//! buffer plus a mask byte per row (0 = present, 1 = `.`, 2 = `?`).

use std::borrow::Cow;

use crate::column::{create_and_fill_array, ToArrayParams};

use super::data_model::{Field, ValueKind};

/// Decoded values of a binary field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    /// Integer values
    Int(Vec<i32>),
    /// Float values
    Float(Vec<f64>),
    /// String values
    Str(Vec<String>),
}

impl FieldData {
    fn len(&self) -> usize {
        match self {
            FieldData::Int(v) => v.len(),
            FieldData::Float(v) => v.len(),
            FieldData::Str(v) => v.len(),
        }
    }
}

/// Field over a decoded typed array
#[derive(Debug, Clone)]
pub struct BinaryField {
    data: FieldData,
    mask: Option<Vec<u8>>,
}

impl BinaryField {
    pub fn new(data: FieldData) -> Self {
        Self { data, mask: None }
    }

    /// Attach a presence mask; rows past the end of the mask are present
    pub fn with_mask(mut self, mask: Vec<u8>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn ints(values: Vec<i32>) -> Self {
        Self::new(FieldData::Int(values))
    }

    pub fn floats(values: Vec<f64>) -> Self {
        Self::new(FieldData::Float(values))
    }

    pub fn strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(FieldData::Str(values.into_iter().map(Into::into).collect()))
    }

    pub fn data(&self) -> &FieldData {
        &self.data
    }

    fn is_present(&self, row: usize) -> bool {
        self.value_kind(row) == ValueKind::Present
    }
}

impl Field for BinaryField {
    fn is_defined(&self) -> bool {
        true
    }

    fn row_count(&self) -> usize {
        self.data.len()
    }

    fn str(&self, row: usize) -> Cow<'_, str> {
        if !self.is_present(row) {
            return Cow::Borrowed("");
        }
        match &self.data {
            FieldData::Str(v) => v.get(row).map_or(Cow::Borrowed(""), |s| Cow::Borrowed(s.as_str())),
            FieldData::Int(v) => v.get(row).map_or(Cow::Borrowed(""), |x| Cow::Owned(x.to_string())),
            FieldData::Float(v) => v.get(row).map_or(Cow::Borrowed(""), |x| Cow::Owned(x.to_string())),
        }
    }

    fn int(&self, row: usize) -> i32 {
        if !self.is_present(row) {
            return 0;
        }
        match &self.data {
            FieldData::Int(v) => v.get(row).copied().unwrap_or(0),
            FieldData::Float(v) => v.get(row).map_or(0, |&x| x as i32),
            FieldData::Str(v) => v.get(row).and_then(|s| s.parse().ok()).unwrap_or(0),
        }
    }

    fn float(&self, row: usize) -> f64 {
        if !self.is_present(row) {
            return 0.0;
        }
        match &self.data {
            FieldData::Int(v) => v.get(row).map_or(0.0, |&x| x as f64),
            FieldData::Float(v) => v.get(row).copied().unwrap_or(0.0),
            FieldData::Str(v) => v.get(row).and_then(|s| s.parse().ok()).unwrap_or(0.0),
        }
    }

    fn value_kind(&self, row: usize) -> ValueKind {
        match &self.mask {
            Some(mask) => ValueKind::from_mask(mask.get(row).copied().unwrap_or(0)),
            None => ValueKind::Present,
        }
    }

    fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool {
        if self.value_kind(row_a) != self.value_kind(row_b) {
            return false;
        }
        match &self.data {
            FieldData::Int(v) => v.get(row_a) == v.get(row_b),
            FieldData::Float(v) => v.get(row_a) == v.get(row_b),
            FieldData::Str(v) => v.get(row_a) == v.get(row_b),
        }
    }

    fn string_equals(&self, row: usize, value: &str) -> bool {
        self.str(row) == value
    }

    fn to_int_array(&self, params: &ToArrayParams) -> Vec<i32> {
        match (&self.data, &self.mask) {
            (FieldData::Int(v), None) => {
                let (start, end) = params.bounds(v.len());
                v[start..end].to_vec()
            }
            _ => create_and_fill_array(self.row_count(), |row| self.int(row), params),
        }
    }

    fn to_float_array(&self, params: &ToArrayParams) -> Vec<f64> {
        match (&self.data, &self.mask) {
            (FieldData::Float(v), None) => {
                let (start, end) = params.bounds(v.len());
                v[start..end].to_vec()
            }
            _ => create_and_fill_array(self.row_count(), |row| self.float(row), params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_values() {
        let field = BinaryField::ints(vec![10, 20, 30]).with_mask(vec![0, 1, 2]);
        assert_eq!(field.int(0), 10);
        assert_eq!(field.int(1), 0);
        assert_eq!(field.value_kind(1), ValueKind::NotPresent);
        assert_eq!(field.value_kind(2), ValueKind::Unknown);
        assert_eq!(field.str(0), "10");
        assert_eq!(field.str(2), "");
        assert_eq!(
            field.to_int_array(&ToArrayParams::default()),
            vec![10, 0, 0]
        );
    }

    #[test]
    fn test_conversions_between_kinds() {
        let floats = BinaryField::floats(vec![1.5, -2.25]);
        assert_eq!(floats.int(0), 1);
        assert_eq!(floats.str(1), "-2.25");

        let strings = BinaryField::strings(["7", "x"]);
        assert_eq!(strings.int(0), 7);
        assert_eq!(strings.float(1), 0.0);
        assert!(strings.string_equals(1, "x"));
    }

    #[test]
    fn test_bulk_fast_path_respects_range() {
        let field = BinaryField::floats(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            field.to_float_array(&ToArrayParams::range(1, 3)),
            vec![2.0, 3.0]
        );
    }

    #[test]
    fn test_values_equal_considers_mask() {
        let field = BinaryField::ints(vec![0, 0, 5]).with_mask(vec![0, 1, 0]);
        assert!(!field.are_values_equal(0, 1));
        assert!(!field.are_values_equal(0, 2));
        assert!(field.are_values_equal(0, 0));
    }
}
