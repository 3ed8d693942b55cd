//! Token-backed text field
//!
//! Values are `(start, end)` byte ranges into one shared string, so a
//! field borrows from the parsed source instead of copying every value.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::{CifError, CifResult};

use super::data_model::{Field, ValueKind};

/// Field whose values are slices of a shared text buffer
///
/// `.` and `?` tokens are reported as not present / unknown and read as
/// empty strings or zero.
#[derive(Debug, Clone)]
pub struct TextField {
    data: Arc<str>,
    tokens: Vec<(usize, usize)>,
}

impl TextField {
    /// Create a field over `data` with one token per row
    pub fn new(data: Arc<str>, tokens: Vec<(usize, usize)>) -> CifResult<Self> {
        for (index, &(start, end)) in tokens.iter().enumerate() {
            if start > end || data.get(start..end).is_none() {
                return Err(CifError::InvalidToken { index, start, end });
            }
        }
        Ok(Self { data, tokens })
    }

    /// Build a field from owned values, packing them into one buffer
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let mut data = String::with_capacity(values.iter().map(|v| v.as_ref().len() + 1).sum());
        let mut tokens = Vec::with_capacity(values.len());
        for value in values {
            let start = data.len();
            data.push_str(value.as_ref());
            tokens.push((start, data.len()));
            data.push(' ');
        }
        Self {
            data: Arc::from(data),
            tokens,
        }
    }

    /// Raw token at `row`, including `.` and `?`
    pub fn token(&self, row: usize) -> &str {
        self.tokens
            .get(row)
            .and_then(|&(start, end)| self.data.get(start..end))
            .unwrap_or("")
    }

    fn present_token(&self, row: usize) -> Option<&str> {
        let token = self.token(row);
        match ValueKind::from_token(token) {
            ValueKind::Present => Some(token),
            _ => None,
        }
    }
}

/// Parse an integer token; decimal tokens are truncated
fn parse_int(token: &str) -> i32 {
    token
        .parse::<i32>()
        .ok()
        .or_else(|| token.parse::<f64>().ok().map(|v| v as i32))
        .unwrap_or(0)
}

/// Parse a float token, ignoring a trailing standard uncertainty such as `1.234(5)`
fn parse_float(token: &str) -> f64 {
    let number = token.split_once('(').map_or(token, |(number, _)| number);
    number.parse::<f64>().unwrap_or(0.0)
}

impl Field for TextField {
    fn is_defined(&self) -> bool {
        true
    }

    fn row_count(&self) -> usize {
        self.tokens.len()
    }

    fn str(&self, row: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.present_token(row).unwrap_or(""))
    }

    fn int(&self, row: usize) -> i32 {
        self.present_token(row).map_or(0, parse_int)
    }

    fn float(&self, row: usize) -> f64 {
        self.present_token(row).map_or(0.0, parse_float)
    }

    fn value_kind(&self, row: usize) -> ValueKind {
        ValueKind::from_token(self.token(row))
    }

    fn are_values_equal(&self, row_a: usize, row_b: usize) -> bool {
        self.token(row_a) == self.token(row_b)
    }

    fn string_equals(&self, row: usize, value: &str) -> bool {
        self.present_token(row).unwrap_or("") == value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ToArrayParams;

    #[test]
    fn test_from_values() {
        let field = TextField::from_values(&["CA", ".", "?", "N"]);
        assert_eq!(field.row_count(), 4);
        assert_eq!(field.str(0), "CA");
        assert_eq!(field.str(1), "");
        assert_eq!(field.token(1), ".");
        assert_eq!(field.value_kind(1), ValueKind::NotPresent);
        assert_eq!(field.value_kind(2), ValueKind::Unknown);
        assert_eq!(field.value_kind(3), ValueKind::Present);
        assert!(field.string_equals(3, "N"));
        assert!(field.string_equals(1, ""));
    }

    #[test]
    fn test_numeric_parsing() {
        let field = TextField::from_values(&["12", "-3.75", "1.5e2", "0.123(4)", "abc", "."]);
        assert_eq!(field.int(0), 12);
        assert_eq!(field.int(1), -3);
        assert_eq!(field.float(1), -3.75);
        assert_eq!(field.float(2), 150.0);
        assert!((field.float(3) - 0.123).abs() < 1e-12);
        assert_eq!(field.float(4), 0.0);
        assert_eq!(field.int(5), 0);
    }

    #[test]
    fn test_shared_buffer_tokens() {
        let data: Arc<str> = Arc::from("ALA GLY ALA");
        let field = TextField::new(data, vec![(0, 3), (4, 7), (8, 11)]).unwrap();
        assert!(field.are_values_equal(0, 2));
        assert!(!field.are_values_equal(0, 1));
        assert_eq!(
            field.to_string_array(&ToArrayParams::range(1, 3)),
            vec!["GLY".to_string(), "ALA".to_string()]
        );
    }

    #[test]
    fn test_rejects_out_of_bounds_token() {
        let data: Arc<str> = Arc::from("ALA");
        let err = TextField::new(data, vec![(0, 3), (2, 9)]).unwrap_err();
        assert_eq!(err, CifError::InvalidToken { index: 1, start: 2, end: 9 });
    }

    #[test]
    fn test_out_of_range_row_reads_default() {
        let field = TextField::from_values(&["1"]);
        assert_eq!(field.str(5), "");
        assert_eq!(field.int(5), 0);
    }
}
