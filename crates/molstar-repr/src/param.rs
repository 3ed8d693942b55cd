//! Parameter definitions and values
//!
//! A [`Params`] map declares the named, typed parameters of a
//! representation with their defaults and constraints. [`Values`] holds the
//! current value of each parameter. Both are serde-serializable so they can
//! be persisted with a session.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{ReprError, ReprResult};

/// Value of a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Boolean(bool),
    Number(f64),
    Select(String),
    Color(Color),
    Text(String),
}

impl ParamValue {
    /// Name of the value kind, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Boolean(_) => "boolean",
            ParamValue::Number(_) => "number",
            ParamValue::Select(_) => "select",
            ParamValue::Color(_) => "color",
            ParamValue::Text(_) => "text",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Selected option or text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Select(v) | ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            ParamValue::Color(v) => Some(*v),
            _ => None,
        }
    }
}

/// Declaration of a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamDefinition {
    Boolean {
        default: bool,
    },
    Numeric {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    Select {
        default: String,
        options: Vec<String>,
    },
    Color {
        default: Color,
    },
    Text {
        default: String,
    },
}

impl ParamDefinition {
    pub fn boolean(default: bool) -> Self {
        ParamDefinition::Boolean { default }
    }

    pub fn numeric(default: f64, min: f64, max: f64, step: f64) -> Self {
        ParamDefinition::Numeric {
            default,
            min,
            max,
            step,
        }
    }

    pub fn select<S: AsRef<str>>(default: impl Into<String>, options: &[S]) -> Self {
        ParamDefinition::Select {
            default: default.into(),
            options: options.iter().map(|o| o.as_ref().to_string()).collect(),
        }
    }

    pub fn color(default: Color) -> Self {
        ParamDefinition::Color { default }
    }

    pub fn text(default: impl Into<String>) -> Self {
        ParamDefinition::Text {
            default: default.into(),
        }
    }

    pub fn default_value(&self) -> ParamValue {
        match self {
            ParamDefinition::Boolean { default } => ParamValue::Boolean(*default),
            ParamDefinition::Numeric { default, .. } => ParamValue::Number(*default),
            ParamDefinition::Select { default, .. } => ParamValue::Select(default.clone()),
            ParamDefinition::Color { default } => ParamValue::Color(*default),
            ParamDefinition::Text { default } => ParamValue::Text(default.clone()),
        }
    }

    /// Check that `value` is acceptable for this definition
    pub fn check(&self, name: &str, value: &ParamValue) -> ReprResult<()> {
        let mismatch = || {
            ReprError::invalid_param(name, format!("unexpected {} value", value.kind()))
        };
        match (self, value) {
            (ParamDefinition::Boolean { .. }, ParamValue::Boolean(_))
            | (ParamDefinition::Color { .. }, ParamValue::Color(_))
            | (ParamDefinition::Text { .. }, ParamValue::Text(_)) => Ok(()),
            (ParamDefinition::Numeric { min, max, .. }, ParamValue::Number(v)) => {
                if v.is_finite() && *v >= *min && *v <= *max {
                    Ok(())
                } else {
                    Err(ReprError::invalid_param(
                        name,
                        format!("{} is outside [{}, {}]", v, min, max),
                    ))
                }
            }
            (ParamDefinition::Select { options, .. }, ParamValue::Select(v)) => {
                if options.iter().any(|o| o == v) {
                    Ok(())
                } else {
                    Err(ReprError::invalid_param(
                        name,
                        format!("'{}' is not one of {:?}", v, options),
                    ))
                }
            }
            _ => Err(mismatch()),
        }
    }
}

/// Ordered parameter declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    entries: Vec<(String, ParamDefinition)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter, builder style; a repeated name replaces the earlier definition
    pub fn with(mut self, name: impl Into<String>, definition: ParamDefinition) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = definition,
            None => self.entries.push((name, definition)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamDefinition> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values holding every default
    pub fn default_values(&self) -> Values {
        let mut values = Values::new();
        for (name, definition) in &self.entries {
            values.set(name.clone(), definition.default_value());
        }
        values
    }

    /// Check every entry of `values` against its definition
    ///
    /// Unknown names are errors; missing names are not.
    pub fn check(&self, values: &Values) -> ReprResult<()> {
        for (name, value) in values.iter() {
            match self.get(name) {
                Some(definition) => definition.check(name, value)?,
                None => return Err(ReprError::invalid_param(name, "unknown parameter")),
            }
        }
        Ok(())
    }
}

/// Parameter values by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Values {
    values: AHashMap<String, ParamValue>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder style
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// These values overridden by every entry of `partial`
    pub fn merged(&self, partial: &Values) -> Values {
        let mut merged = self.clone();
        for (name, value) in partial.iter() {
            merged.set(name, value.clone());
        }
        merged
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_number)
    }

    pub fn select(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Select(v)) => Some(v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        self.get(name).and_then(ParamValue::as_color)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ParamValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// Number value or `default` when absent or of another kind
    pub fn number_or(&self, name: &str, default: f64) -> f64 {
        self.number(name).unwrap_or(default)
    }
}

impl<S: Into<String>> FromIterator<(S, ParamValue)> for Values {
    fn from_iter<I: IntoIterator<Item = (S, ParamValue)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (name, value) in iter {
            values.set(name, value);
        }
        values
    }
}
