//! Request/result documents.
//!
//! A document is an ordered JSON object. The scheduler only understands
//! `rattrs` and `aattrs` (read through [`crate::AttributeModel`]) and only
//! writes `num_ops` and `total_distance`; every other field is opaque and
//! travels through verbatim and keeps its position. Numbers keep their
//! source text, so `1e2` or an integer wider than 64 bits comes back as
//! written.

use serde_json::{Map, Number, Value};

use crate::error::{Field, ReuseError};

/// An ordered JSON object exchanged with the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Parse a document from JSON text.
    ///
    /// The top-level value must be an object.
    pub fn from_json(text: &str) -> Result<Self, ReuseError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ReuseError> {
        match value {
            Value::Object(fields) => Ok(Document { fields }),
            other => Err(ReuseError::malformed(
                Field::Root,
                None,
                format!("expected a JSON object, found {}", value_kind(&other)),
            )),
        }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field names in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set a field. An existing key keeps its position; a new key is
    /// appended.
    pub(crate) fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_owned(), value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Serialize as compact JSON.
    pub fn to_json(&self) -> Result<String, ReuseError> {
        serde_json::to_string(&self.fields).map_err(ReuseError::Serialize)
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ReuseError> {
        serde_json::to_string_pretty(&self.fields).map_err(ReuseError::Serialize)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Document { fields }
    }
}

/// Whether `n` was written as an integer, whatever its width.
pub(crate) fn is_integer_literal(n: &Number) -> bool {
    let text = n.to_string();
    let digits = text.strip_prefix('-').unwrap_or(&text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if is_integer_literal(n) => "an integer",
        Value::Number(_) => "a non-integer number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
