//! Ordered query parameter templates
//!
//! A [`QueryParams`] value is a template: the batch loader clones it for
//! every request and overlays the identifier chunk and the page number on the
//! clone, so no request ever observes parameters left behind by another.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value of one query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Single value (`limit=250`)
    Single(String),
    /// Sequence value, sent as repeated keys (`type=movie&type=cartoon`)
    Many(Vec<String>),
}

impl ParamValue {
    /// Build a sequence value from anything string-like
    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// Convert a JSON value into a parameter value
    ///
    /// Strings, numbers and booleans become single values; arrays of those
    /// become sequences. Anything else is rejected.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::Many),
            other => scalar_to_string(other).map(ParamValue::Single),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

fn scalar_to_string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported parameter value: {other}")),
    }
}

/// Ordered mapping from parameter name to value
///
/// Insertion order is preserved on the wire. Setting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    /// Empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an existing entry in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of distinct parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay every entry of `other` on top of `self`
    pub fn merge(&mut self, other: &QueryParams) {
        for (key, value) in &other.entries {
            self.set(key.clone(), value.clone());
        }
    }

    /// Parse a JSON object into parameters, keeping the object's key order
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| format!("parameters must be a JSON object, got: {value}"))?;

        let mut params = QueryParams::new();
        for (key, raw) in object {
            let param = ParamValue::from_json(raw).map_err(|e| format!("parameter '{key}': {e}"))?;
            params.set(key.clone(), param);
        }
        Ok(params)
    }

    /// Flatten into `(key, value)` pairs, expanding sequences into repeated keys
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            match value {
                ParamValue::Single(v) => pairs.push((key.clone(), v.clone())),
                ParamValue::Many(values) => {
                    pairs.extend(values.iter().map(|v| (key.clone(), v.clone())));
                }
            }
        }
        pairs
    }
}
