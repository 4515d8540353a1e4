//! Named view of a genome, as handed to objective functions.

use super::types::{ParamKey, Value};
use crate::error::ParamLookupError;

/// An ordered parameter assignment: one `(key, value)` pair per search
/// dimension, in search-space order.
///
/// ```
/// use genetist::{Params, Value};
///
/// let params = Params::new(vec![("x".into(), Value::Int(3)), ("y".into(), Value::Float(0.5))]);
/// assert_eq!(params.int("x").unwrap(), 3);
/// assert_eq!(params.float("y").unwrap(), 0.5);
/// assert!(params.str("x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    entries: Vec<(ParamKey, Value)>,
}

impl Params {
    pub fn new(entries: Vec<(ParamKey, Value)>) -> Self {
        Self { entries }
    }

    /// Looks up a value by parameter key.
    pub fn get(&self, key: impl Into<ParamKey>) -> Option<&Value> {
        let key = key.into();
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: impl Into<ParamKey>) -> bool {
        self.get(key).is_some()
    }

    /// Integer value of `key`.
    pub fn int(&self, key: impl Into<ParamKey>) -> Result<i64, ParamLookupError> {
        let key = key.into();
        let value = self.lookup(&key)?;
        value
            .as_i64()
            .ok_or_else(|| wrong_type(&key, "int", value))
    }

    /// Numeric value of `key`; integers are widened to `f64`.
    pub fn float(&self, key: impl Into<ParamKey>) -> Result<f64, ParamLookupError> {
        let key = key.into();
        let value = self.lookup(&key)?;
        value
            .as_f64()
            .ok_or_else(|| wrong_type(&key, "float", value))
    }

    /// String value of `key`.
    pub fn str(&self, key: impl Into<ParamKey>) -> Result<&str, ParamLookupError> {
        let key = key.into();
        let value = self.lookup(&key)?;
        value
            .as_str()
            .ok_or_else(|| wrong_type(&key, "string", value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ParamKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (ParamKey, Value)> {
        self.entries.iter()
    }

    fn lookup(&self, key: &ParamKey) -> Result<&Value, ParamLookupError> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| ParamLookupError::Missing(key.to_string()))
    }
}

fn wrong_type(key: &ParamKey, expected: &'static str, found: &Value) -> ParamLookupError {
    ParamLookupError::WrongType {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a (ParamKey, Value);
    type IntoIter = std::slice::Iter<'a, (ParamKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
