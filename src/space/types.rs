//! Core search-space types.
//!
//! A [`SearchSpace`] is an ordered list of `(ParamKey, ParamSpec)` pairs.
//! The order is fixed once the space is built and defines the position of
//! each parameter inside a genome.

use super::params::Params;
use crate::error::{GenetistError, Result};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of one search dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamKey {
    Name(String),
    Index(i64),
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Name(name) => f.write_str(name),
            ParamKey::Index(idx) => write!(f, "{idx}"),
        }
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Name(name)
    }
}

impl From<i64> for ParamKey {
    fn from(idx: i64) -> Self {
        ParamKey::Index(idx)
    }
}

impl From<i32> for ParamKey {
    fn from(idx: i32) -> Self {
        ParamKey::Index(idx as i64)
    }
}

/// A single gene value.
///
/// Floats compare and hash by bit pattern so that genomes can be stored in
/// a hash set during duplicate avoidance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Numeric view of the value; `None` for strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        !matches!(self, Value::Str(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Declaration style of a search space.
///
/// Every parameter of one space uses the same style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchSpaceKind {
    /// Explicit ordered value lists.
    Fixed,
    /// Typed range / choice descriptors.
    Flexible,
}

impl fmt::Display for SearchSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSpaceKind::Fixed => f.write_str("fixed search"),
            SearchSpaceKind::Flexible => f.write_str("flexible search"),
        }
    }
}

/// Specification of one search dimension.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamSpec {
    /// Fixed search: explicit ordered set of allowed values.
    Fixed(Vec<Value>),
    /// Integer range, both ends inclusive.
    Int { low: i64, high: i64 },
    /// Continuous range `[low, high]`.
    Float { low: f64, high: f64 },
    /// Unordered set of string choices.
    Categorical { choices: Vec<String> },
}

impl ParamSpec {
    /// Integer parameter drawn from `[low, high]`.
    pub fn int(low: i64, high: i64) -> Self {
        ParamSpec::Int { low, high }
    }

    /// Float parameter drawn from `[low, high]`.
    pub fn float(low: f64, high: f64) -> Self {
        ParamSpec::Float { low, high }
    }

    /// Categorical parameter over string choices.
    pub fn categorical<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamSpec::Categorical {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Fixed-search parameter over an explicit value list.
    pub fn fixed<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        ParamSpec::Fixed(values.into_iter().map(Into::into).collect())
    }

    /// Declaration style of this parameter.
    pub fn kind(&self) -> SearchSpaceKind {
        match self {
            ParamSpec::Fixed(_) => SearchSpaceKind::Fixed,
            _ => SearchSpaceKind::Flexible,
        }
    }

    /// Returns `true` if `value` is a legal gene for this parameter.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamSpec::Fixed(values), v) => values.contains(v),
            (ParamSpec::Int { low, high }, Value::Int(v)) => low <= v && v <= high,
            (ParamSpec::Float { low, high }, Value::Float(v)) => low <= v && v <= high,
            (ParamSpec::Categorical { choices }, Value::Str(s)) => choices.contains(s),
            _ => false,
        }
    }

    /// Draws a uniformly random value for this parameter.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        match self {
            ParamSpec::Fixed(values) => values[rng.random_range(0..values.len())].clone(),
            ParamSpec::Int { low, high } => Value::Int(rng.random_range(*low..=*high)),
            ParamSpec::Float { low, high } => {
                if low == high {
                    Value::Float(*low)
                } else {
                    Value::Float(rng.random_range(*low..=*high))
                }
            }
            ParamSpec::Categorical { choices } => {
                Value::Str(choices[rng.random_range(0..choices.len())].clone())
            }
        }
    }

    fn validate(&self, key: &ParamKey) -> Result<()> {
        let fail = |msg: String| -> Result<()> {
            Err(GenetistError::SearchSpace(format!("parameter `{key}`: {msg}")))
        };
        match self {
            ParamSpec::Fixed(values) => {
                if values.is_empty() {
                    return fail("value list is empty".into());
                }
                let numeric = values[0].is_numeric();
                if values.iter().any(|v| v.is_numeric() != numeric) {
                    return fail("values must be all numeric or all strings".into());
                }
                if values.iter().collect::<HashSet<_>>().len() != values.len() {
                    return fail("values must be distinct".into());
                }
            }
            ParamSpec::Int { low, high } => {
                if low > high {
                    return fail(format!("low ({low}) > high ({high})"));
                }
            }
            ParamSpec::Float { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return fail("bounds must be finite".into());
                }
                if low > high {
                    return fail(format!("low ({low}) > high ({high})"));
                }
                // Uniform sampling scales the width up slightly; keep headroom.
                if high - low > f64::MAX / 2.0 {
                    return fail(format!("range {low}..={high} is too wide to sample"));
                }
            }
            ParamSpec::Categorical { choices } => {
                if choices.is_empty() {
                    return fail("categorical needs at least one choice".into());
                }
                if choices.iter().collect::<HashSet<_>>().len() != choices.len() {
                    return fail("choices must be distinct".into());
                }
            }
        }
        Ok(())
    }
}

/// Validated, ordered search space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchSpace {
    kind: SearchSpaceKind,
    params: Vec<(ParamKey, ParamSpec)>,
}

impl SearchSpace {
    /// Builds a search space from ordered parameter declarations.
    ///
    /// Fails with [`GenetistError::SearchSpace`] when the list is empty,
    /// keys repeat, declaration styles are mixed, or any spec is invalid.
    pub fn new(params: Vec<(ParamKey, ParamSpec)>) -> Result<Self> {
        let Some((first_key, first_spec)) = params.first() else {
            return Err(GenetistError::SearchSpace("search space is empty".into()));
        };
        let kind = first_spec.kind();

        let mut seen = HashSet::with_capacity(params.len());
        for (key, spec) in &params {
            if !seen.insert(key) {
                return Err(GenetistError::SearchSpace(format!(
                    "duplicate parameter `{key}`"
                )));
            }
            if spec.kind() != kind {
                return Err(GenetistError::SearchSpace(format!(
                    "parameter `{key}` uses {} but `{first_key}` uses {kind}",
                    spec.kind()
                )));
            }
            spec.validate(key)?;
        }

        Ok(Self { kind, params })
    }

    /// Starts a typed builder.
    pub fn builder() -> SearchSpaceBuilder {
        SearchSpaceBuilder::default()
    }

    pub fn kind(&self) -> SearchSpaceKind {
        self.kind
    }

    /// Number of parameters (genome length).
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter declarations in genome order.
    pub fn params(&self) -> &[(ParamKey, ParamSpec)] {
        &self.params
    }

    pub fn keys(&self) -> impl Iterator<Item = &ParamKey> {
        self.params.iter().map(|(key, _)| key)
    }

    /// Draws a random genome aligned with the parameter order.
    pub fn random_genome<R: Rng>(&self, rng: &mut R) -> Vec<Value> {
        self.params.iter().map(|(_, spec)| spec.sample(rng)).collect()
    }

    /// Returns `true` if `genome` is aligned with this space and every gene
    /// is legal for its parameter.
    pub fn accepts(&self, genome: &[Value]) -> bool {
        genome.len() == self.params.len()
            && self
                .params
                .iter()
                .zip(genome)
                .all(|((_, spec), value)| spec.accepts(value))
    }

    /// Pairs each gene with its parameter name.
    pub fn name_genes(&self, genome: &[Value]) -> Params {
        Params::new(
            self.params
                .iter()
                .zip(genome)
                .map(|((key, _), value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

/// Typed builder for [`SearchSpace`].
///
/// ```
/// use genetist::SearchSpace;
///
/// let space = SearchSpace::builder()
///     .int("max_depth", 2, 12)
///     .float("learning_rate", 0.01, 0.3)
///     .categorical("booster", ["gbtree", "dart"])
///     .build()
///     .unwrap();
/// assert_eq!(space.len(), 3);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SearchSpaceBuilder {
    params: Vec<(ParamKey, ParamSpec)>,
}

impl SearchSpaceBuilder {
    /// Appends a parameter.
    pub fn param(mut self, key: impl Into<ParamKey>, spec: ParamSpec) -> Self {
        self.params.push((key.into(), spec));
        self
    }

    pub fn int(self, key: impl Into<ParamKey>, low: i64, high: i64) -> Self {
        self.param(key, ParamSpec::int(low, high))
    }

    pub fn float(self, key: impl Into<ParamKey>, low: f64, high: f64) -> Self {
        self.param(key, ParamSpec::float(low, high))
    }

    pub fn categorical<I, S>(self, key: impl Into<ParamKey>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param(key, ParamSpec::categorical(choices))
    }

    pub fn fixed<I, V>(self, key: impl Into<ParamKey>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.param(key, ParamSpec::fixed(values))
    }

    /// Validates and builds the space.
    pub fn build(self) -> Result<SearchSpace> {
        SearchSpace::new(self.params)
    }
}
