//! Search-space inference from raw JSON declarations.
//!
//! Raw parameter maps look like the ones users write by hand:
//!
//! ```json
//! { "x": [1, 2, 3], "kind": ["a", "b"] }                   // fixed search
//! { "x": {"low": 1, "high": 10}, "k": {"choices": ["a"]} } // flexible search
//! ```
//!
//! The first entry decides the declaration style; every other entry must
//! have the same shape.

use super::types::{ParamKey, ParamSpec, SearchSpace, SearchSpaceKind, Value};
use crate::error::{GenetistError, Result};
use serde_json::{Map, Value as Json};

/// Classifies raw parameter entries as fixed or flexible search.
///
/// Object-shaped values mean flexible search, array-shaped values mean fixed
/// search. Fails if any key is neither a string nor an integer, if the
/// first value has any other shape, or if a later entry has a different
/// shape than the first.
pub fn infer_search_space_kind(entries: &[(Json, Json)]) -> Result<SearchSpaceKind> {
    let Some((_, first)) = entries.first() else {
        return Err(GenetistError::SearchSpace("search space is empty".into()));
    };
    let kind = shape_of(first).ok_or_else(|| {
        GenetistError::SearchSpace(
            "unable to infer search space type: values must be lists or objects".into(),
        )
    })?;

    for (key, value) in entries {
        let key = parse_key(key)?;
        if shape_of(value) != Some(kind) {
            return Err(GenetistError::SearchSpace(format!(
                "parameter `{key}` does not match the {kind} declaration of the first parameter"
            )));
        }
    }

    Ok(kind)
}

fn shape_of(value: &Json) -> Option<SearchSpaceKind> {
    match value {
        Json::Object(_) => Some(SearchSpaceKind::Flexible),
        Json::Array(_) => Some(SearchSpaceKind::Fixed),
        _ => None,
    }
}

fn parse_key(key: &Json) -> Result<ParamKey> {
    match key {
        Json::String(name) => Ok(ParamKey::Name(name.clone())),
        Json::Number(n) => n.as_i64().map(ParamKey::Index).ok_or_else(|| {
            GenetistError::SearchSpace(format!("parameter key {n} is not an integer"))
        }),
        other => Err(GenetistError::SearchSpace(format!(
            "parameter key {other} must be a string or an integer"
        ))),
    }
}

impl SearchSpace {
    /// Builds a search space from a JSON object, keeping key order.
    ///
    /// ```
    /// use genetist::{SearchSpace, SearchSpaceKind};
    ///
    /// let raw = serde_json::json!({
    ///     "x": {"type": "float", "low": -100, "high": 100},
    ///     "n": {"low": 1, "high": 10},
    ///     "booster": {"choices": ["gbtree", "dart"]}
    /// });
    /// let space = SearchSpace::from_json(&raw).unwrap();
    /// assert_eq!(space.kind(), SearchSpaceKind::Flexible);
    /// assert_eq!(space.len(), 3);
    /// ```
    pub fn from_json(raw: &Json) -> Result<Self> {
        let Json::Object(map) = raw else {
            return Err(GenetistError::SearchSpace(
                "search space must be a JSON object".into(),
            ));
        };
        let entries: Vec<(Json, Json)> = map
            .iter()
            .map(|(k, v)| (Json::String(k.clone()), v.clone()))
            .collect();
        Self::from_entries(&entries)
    }

    /// Builds a search space from raw `(key, declaration)` pairs.
    ///
    /// Keys may be JSON strings or integers.
    pub fn from_entries(entries: &[(Json, Json)]) -> Result<Self> {
        let kind = infer_search_space_kind(entries)?;

        let params = entries
            .iter()
            .map(|(key, value)| {
                let key = parse_key(key)?;
                let spec = match (kind, value) {
                    (SearchSpaceKind::Fixed, Json::Array(items)) => parse_fixed(&key, items)?,
                    (SearchSpaceKind::Flexible, Json::Object(desc)) => parse_flexible(&key, desc)?,
                    (kind, _) => {
                        return Err(GenetistError::SearchSpace(format!(
                            "parameter `{key}` does not match {kind}"
                        )))
                    }
                };
                Ok((key, spec))
            })
            .collect::<Result<Vec<_>>>()?;

        SearchSpace::new(params)
    }
}

fn parse_fixed(key: &ParamKey, items: &[Json]) -> Result<ParamSpec> {
    let values = items
        .iter()
        .map(|item| match item {
            Json::String(s) => Ok(Value::Str(s.clone())),
            Json::Number(n) => Ok(match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            other => Err(GenetistError::SearchSpace(format!(
                "parameter `{key}`: unsupported value {other}"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ParamSpec::Fixed(values))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlexibleType {
    Int,
    Float,
    Categorical,
}

fn parse_flexible(key: &ParamKey, desc: &Map<String, Json>) -> Result<ParamSpec> {
    let fail = |msg: &str| GenetistError::SearchSpace(format!("parameter `{key}`: {msg}"));

    let has_range = desc.contains_key("low") || desc.contains_key("high");
    let has_choices = desc.contains_key("choices");
    if has_range && has_choices {
        return Err(fail("ambiguous declaration: both a range and choices"));
    }

    let ty = match desc.get("type") {
        Some(Json::String(tag)) => match tag.as_str() {
            "int" => FlexibleType::Int,
            "float" => FlexibleType::Float,
            "categorical" => FlexibleType::Categorical,
            _ => return Err(fail(&format!("unsupported type tag `{tag}`"))),
        },
        Some(_) => return Err(fail("type tag must be a string")),
        None if has_range => {
            let (low, high) = range_bounds(desc).ok_or_else(|| fail("low and high must be numbers"))?;
            match (low.is_i64(), high.is_i64()) {
                (true, true) => FlexibleType::Int,
                (false, false) => FlexibleType::Float,
                _ => return Err(fail("cannot infer type: low and high differ in kind")),
            }
        }
        None if has_choices => FlexibleType::Categorical,
        None => return Err(fail("missing type information")),
    };

    match ty {
        FlexibleType::Int => {
            if has_choices {
                return Err(fail("int parameter cannot declare choices"));
            }
            let (low, high) = range_bounds(desc).ok_or_else(|| fail("int needs low and high"))?;
            match (low.as_i64(), high.as_i64()) {
                (Some(low), Some(high)) => Ok(ParamSpec::Int { low, high }),
                _ => Err(fail("int bounds must be integers")),
            }
        }
        FlexibleType::Float => {
            if has_choices {
                return Err(fail("float parameter cannot declare choices"));
            }
            let (low, high) = range_bounds(desc).ok_or_else(|| fail("float needs low and high"))?;
            match (low.as_f64(), high.as_f64()) {
                (Some(low), Some(high)) => Ok(ParamSpec::Float { low, high }),
                _ => Err(fail("float bounds must be numbers")),
            }
        }
        FlexibleType::Categorical => {
            if has_range {
                return Err(fail("categorical parameter cannot declare a range"));
            }
            let Some(Json::Array(items)) = desc.get("choices") else {
                return Err(fail("categorical needs a list of choices"));
            };
            let choices = items
                .iter()
                .map(|c| c.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| fail("choices must be strings"))?;
            Ok(ParamSpec::Categorical { choices })
        }
    }
}

fn range_bounds(desc: &Map<String, Json>) -> Option<(&serde_json::Number, &serde_json::Number)> {
    match (desc.get("low"), desc.get("high")) {
        (Some(Json::Number(low)), Some(Json::Number(high))) => Some((low, high)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(raw: Json) -> Vec<(Json, Json)> {
        raw.as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (Json::String(k.clone()), v.clone()))
            .collect()
    }

    #[test]
    fn test_infer_flexible() {
        let raw = json!({
            "x": {"type": "int", "low": 1, "high": 10},
            "y": {"type": "categorical", "choices": ["max_depth", "n_estimators"]},
            "z": {"type": "float", "low": 1, "high": 10}
        });
        assert_eq!(
            infer_search_space_kind(&entries(raw.clone())).unwrap(),
            SearchSpaceKind::Flexible
        );
        let space = SearchSpace::from_json(&raw).unwrap();
        assert_eq!(space.params()[0].1, ParamSpec::int(1, 10));
        assert_eq!(space.params()[2].1, ParamSpec::float(1.0, 10.0));
    }

    #[test]
    fn test_infer_fixed() {
        let raw = json!({
            "x": [1, 2, 3, 4],
            "y": ["max_depth", "n_estimators"],
            "z": [1.0, 1.5, 2, 4.5, 7.2]
        });
        assert_eq!(
            infer_search_space_kind(&entries(raw.clone())).unwrap(),
            SearchSpaceKind::Fixed
        );
        let space = SearchSpace::from_json(&raw).unwrap();
        assert_eq!(space.kind(), SearchSpaceKind::Fixed);
        assert_eq!(space.len(), 3);
    }

    #[test]
    fn test_mixed_structure_fails() {
        let raw = json!({
            "x": [1, 2, 3, 4],
            "y": {"type": "categorical", "choices": ["max_depth", "n_estimators"]},
            "z": [1.0, 1.5, 2, 4.5, 7.2]
        });
        assert!(matches!(
            infer_search_space_kind(&entries(raw)),
            Err(GenetistError::SearchSpace(_))
        ));
    }

    #[test]
    fn test_scalar_value_fails() {
        assert!(SearchSpace::from_json(&json!({"x": 3})).is_err());
        assert!(SearchSpace::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_inferred_types() {
        let raw = json!({
            "i": {"low": 0, "high": 1},
            "f": {"low": 0.5, "high": 2.5},
            "c": {"choices": ["a", "b", "c"]}
        });
        let space = SearchSpace::from_json(&raw).unwrap();
        let specs: Vec<&ParamSpec> = space.params().iter().map(|(_, s)| s).collect();
        assert_eq!(specs[0], &ParamSpec::int(0, 1));
        assert_eq!(specs[1], &ParamSpec::float(0.5, 2.5));
        assert_eq!(specs[2], &ParamSpec::categorical(["a", "b", "c"]));
    }

    #[test]
    fn test_ambiguous_declarations_fail() {
        for raw in [
            json!({"x": {"low": 0, "high": 1.5}}),
            json!({"x": {"low": 0, "high": 1, "choices": ["a"]}}),
            json!({"x": {}}),
            json!({"x": {"choices": [1, 2]}}),
            json!({"x": {"type": "bool"}}),
            json!({"x": {"type": "int", "low": 0.5, "high": 2}}),
        ] {
            assert!(SearchSpace::from_json(&raw).is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn test_integer_and_invalid_keys() {
        let ok = vec![(json!(0), json!(["a", "b"])), (json!(1), json!(["c"]))];
        let space = SearchSpace::from_entries(&ok).unwrap();
        assert_eq!(space.params()[1].0, ParamKey::Index(1));

        let bad = vec![(json!(0), json!(["a"])), (json!(true), json!(["c"]))];
        assert!(SearchSpace::from_entries(&bad).is_err());
    }

    #[test]
    fn test_preserves_declaration_order() {
        let raw = json!({"z": [1], "a": [2], "m": [3]});
        let space = SearchSpace::from_json(&raw).unwrap();
        let keys: Vec<String> = space.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
