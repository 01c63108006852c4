//! Structured output values.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Tagged structured value: JSON responses, schema graphs, option arrays.
///
/// Only `Text` leaves are ever transliterated. Map keys are left alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Seq(Vec<Fragment>),
    /// Ordered key/value pairs.
    Map(Vec<(String, Fragment)>),
    /// Numbers, booleans and null.
    Other(Value),
}

impl Fragment {
    /// Apply `f` to every text leaf.
    pub fn map_text(self, f: &dyn Fn(&str) -> Cow<'_, str>) -> Self {
        match self {
            Self::Text(text) => {
                let converted = match f(&text) {
                    Cow::Borrowed(_) => None,
                    Cow::Owned(converted) => Some(converted),
                };
                Self::Text(converted.unwrap_or(text))
            }
            Self::Seq(items) => Self::Seq(items.into_iter().map(|item| item.map_text(f)).collect()),
            Self::Map(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.map_text(f)))
                    .collect(),
            ),
            other @ Self::Other(_) => other,
        }
    }

    /// Object or array.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Seq(_) | Self::Map(_))
    }
}

impl From<Value> for Fragment {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Seq(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
            other => Self::Other(other),
        }
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        match fragment {
            Fragment::Text(text) => Value::String(text),
            Fragment::Seq(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Fragment::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
            Fragment::Other(value) => value,
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_text_reaches_nested_leaves() {
        let fragment = Fragment::from(json!({
            "наслов": "мир",
            "items": ["а", 1, {"b": "б", "n": null}],
        }));
        let upper = fragment.map_text(&|s: &str| Cow::Owned(s.to_uppercase()));
        assert_eq!(
            Value::from(upper),
            json!({
                "наслов": "МИР",
                "items": ["А", 1, {"b": "Б", "n": null}],
            })
        );
    }

    #[test]
    fn test_key_order_is_preserved() {
        let fragment = Fragment::from(json!({"z": "1", "a": "2"}));
        let Fragment::Map(entries) = &fragment else {
            panic!("expected map");
        };
        assert_eq!(entries[0].0, "z");
        assert_eq!(serde_json::to_string(&Value::from(fragment)).unwrap(), r#"{"z":"1","a":"2"}"#);
    }

    #[test]
    fn test_is_container() {
        assert!(Fragment::from(json!([])).is_container());
        assert!(!Fragment::from("x").is_container());
        assert!(!Fragment::from(json!(3)).is_container());
    }
}
