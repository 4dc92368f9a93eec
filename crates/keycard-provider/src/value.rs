//! Plan-side attribute values
//!
//! Every model attribute is a [`Value`]: not yet known (no opinion in the
//! configuration, or computed later), explicitly null, or known.
//!
//! In JSON an unknown attribute is an absent key and a null attribute is
//! `null`. Model fields must carry
//! `#[serde(default, skip_serializing_if = "Value::is_unknown")]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value<T> {
    Unknown,
    Null,
    Known(T),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Unknown
    }
}

impl<T> Value<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Unknown becomes `fallback`, null and known values are kept
    pub fn or(self, fallback: Value<T>) -> Value<T> {
        match self {
            Value::Unknown => fallback,
            other => other,
        }
    }
}

impl Value<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.as_known().map(String::as_str)
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Value::Known(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Value::Known(value.to_string())
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Unknown | Value::Null => serializer.serialize_none(),
            Value::Known(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|v| match v {
            Some(v) => Value::Known(v),
            None => Value::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Model {
        #[serde(default, skip_serializing_if = "Value::is_unknown")]
        description: Value<String>,
    }

    #[test]
    fn test_json_representation() {
        let unknown: Model = serde_json::from_value(json!({})).unwrap();
        assert!(unknown.description.is_unknown());
        assert_eq!(serde_json::to_value(&unknown).unwrap(), json!({}));

        let null: Model = serde_json::from_value(json!({ "description": null })).unwrap();
        assert!(null.description.is_null());
        assert_eq!(
            serde_json::to_value(&null).unwrap(),
            json!({ "description": null })
        );

        let empty: Model = serde_json::from_value(json!({ "description": "" })).unwrap();
        assert_eq!(empty.description.as_str(), Some(""));
    }

    #[test]
    fn test_or_only_replaces_unknown() {
        assert_eq!(Value::Unknown.or(Value::Known(1)), Value::Known(1));
        assert_eq!(Value::<i32>::Null.or(Value::Known(1)), Value::Null);
        assert_eq!(Value::Known(2).or(Value::Known(1)), Value::Known(2));
    }
}
