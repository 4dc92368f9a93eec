//! Tri-state wire fields
//!
//! PATCH-style requests need three states per optional field: leave the
//! server value alone, clear it, or set it. `Option<T>` only has two.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON field that is omitted, explicitly `null`, or present.
///
/// Struct fields must be annotated with
/// `#[serde(default, skip_serializing_if = "Nullable::is_omitted")]`
/// so that a missing key deserializes to [`Nullable::Omitted`] and
/// an omitted value is not written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    Omitted,
    Null,
    Present(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Nullable::Omitted
    }
}

impl<T> Nullable<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Nullable::Omitted)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn as_ref(&self) -> Nullable<&T> {
        match self {
            Nullable::Omitted => Nullable::Omitted,
            Nullable::Null => Nullable::Null,
            Nullable::Present(v) => Nullable::Present(v),
        }
    }

    /// The value, if one is present
    pub fn present(self) -> Option<T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Nullable<U> {
        match self {
            Nullable::Omitted => Nullable::Omitted,
            Nullable::Null => Nullable::Null,
            Nullable::Present(v) => Nullable::Present(f(v)),
        }
    }

    /// Descend into a nested nullable object
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Nullable<U>) -> Nullable<U> {
        match self {
            Nullable::Omitted => Nullable::Omitted,
            Nullable::Null => Nullable::Null,
            Nullable::Present(v) => f(v),
        }
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Nullable::Present(v),
            None => Nullable::Null,
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Only reached when the field lacks `skip_serializing_if`
            Nullable::Omitted | Nullable::Null => serializer.serialize_none(),
            Nullable::Present(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Nullable::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Patch {
        #[serde(default, skip_serializing_if = "Nullable::is_omitted")]
        description: Nullable<String>,
    }

    #[test]
    fn test_serialize_three_states() {
        let omitted = Patch::default();
        assert_eq!(serde_json::to_value(&omitted).unwrap(), json!({}));

        let null = Patch {
            description: Nullable::Null,
        };
        assert_eq!(
            serde_json::to_value(&null).unwrap(),
            json!({ "description": null })
        );

        let present = Patch {
            description: Nullable::Present(String::new()),
        };
        assert_eq!(
            serde_json::to_value(&present).unwrap(),
            json!({ "description": "" })
        );
    }

    #[test]
    fn test_deserialize_three_states() {
        let omitted: Patch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(omitted.description, Nullable::Omitted);

        let null: Patch = serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(null.description, Nullable::Null);

        let empty: Patch = serde_json::from_value(json!({ "description": "" })).unwrap();
        assert_eq!(empty.description, Nullable::Present(String::new()));
    }

    #[test]
    fn test_and_then_nested() {
        let nested: Nullable<Nullable<bool>> = Nullable::Present(Nullable::Null);
        assert_eq!(nested.clone().and_then(|n| n), Nullable::Null);
        assert_eq!(Nullable::<Nullable<bool>>::Null.and_then(|n| n), Nullable::Null);
        assert_eq!(
            Nullable::<Nullable<bool>>::Omitted.and_then(|n| n),
            Nullable::Omitted
        );
    }
}
