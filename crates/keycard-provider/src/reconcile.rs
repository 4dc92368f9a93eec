//! Mapping between plan values and nullable wire fields
//!
//! | plan                | wire             |
//! |---------------------|------------------|
//! | `Value::Unknown`    | `Nullable::Omitted` |
//! | `Value::Null`       | `Nullable::Null`    |
//! | `Value::Known(v)`   | `Nullable::Present(v)` |

use crate::error::{ProviderError, Result};
use crate::value::Value;
use keycard_api::Nullable;

/// Plan value to request field
pub fn to_wire<T: Clone>(value: &Value<T>) -> Nullable<T> {
    match value {
        Value::Unknown => Nullable::Omitted,
        Value::Null => Nullable::Null,
        Value::Known(v) => Nullable::Present(v.clone()),
    }
}

/// Response field to state value
pub fn from_wire<T>(value: Nullable<T>) -> Value<T> {
    match value {
        Nullable::Omitted => Value::Unknown,
        Nullable::Null => Value::Null,
        Nullable::Present(v) => Value::Known(v),
    }
}

/// Update field for a nullable attribute
///
/// Only values the user changed or explicitly nulled are sent; anything
/// else is omitted so the server keeps its current value.
pub fn diff_field<T: Clone + PartialEq>(plan: &Value<T>, state: &Value<T>) -> Nullable<T> {
    if plan.is_unknown() || plan == state {
        Nullable::Omitted
    } else {
        to_wire(plan)
    }
}

/// Update field for a non-nullable attribute
pub fn diff_required<T: Clone + PartialEq>(plan: &Value<T>, state: &Value<T>) -> Option<T> {
    match plan {
        Value::Known(v) if plan != state => Some(v.clone()),
        _ => None,
    }
}

/// A value that must be known
pub fn required<T: Clone>(value: &Value<T>, attribute: &'static str) -> Result<T> {
    value
        .as_known()
        .cloned()
        .ok_or(ProviderError::MissingAttribute(attribute))
}
