//! Zero values used when a failed helper is masked
//!
//! Two entry points cover the two sides of the template boundary:
//!
//! - [`default_value_for`] for helpers with a statically known return type.
//!   The bound is `Default`, so `Option<T>` yields `None`, collections yield
//!   empty collections, numbers yield zero and records yield their derived
//!   default.
//! - [`zero_of`] for values whose shape is only known at runtime, i.e. the
//!   `serde_json::Value`s exchanged with the template engine.

use serde_json::{Map, Number, Value};

/// Zero value of the same type as `sample`.
///
/// The sample is only used to drive inference; its content is never read,
/// so an absent reference (`None`) is as valid an input as any other.
///
/// A pointer-like sample zeroes to its absent form, not to a pointer to a
/// zero: `default_value_for(&Some(Box::new(7)))` is `None`, never
/// `Some(Box::new(0))`.
pub fn default_value_for<T: Default>(_sample: &T) -> T {
    T::default()
}

/// Zero value of the same shape as a dynamic value.
///
/// Integers map to `0`, floats to `0.0`, strings to `""`, arrays and objects
/// to their empty forms and `null` stays `null`.
pub fn zero_of(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(_) => Value::Bool(false),
        Value::Number(n) if n.is_f64() => Number::from_f64(0.0)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Value::Number(_) => Value::Number(Number::from(0)),
        Value::String(_) => Value::String(String::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
    }
}
