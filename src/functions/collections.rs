use serde_json::{Map, Value};
use std::sync::Arc;

use super::args::{arg, arity, kind_of, min_arity, stringify};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    for name in ["list", "tuple"] {
        funcs.insert(name, typed(handler, name, |args| Ok(args.to_vec())));
    }
    funcs.insert("dict", typed(handler, "dict", dict));
    funcs.insert(
        "keys",
        typed(handler, "keys", |args| {
            arity("keys", args, 1)?;
            keys(&args[0])
        }),
    );

    // The masked value of `index` follows the shape of the collection's elements
    let shared = Arc::clone(handler);
    funcs.register("index", move |args: &[Value]| {
        let sample = args.first().map(first_element).unwrap_or(Value::Null);
        shared.resolve_like("index", &sample, index(args))
    });
}

/// Build an object from alternating keys and values
pub fn dict(args: &[Value]) -> Result<Map<String, Value>, HelperError> {
    if args.len() % 2 != 0 {
        return Err(HelperError::invalid_argument(
            "dict",
            format!("expected an even number of arguments, got {}", args.len()),
        ));
    }
    Ok(args
        .chunks(2)
        .map(|pair| (stringify(&pair[0]), pair[1].clone()))
        .collect())
}

/// Walk `args[0]` along the keys and indices in `args[1..]`
pub fn index(args: &[Value]) -> Result<Value, HelperError> {
    min_arity("index", args, 2)?;
    let mut current = arg("index", args, 0)?;

    for key in &args[1..] {
        current = match (current, key) {
            (Value::Array(items), Value::Number(n)) => n
                .as_u64()
                .and_then(|i| items.get(i as usize))
                .ok_or_else(|| {
                    HelperError::OutOfRange(format!(
                        "index {n} out of range for array of length {}",
                        items.len()
                    ))
                })?,
            (Value::Object(map), key) => {
                let key = stringify(key);
                map.get(&key)
                    .ok_or_else(|| HelperError::message(format!("index: key {key:?} not found")))?
            }
            (other, key) => {
                return Err(HelperError::invalid_argument(
                    "index",
                    format!("cannot index {} with {}", kind_of(other), kind_of(key)),
                ));
            }
        };
    }

    Ok(current.clone())
}

/// Object keys in sorted order
pub fn keys(value: &Value) -> Result<Vec<String>, HelperError> {
    let map = value.as_object().ok_or_else(|| {
        HelperError::invalid_argument(
            "keys",
            format!("argument 1 must be an object, got {}", kind_of(value)),
        )
    })?;
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    Ok(keys)
}

fn first_element(collection: &Value) -> Value {
    match collection {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        Value::Object(map) => map.values().next().cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{ErrorStrategy, HandlerOption};
    use serde_json::json;

    #[test]
    fn test_dict() {
        let map = dict(&[json!("a"), json!(1), json!(2), json!("two")]).unwrap();
        assert_eq!(Value::Object(map), json!({"a": 1, "2": "two"}));
        assert!(dict(&[json!("a")]).is_err());
    }

    #[test]
    fn test_index_nested() {
        let data = json!({"users": [{"name": "ana"}, {"name": "bo"}]});
        assert_eq!(
            index(&[data.clone(), json!("users"), json!(1), json!("name")]).unwrap(),
            json!("bo")
        );
        assert!(index(&[data.clone(), json!("missing")]).is_err());
        assert!(matches!(
            index(&[json!([1, 2]), json!(5)]),
            Err(HelperError::OutOfRange(_))
        ));
        assert!(index(&[json!("text"), json!(0)]).is_err());
    }

    #[test]
    fn test_keys_sorted() {
        assert_eq!(keys(&json!({"b": 1, "a": 2})).unwrap(), vec!["a", "b"]);
        assert!(keys(&json!([1])).is_err());
    }

    #[test]
    fn test_index_masks_with_element_shape() {
        let handler = Arc::new(FunctionHandler::new([HandlerOption::Strategy(
            ErrorStrategy::ReturnDefaultValue,
        )]));
        let mut funcs = FuncMap::new();
        register(&mut funcs, &handler);

        let masked = funcs.call("index", &[json!(["a", "b"]), json!(9)]).unwrap();
        assert_eq!(masked, json!(""));

        let masked = funcs.call("index", &[json!([1.5]), json!(3)]).unwrap();
        assert_eq!(masked, json!(0.0));

        let masked = funcs.call("index", &[json!([]), json!(0)]).unwrap();
        assert_eq!(masked, Value::Null);
    }
}
