use rand::Rng;
use serde_json::Value;
use std::sync::Arc;

use super::args::{arity, int_arg, kind_of, min_arity, stringify};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    for name in ["toInt", "toInt64"] {
        funcs.insert(
            name,
            typed(handler, name, move |args| {
                arity(name, args, 1)?;
                to_int64(&args[0])
            }),
        );
    }
    funcs.insert(
        "toFloat64",
        typed(handler, "toFloat64", |args| {
            arity("toFloat64", args, 1)?;
            to_float64(&args[0])
        }),
    );
    funcs.insert(
        "toDecimal",
        typed(handler, "toDecimal", |args| {
            arity("toDecimal", args, 1)?;
            to_decimal(&args[0])
        }),
    );
    for name in ["biggest", "max"] {
        funcs.insert(
            name,
            typed(handler, name, move |args| {
                min_arity(name, args, 1)?;
                let values = (0..args.len())
                    .map(|i| int_arg(name, args, i))
                    .collect::<Result<Vec<_>, _>>()?;
                biggest(&values)
            }),
        );
    }
    funcs.insert(
        "randInt",
        typed(handler, "randInt", |args| {
            arity("randInt", args, 2)?;
            rand_int(int_arg("randInt", args, 0)?, int_arg("randInt", args, 1)?)
        }),
    );
}

/// Coerce a value to an integer; floats truncate toward zero
pub fn to_int64(value: &Value) -> Result<i64, HelperError> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| HelperError::OutOfRange(n.to_string())),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                .map_err(|_| HelperError::Parse(format!("invalid integer {s:?}")))
        }
        other => Err(HelperError::Parse(format!(
            "cannot convert {} to integer",
            kind_of(other)
        ))),
    }
}

pub fn to_float64(value: &Value) -> Result<f64, HelperError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| HelperError::OutOfRange(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| HelperError::Parse(format!("invalid float {s:?}"))),
        other => Err(HelperError::Parse(format!(
            "cannot convert {} to float",
            kind_of(other)
        ))),
    }
}

/// Read the digits of `value` as an octal number
pub fn to_decimal(value: &Value) -> Result<i64, HelperError> {
    let digits = stringify(value);
    i64::from_str_radix(digits.trim(), 8)
        .map_err(|_| HelperError::Parse(format!("invalid octal number {digits:?}")))
}

pub fn biggest(values: &[i64]) -> Result<i64, HelperError> {
    values
        .iter()
        .copied()
        .max()
        .ok_or_else(|| HelperError::invalid_argument("biggest", "no values"))
}

/// Uniform integer in `[min, max)`
pub fn rand_int(min: i64, max: i64) -> Result<i64, HelperError> {
    if min >= max {
        return Err(HelperError::OutOfRange(format!(
            "randInt requires min < max, got {min} and {max}"
        )));
    }
    Ok(rand::thread_rng().gen_range(min..max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_int64() {
        assert_eq!(to_int64(&json!(42)).unwrap(), 42);
        assert_eq!(to_int64(&json!(3.9)).unwrap(), 3);
        assert_eq!(to_int64(&json!("17")).unwrap(), 17);
        assert_eq!(to_int64(&json!(" 2.5 ")).unwrap(), 2);
        assert_eq!(to_int64(&json!(true)).unwrap(), 1);
        assert_eq!(to_int64(&json!(null)).unwrap(), 0);
        assert!(matches!(to_int64(&json!("frankie")), Err(HelperError::Parse(_))));
        assert!(to_int64(&json!([1])).is_err());
    }

    #[test]
    fn test_to_float64() {
        assert_eq!(to_float64(&json!("1.5")).unwrap(), 1.5);
        assert_eq!(to_float64(&json!(2)).unwrap(), 2.0);
        assert_eq!(to_float64(&json!(false)).unwrap(), 0.0);
        assert!(to_float64(&json!("abc")).is_err());
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(&json!("777")).unwrap(), 511);
        assert_eq!(to_decimal(&json!(10)).unwrap(), 8);
        assert!(to_decimal(&json!("89")).is_err());
    }

    #[test]
    fn test_biggest() {
        assert_eq!(biggest(&[1, 7, -3]).unwrap(), 7);
        assert!(biggest(&[]).is_err());
    }

    #[test]
    fn test_rand_int_range() {
        for _ in 0..100 {
            let n = rand_int(3, 6).unwrap();
            assert!((3..6).contains(&n));
        }
        assert!(matches!(rand_int(5, 5), Err(HelperError::OutOfRange(_))));
    }
}
