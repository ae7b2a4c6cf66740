//! Positional argument access for helpers

use serde_json::Value;

use crate::errors::HelperError;

pub(crate) fn arity(helper: &str, args: &[Value], expected: usize) -> Result<(), HelperError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(HelperError::invalid_argument(
            helper,
            format!(
                "expected {} argument{}, got {}",
                expected,
                if expected == 1 { "" } else { "s" },
                args.len()
            ),
        ))
    }
}

pub(crate) fn min_arity(helper: &str, args: &[Value], minimum: usize) -> Result<(), HelperError> {
    if args.len() >= minimum {
        Ok(())
    } else {
        Err(HelperError::invalid_argument(
            helper,
            format!("expected at least {} arguments, got {}", minimum, args.len()),
        ))
    }
}

pub(crate) fn arg<'a>(helper: &str, args: &'a [Value], index: usize) -> Result<&'a Value, HelperError> {
    args.get(index).ok_or_else(|| {
        HelperError::invalid_argument(helper, format!("missing argument {}", index + 1))
    })
}

pub(crate) fn str_arg<'a>(helper: &str, args: &'a [Value], index: usize) -> Result<&'a str, HelperError> {
    arg(helper, args, index)?.as_str().ok_or_else(|| {
        HelperError::invalid_argument(
            helper,
            format!("argument {} must be a string, got {}", index + 1, kind_of(&args[index])),
        )
    })
}

pub(crate) fn int_arg(helper: &str, args: &[Value], index: usize) -> Result<i64, HelperError> {
    let value = arg(helper, args, index)?;
    value.as_i64().ok_or_else(|| {
        HelperError::invalid_argument(
            helper,
            format!("argument {} must be an integer, got {}", index + 1, kind_of(value)),
        )
    })
}

/// Render a value the way templates print it: strings bare, null empty
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
