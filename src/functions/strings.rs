use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

use super::args::{arg, arity, int_arg, str_arg, stringify};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    funcs.insert("hello", typed(handler, "hello", |_| Ok(hello())));
    funcs.insert(
        "toString",
        typed(handler, "toString", |args| {
            arity("toString", args, 1)?;
            Ok(stringify(&args[0]))
        }),
    );
    funcs.insert(
        "trim",
        typed(handler, "trim", |args| {
            arity("trim", args, 1)?;
            Ok(str_arg("trim", args, 0)?.trim().to_string())
        }),
    );
    funcs.insert(
        "lower",
        typed(handler, "lower", |args| {
            arity("lower", args, 1)?;
            Ok(str_arg("lower", args, 0)?.to_lowercase())
        }),
    );
    funcs.insert(
        "upper",
        typed(handler, "upper", |args| {
            arity("upper", args, 1)?;
            Ok(str_arg("upper", args, 0)?.to_uppercase())
        }),
    );
    funcs.insert(
        "trunc",
        typed(handler, "trunc", |args| {
            arity("trunc", args, 2)?;
            Ok(trunc(int_arg("trunc", args, 0)?, str_arg("trunc", args, 1)?))
        }),
    );
    funcs.insert(
        "toStrings",
        typed(handler, "toStrings", |args| {
            arity("toStrings", args, 1)?;
            to_strings(arg("toStrings", args, 0)?)
        }),
    );
    funcs.insert(
        "regexMatch",
        typed(handler, "regexMatch", |args| {
            arity("regexMatch", args, 2)?;
            regex_match(str_arg("regexMatch", args, 0)?, str_arg("regexMatch", args, 1)?)
        }),
    );
}

pub fn hello() -> String {
    "Hello, World!".to_string()
}

/// Keep the first `n` characters, or the last `-n` when `n` is negative
pub fn trunc(n: i64, s: &str) -> String {
    let len = s.chars().count();
    let keep = n.unsigned_abs() as usize;
    if keep >= len {
        return s.to_string();
    }
    if n >= 0 {
        s.chars().take(keep).collect()
    } else {
        s.chars().skip(len - keep).collect()
    }
}

/// Stringify every element of a list, skipping nulls
pub fn to_strings(list: &Value) -> Result<Vec<String>, HelperError> {
    let items = list.as_array().ok_or_else(|| {
        HelperError::invalid_argument("toStrings", "argument 1 must be an array")
    })?;
    Ok(items.iter().filter(|v| !v.is_null()).map(stringify).collect())
}

pub fn regex_match(pattern: &str, s: &str) -> Result<bool, HelperError> {
    let regex = Regex::new(pattern).map_err(|e| HelperError::Parse(e.to_string()))?;
    Ok(regex.is_match(s))
}
