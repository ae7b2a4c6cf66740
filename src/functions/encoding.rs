use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use data_encoding::BASE32;
use serde_json::Value;
use std::sync::Arc;

use super::args::{arity, str_arg, stringify};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    funcs.insert(
        "b64enc",
        typed(handler, "b64enc", |args| {
            arity("b64enc", args, 1)?;
            Ok(b64enc(&stringify(&args[0])))
        }),
    );
    funcs.insert(
        "b64dec",
        typed(handler, "b64dec", |args| {
            arity("b64dec", args, 1)?;
            b64dec(str_arg("b64dec", args, 0)?)
        }),
    );
    funcs.insert(
        "b32enc",
        typed(handler, "b32enc", |args| {
            arity("b32enc", args, 1)?;
            Ok(b32enc(&stringify(&args[0])))
        }),
    );
    funcs.insert(
        "b32dec",
        typed(handler, "b32dec", |args| {
            arity("b32dec", args, 1)?;
            b32dec(str_arg("b32dec", args, 0)?)
        }),
    );
    funcs.insert(
        "toJson",
        typed(handler, "toJson", |args| {
            arity("toJson", args, 1)?;
            to_json(&args[0])
        }),
    );
    funcs.insert(
        "fromJson",
        typed(handler, "fromJson", |args| {
            arity("fromJson", args, 1)?;
            from_json(str_arg("fromJson", args, 0)?)
        }),
    );
}

pub fn b64enc(s: &str) -> String {
    STANDARD.encode(s)
}

pub fn b64dec(s: &str) -> Result<String, HelperError> {
    let bytes = STANDARD
        .decode(s)
        .map_err(|e| HelperError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| HelperError::Decode(e.to_string()))
}

/// RFC 4648 base32 with padding
pub fn b32enc(s: &str) -> String {
    BASE32.encode(s.as_bytes())
}

pub fn b32dec(s: &str) -> Result<String, HelperError> {
    let bytes = BASE32
        .decode(s.as_bytes())
        .map_err(|e| HelperError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| HelperError::Decode(e.to_string()))
}

pub fn to_json(value: &Value) -> Result<String, HelperError> {
    serde_json::to_string(value).map_err(|e| HelperError::message(e.to_string()))
}

pub fn from_json(s: &str) -> Result<Value, HelperError> {
    serde_json::from_str(s).map_err(|e| HelperError::Parse(e.to_string()))
}
