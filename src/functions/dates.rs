use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

use super::args::{arg, arity, kind_of, str_arg};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    funcs.insert(
        "toDate",
        typed(handler, "toDate", |args| {
            arity("toDate", args, 2)?;
            to_date(str_arg("toDate", args, 0)?, str_arg("toDate", args, 1)?)
        }),
    );
    funcs.insert(
        "date",
        typed(handler, "date", |args| {
            arity("date", args, 2)?;
            date(str_arg("date", args, 0)?, arg("date", args, 1)?)
        }),
    );
    funcs.insert(
        "now",
        typed(handler, "now", |args| {
            arity("now", args, 0)?;
            Ok(Utc::now().to_rfc3339())
        }),
    );
}

/// Parse `value` with a strftime `layout` and return it as RFC 3339
///
/// Layouts without an offset are read as UTC; date-only layouts resolve
/// to midnight.
pub fn to_date(layout: &str, value: &str) -> Result<String, HelperError> {
    checked_items(layout)?;

    if let Ok(parsed) = DateTime::parse_from_str(value, layout) {
        return Ok(parsed.to_rfc3339());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, layout) {
        return Ok(parsed.and_utc().to_rfc3339());
    }
    NaiveDate::parse_from_str(value, layout)
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc().to_rfc3339())
        .map_err(|e| HelperError::Parse(format!("{value:?} does not match {layout:?}: {e}")))
}

/// Format a timestamp with a strftime `format`
///
/// `value` is an RFC 3339 string, a `YYYY-MM-DD` date, or unix seconds.
pub fn date(format: &str, value: &Value) -> Result<String, HelperError> {
    let items = checked_items(format)?;
    let timestamp = timestamp_of(value)?;
    Ok(timestamp.format_with_items(items.iter()).to_string())
}

fn timestamp_of(value: &Value) -> Result<DateTime<Utc>, HelperError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .ok_or_else(|| HelperError::OutOfRange(format!("invalid unix timestamp {n}"))),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|parsed| parsed.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
            })
            .map_err(|e| HelperError::Parse(format!("invalid date {s:?}: {e}"))),
        other => Err(HelperError::invalid_argument(
            "date",
            format!("argument 2 must be a string or integer, got {}", kind_of(other)),
        )),
    }
}

// Rendering an unknown specifier panics inside chrono's Display impl
fn checked_items(format: &str) -> Result<Vec<Item<'_>>, HelperError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(HelperError::Parse(format!("invalid format string {format:?}")));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_date_date_only() {
        assert_eq!(
            to_date("%Y-%m-%d", "2024-03-05").unwrap(),
            "2024-03-05T00:00:00+00:00"
        );
    }

    #[test]
    fn test_to_date_with_time_and_offset() {
        assert_eq!(
            to_date("%Y-%m-%d %H:%M", "2024-03-05 10:30").unwrap(),
            "2024-03-05T10:30:00+00:00"
        );
        assert_eq!(
            to_date("%Y-%m-%d %H:%M %z", "2024-03-05 10:30 +0200").unwrap(),
            "2024-03-05T10:30:00+02:00"
        );
    }

    #[test]
    fn test_to_date_mismatch() {
        assert!(matches!(
            to_date("%Y-%m-%d", "not a date"),
            Err(HelperError::Parse(_))
        ));
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(date("%Y-%m-%d", &json!("2024-03-05T10:00:00Z")).unwrap(), "2024-03-05");
        assert_eq!(date("%Y", &json!(0)).unwrap(), "1970");
        assert_eq!(date("%d/%m", &json!("2024-12-25")).unwrap(), "25/12");
    }

    #[test]
    fn test_date_rejects_bad_format() {
        assert!(date("%Q", &json!(0)).is_err());
        assert!(date("%Y", &json!([1])).is_err());
    }
}
