use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Failure reported by a helper routine
///
/// Every helper signals failure through this one type, so it carries only
/// owned text and can be cloned, compared, sent across threads or used as a
/// panic payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelperError {
    #[error("{helper}: {reason}")]
    InvalidArgument { helper: String, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("{0}")]
    Message(String),

    #[error("{class}: {cause}")]
    Cast {
        class: String,
        cause: Box<HelperError>,
    },
}

impl HelperError {
    pub fn message(message: impl Into<String>) -> Self {
        HelperError::Message(message.into())
    }

    pub fn invalid_argument(helper: impl Into<String>, reason: impl Into<String>) -> Self {
        HelperError::InvalidArgument {
            helper: helper.into(),
            reason: reason.into(),
        }
    }

    /// Classify `cause` under `class`, keeping the cause reachable
    pub fn cast(class: impl Into<String>, cause: HelperError) -> Self {
        HelperError::Cast {
            class: class.into(),
            cause: Box::new(cause),
        }
    }

    /// Innermost error below any number of casts
    pub fn root_cause(&self) -> &HelperError {
        match self {
            HelperError::Cast { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

/// Hints passed to an [`ErrorHandler`](super::ErrorHandler) alongside the error
#[derive(Debug, Clone, Copy)]
pub struct HandleContext<'a> {
    /// Template name of the helper that failed
    pub helper: &'a str,
    /// Source location that reported the failure
    pub location: &'static Location<'static>,
}

impl<'a> HandleContext<'a> {
    #[track_caller]
    pub fn new(helper: &'a str) -> Self {
        Self {
            helper,
            location: Location::caller(),
        }
    }

    pub fn with_location(helper: &'a str, location: &'static Location<'static>) -> Self {
        Self { helper, location }
    }
}

impl fmt::Display for HandleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.helper, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_display_is_bare() {
        assert_eq!(HelperError::message("bad input").to_string(), "bad input");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = HelperError::invalid_argument("toInt", "expected 1 argument, got 0");
        assert_eq!(err.to_string(), "toInt: expected 1 argument, got 0");
    }

    #[test]
    fn test_cast_keeps_cause() {
        let cause = HelperError::Parse("not a number".to_string());
        let cast = HelperError::cast("conversion", cause.clone());

        assert_eq!(cast.to_string(), "conversion: parse error: not a number");
        assert_eq!(cast.root_cause(), &cause);
    }

    #[test]
    fn test_root_cause_through_nested_casts() {
        let cause = HelperError::message("inner");
        let nested = HelperError::cast("outer", HelperError::cast("middle", cause.clone()));
        assert_eq!(nested.root_cause(), &cause);
    }

    #[test]
    fn test_handle_context_records_caller() {
        let ctx = HandleContext::new("trim");
        assert_eq!(ctx.helper, "trim");
        assert!(ctx.location.file().ends_with("types.rs"));
        assert!(ctx.to_string().starts_with("trim at "));
    }
}
