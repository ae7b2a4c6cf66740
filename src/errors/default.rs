use super::traits::ErrorHandler;
use super::types::{HandleContext, HelperError};

/// Identity handler, installed when no custom handler is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, err: HelperError, _ctx: &HandleContext<'_>) -> HelperError {
        err
    }
}

/// Handler that files every failure under a fixed class
///
/// The original error stays reachable through [`HelperError::root_cause`].
#[derive(Debug, Clone)]
pub struct CastErrorHandler {
    class: String,
}

impl CastErrorHandler {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }
}

impl ErrorHandler for CastErrorHandler {
    fn handle(&self, err: HelperError, ctx: &HandleContext<'_>) -> HelperError {
        tracing::trace!(helper = ctx.helper, class = %self.class, "Casting helper error");
        HelperError::cast(self.class.clone(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_handler_is_identity() {
        let handler = DefaultErrorHandler;
        let ctx = HandleContext::new("test");
        let err = HelperError::message("test error");

        assert_eq!(handler.handle(err.clone(), &ctx), err);
    }

    #[test]
    fn test_default_handler_passes_absence_through() {
        let handler = DefaultErrorHandler;
        let ctx = HandleContext::new("test");

        assert_eq!(handler.handle_opt(None, &ctx), None);
    }

    #[test]
    fn test_cast_handler_wraps_error() {
        let handler = CastErrorHandler::new("test with error handler error");
        let ctx = HandleContext::new("test");
        let err = HelperError::message("boom");

        let handled = handler.handle(err.clone(), &ctx);

        assert_eq!(
            handled,
            HelperError::cast("test with error handler error", err.clone())
        );
        assert_eq!(handled.root_cause(), &err);
        assert_eq!(handled.to_string(), "test with error handler error: boom");
    }

    #[test]
    fn test_cast_handler_leaves_absence_alone() {
        let handler = CastErrorHandler::new("class");
        let ctx = HandleContext::new("test");

        assert!(handler.handle_opt(None, &ctx).is_none());
        assert_eq!(handler.class(), "class");
    }
}
