use super::types::{HandleContext, HelperError};

/// Transformation applied to every helper failure before a strategy sees it
///
/// Implementations may enrich or reclassify the error, but must always
/// return an error for an error. Handlers are shared by every render that
/// uses the owning [`FunctionHandler`](crate::handler::FunctionHandler), so
/// they hold no per-call state.
pub trait ErrorHandler: Send + Sync {
    /// Transform a reported failure
    fn handle(&self, err: HelperError, ctx: &HandleContext<'_>) -> HelperError;

    /// Same as [`handle`](Self::handle), with absence passed through
    fn handle_opt(
        &self,
        err: Option<HelperError>,
        ctx: &HandleContext<'_>,
    ) -> Option<HelperError> {
        err.map(|err| self.handle(err, ctx))
    }
}
