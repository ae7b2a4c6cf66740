//! Function handler: the shared context threaded into every helper call
//!
//! A [`FunctionHandler`] is built once per rendering session from an ordered
//! list of [`HandlerOption`]s and then shared read-only (behind an `Arc`) by
//! every helper in the [`FuncMap`](crate::registry::FuncMap). Helpers report
//! failures through [`FunctionHandler::err_is_present`] or one of the typed
//! `resolve` bridges, and the configured [`ErrorStrategy`] decides what the
//! template sees.
//!
//! ## Example
//!
//! ```rust,ignore
//! use funcmap::handler::{ErrorStrategy, FunctionHandler, HandlerOption};
//!
//! let handler = FunctionHandler::new([
//!     HandlerOption::Strategy(ErrorStrategy::ReturnDefaultValue),
//! ]);
//!
//! let value: i64 = handler.resolve("toInt", "frankie".parse::<i64>().map_err(..))?;
//! assert_eq!(value, 0);
//! ```

mod channel;
mod logger;
mod strategy;

pub use channel::{DEFAULT_SEND_TIMEOUT, DropReason, ErrorChannel, SendPolicy, Undelivered};
pub use logger::Logger;
pub use strategy::{ErrorStrategy, ParseStrategyError};

use serde_json::Value;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::errors::{DefaultErrorHandler, ErrorHandler, HandleContext, HelperError};
use crate::observability::ErrorStats;
use crate::zero::zero_of;

const UNNAMED_HELPER: &str = "<unnamed>";

/// One configuration step applied to a handler under construction.
///
/// Each option sets exactly one field; when two options set the same field
/// the later one wins.
#[derive(Clone)]
pub enum HandlerOption {
    Strategy(ErrorStrategy),
    ErrorHandler(Arc<dyn ErrorHandler>),
    Logger(Logger),
    ErrorChannel(ErrorChannel),
}

impl HandlerOption {
    pub fn apply(self, handler: &mut FunctionHandler) {
        match self {
            HandlerOption::Strategy(strategy) => handler.strategy = strategy,
            HandlerOption::ErrorHandler(err_handler) => handler.err_handler = Some(err_handler),
            HandlerOption::Logger(logger) => handler.logger = logger,
            HandlerOption::ErrorChannel(channel) => handler.err_chan = Some(channel),
        }
    }
}

impl fmt::Debug for HandlerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerOption::Strategy(strategy) => f.debug_tuple("Strategy").field(strategy).finish(),
            HandlerOption::ErrorHandler(_) => f.write_str("ErrorHandler(..)"),
            HandlerOption::Logger(logger) => f.debug_tuple("Logger").field(logger).finish(),
            HandlerOption::ErrorChannel(channel) => {
                f.debug_tuple("ErrorChannel").field(channel).finish()
            }
        }
    }
}

/// Shared execution context for helper routines
#[derive(Default)]
pub struct FunctionHandler {
    strategy: ErrorStrategy,
    err_handler: Option<Arc<dyn ErrorHandler>>,
    logger: Logger,
    err_chan: Option<ErrorChannel>,
    stats: ErrorStats,
}

impl FunctionHandler {
    /// Build a handler by applying `options` in order to the defaults
    ///
    /// Defaults: unconfigured strategy (fails loud), identity error handler,
    /// ambient logger, no error channel.
    pub fn new(options: impl IntoIterator<Item = HandlerOption>) -> Self {
        let mut handler = Self::default();
        for option in options {
            option.apply(&mut handler);
        }
        handler
    }

    pub fn strategy(&self) -> ErrorStrategy {
        self.strategy
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn stats(&self) -> &ErrorStats {
        &self.stats
    }

    pub fn has_error_channel(&self) -> bool {
        self.err_chan.is_some()
    }

    /// Decide what happens to the outcome of a helper call
    ///
    /// Returns `(None, false)` when `err` is `None`. Otherwise the error goes
    /// through the error handler and the strategy, and the boolean is `true`:
    /// `(Some(handled), true)` means the helper must fail with `handled`,
    /// `(None, true)` means it must report success with a zero value. Under
    /// [`ErrorStrategy::Panic`] this never returns.
    #[track_caller]
    pub fn err_is_present(&self, err: Option<HelperError>) -> (Option<HelperError>, bool) {
        self.evaluate(UNNAMED_HELPER, err, Location::caller())
    }

    /// [`err_is_present`](Self::err_is_present) on behalf of a named helper
    #[track_caller]
    pub fn err_is_present_for(
        &self,
        helper: &str,
        err: Option<HelperError>,
    ) -> (Option<HelperError>, bool) {
        self.evaluate(helper, err, Location::caller())
    }

    /// Turn a helper's result into what the template engine should see
    ///
    /// A masked failure becomes `Ok(T::default())`, the zero value of the
    /// helper's declared return type.
    #[track_caller]
    pub fn resolve<T: Default>(
        &self,
        helper: &str,
        result: Result<T, HelperError>,
    ) -> Result<T, HelperError> {
        let location = Location::caller();
        match result {
            Ok(value) => Ok(value),
            Err(err) => match self.evaluate(helper, Some(err), location) {
                (Some(handled), _) => Err(handled),
                (None, _) => Ok(T::default()),
            },
        }
    }

    /// [`resolve`](Self::resolve) for dynamically shaped results, masking
    /// with the zero value of `sample`'s shape
    #[track_caller]
    pub fn resolve_like(
        &self,
        helper: &str,
        sample: &Value,
        result: Result<Value, HelperError>,
    ) -> Result<Value, HelperError> {
        let location = Location::caller();
        match result {
            Ok(value) => Ok(value),
            Err(err) => match self.evaluate(helper, Some(err), location) {
                (Some(handled), _) => Err(handled),
                (None, _) => Ok(zero_of(sample)),
            },
        }
    }

    fn evaluate(
        &self,
        helper: &str,
        err: Option<HelperError>,
        location: &'static Location<'static>,
    ) -> (Option<HelperError>, bool) {
        let Some(err) = err else {
            return (None, false);
        };

        let ctx = HandleContext::with_location(helper, location);
        let handled = match &self.err_handler {
            Some(err_handler) => err_handler.handle(err, &ctx),
            None => DefaultErrorHandler.handle(err, &ctx),
        };

        match self.strategy {
            ErrorStrategy::ReturnDefaultValue => {
                self.stats.error_masked();
                self.logger.in_scope(|| {
                    debug!(error = %handled, helper, caller = %location, "Error masked with default value");
                });
                (None, true)
            }
            ErrorStrategy::Panic => {
                self.stats.error_panicked();
                self.logger.in_scope(|| {
                    error!(error = %handled, helper, caller = %location, "Error caught, panicking");
                });
                std::panic::panic_any(handled)
            }
            ErrorStrategy::ErrorChannel => match &self.err_chan {
                Some(channel) => {
                    self.forward(channel, handled, &ctx);
                    (None, true)
                }
                None => {
                    self.logger.in_scope(|| {
                        warn!(helper, "Error channel strategy without a channel, surfacing error");
                    });
                    self.surface(handled, &ctx)
                }
            },
            ErrorStrategy::TemplateError | ErrorStrategy::Unconfigured => {
                self.surface(handled, &ctx)
            }
        }
    }

    fn surface(&self, handled: HelperError, ctx: &HandleContext<'_>) -> (Option<HelperError>, bool) {
        self.stats.error_surfaced();
        self.logger.in_scope(|| {
            error!(error = %handled, helper = ctx.helper, caller = %ctx.location, "Error caught");
        });
        (Some(handled), true)
    }

    fn forward(&self, channel: &ErrorChannel, handled: HelperError, ctx: &HandleContext<'_>) {
        let message = handled.to_string();
        match channel.send(handled) {
            Ok(()) => {
                self.stats.error_forwarded();
                self.logger.in_scope(|| {
                    debug!(error = %message, helper = ctx.helper, "Error forwarded to error channel");
                });
            }
            Err(undelivered) => {
                self.stats.error_dropped();
                self.logger.in_scope(|| match undelivered.reason {
                    DropReason::Full => warn!(
                        error = %undelivered.error,
                        helper = ctx.helper,
                        "Error channel full, error dropped"
                    ),
                    DropReason::Closed => warn!(
                        error = %undelivered.error,
                        helper = ctx.helper,
                        "Error channel closed, error dropped"
                    ),
                });
            }
        }
    }
}

impl fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionHandler")
            .field("strategy", &self.strategy)
            .field("custom_err_handler", &self.err_handler.is_some())
            .field("logger", &self.logger)
            .field("err_chan", &self.err_chan)
            .finish()
    }
}
