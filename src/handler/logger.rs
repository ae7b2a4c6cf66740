use tracing::{Dispatch, Subscriber};

/// Log sink for a [`FunctionHandler`](super::FunctionHandler)
///
/// The default logger writes to whatever subscriber is ambient when the
/// record is emitted (normally the global one installed by
/// [`init_logging`](crate::observability::init_logging)). A dedicated
/// logger routes only this handler's records to its own subscriber.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self::from_dispatch(Dispatch::new(subscriber))
    }

    pub fn is_dedicated(&self) -> bool {
        self.dispatch.is_some()
    }

    /// Run `f` with this logger's subscriber as the default
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}
