pub mod config;
pub mod errors;
pub mod functions;
pub mod handler;
pub mod observability;
pub mod registry;
pub mod template;
pub mod zero;

pub use errors::{ErrorHandler, HelperError};
pub use handler::{ErrorStrategy, FunctionHandler, HandlerOption};
pub use registry::FuncMap;
pub use zero::default_value_for;
