//! Helper failures and the error-handler capability
//!
//! ## Key Components
//!
//! - [`HelperError`] - The one error type helpers report
//! - [`ErrorHandler`] - Transformation applied to every failure before the
//!   configured strategy acts on it
//! - [`DefaultErrorHandler`] - Identity transformation, used when nothing
//!   else is configured
//! - [`CastErrorHandler`] - Classifies every failure under a fixed class
//! - [`HandleContext`] - Helper name and call site passed to handlers

mod default;
mod traits;
mod types;

pub use default::{CastErrorHandler, DefaultErrorHandler};
pub use traits::ErrorHandler;
pub use types::{HandleContext, HelperError};
