//! Handlebars adapter exposing a [`FuncMap`](crate::registry::FuncMap) to templates

mod engine;
mod error;

pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
