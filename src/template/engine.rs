use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::error::{Result, TemplateError};
use crate::config::RenderSettings;
use crate::registry::{FuncMap, HelperFn};

/// A registry entry exposed as a value-returning handlebars helper
struct FuncHelper {
    name: String,
    func: HelperFn,
}

impl HelperDef for FuncHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> std::result::Result<ScopedJson<'reg, 'rc>, RenderError> {
        let args: Vec<Value> = h.params().iter().map(|p| p.value().clone()).collect();

        (self.func)(&args)
            .map(ScopedJson::Derived)
            .map_err(|err| RenderError::new(format!("{}: {}", self.name, err)))
    }
}

#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create an engine with every helper in `funcs` registered
    pub fn new(funcs: &FuncMap, settings: &RenderSettings) -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(settings.strict_mode);
        handlebars.set_dev_mode(false);
        if !settings.escape_html {
            handlebars.register_escape_fn(handlebars::no_escape);
        }

        let mut engine = Self { handlebars };
        engine.register_funcs(funcs);
        engine
    }

    /// Register (or replace) helpers from `funcs`
    pub fn register_funcs(&mut self, funcs: &FuncMap) {
        for (name, func) in funcs.iter() {
            self.handlebars.register_helper(
                name,
                Box::new(FuncHelper {
                    name: name.to_string(),
                    func: func.clone(),
                }),
            );
        }
        tracing::debug!(helpers = funcs.len(), "Helpers registered with template engine");
    }

    /// Render a template string against `data`
    pub fn render(&self, template: &str, data: &Value) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(TemplateError::RenderError)
    }

    /// Render the template stored at `path`
    pub fn render_file(&self, path: impl AsRef<Path>, data: &Value) -> Result<String> {
        let template = fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Rendering template file");
        self.render(&template, data)
    }

    /// Validate template syntax without rendering
    pub fn validate_template(&self, template: &str) -> Result<()> {
        handlebars::Template::compile(template)
            .map(|_| ())
            .map_err(|e| TemplateError::SyntaxError(e.to_string()))
    }
}
