//! Handlebars renderer.

use std::path::Path;

use handlebars::Handlebars;
use kiln_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    error::KilnResult,
};
use serde_json::Value;
use tracing::trace;

/// Renders templates with handlebars: interpolation, `#if`, `#each` and the
/// builtin comparison helpers.
///
/// Output is never HTML-escaped; templates produce source code, not markup.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Fail on references to missing data instead of rendering nothing.
    pub fn strict(mut self) -> Self {
        self.registry.set_strict_mode(true);
        self
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, data: &Value, path: &Path) -> KilnResult<String> {
        trace!(template = %path.display(), "rendering");
        self.registry
            .render_template(template, data)
            .map_err(|e| {
                ApplicationError::TemplateError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}
