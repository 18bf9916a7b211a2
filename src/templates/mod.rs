//! Built-in theme templates using the Tera template engine
//!
//! The theme is embedded in the binary; sites only supply content and
//! optional static files.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::format_display_date;

/// Default stylesheet, written to `css/style.css` unless the site ships one
pub const STYLESHEET: &str = include_str!("theme/style.css");

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered markup and URLs are inserted as-is; text fields are
        // escaped in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("page.html", include_str!("theme/page.html")),
        ])?;

        tera.register_filter("display_date", display_date_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: `DD-MM-YYYY` to `D Mon YYYY`
fn display_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("display_date", "value", String, value);
    Ok(tera::Value::String(format_display_date(&s)))
}
