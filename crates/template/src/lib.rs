//! Template rendering for dynamic briefing fields.
//!
//! Briefing titles, texts and URLs may embed `{{ ... }}` substitutions that
//! are evaluated on every request against a [`RenderContext`]. Rendering is
//! "raw": the result is always the rendered string.
//!
//! ```
//! use briefcast_core::{RenderContext, TemplateRenderer};
//! use briefcast_template::TemplateEngine;
//!
//! let ctx = RenderContext::new().with("city", "Lisbon");
//! let text = TemplateEngine::new()
//!     .render("Weather for {{ city | upper }}", &ctx)
//!     .unwrap();
//! assert_eq!(text, "Weather for LISBON");
//! ```

mod parser;

use briefcast_core::{RenderContext, TemplateError, TemplateRenderer};
use serde_json::Value;

pub use parser::{Template, parse_template};
use parser::{Expr, Filter, Node, Primary};

/// The built-in [`TemplateRenderer`].
///
/// Stateless: templates are parsed on each call, so sharing one engine
/// across requests needs no synchronization.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TemplateEngine {
    fn validate(&self, source: &str) -> Result<(), TemplateError> {
        parse_template(source).map(|_| ())
    }

    fn render(&self, source: &str, context: &RenderContext) -> Result<String, TemplateError> {
        let template = parse_template(source)?;
        template.render(context).inspect_err(|e| {
            tracing::debug!(error = %e, "Template rendering failed");
        })
    }
}

/// Result of evaluating an expression before it is written out.
enum Resolved {
    Value(Value),
    Undefined(String),
}

impl Template {
    /// Render this template against `context`.
    pub fn render(&self, context: &RenderContext) -> Result<String, TemplateError> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Expr(expr) => match evaluate(expr, context) {
                    Resolved::Value(value) => out.push_str(&value_to_string(&value)),
                    Resolved::Undefined(path) => {
                        return Err(TemplateError::UndefinedVariable(path));
                    }
                },
            }
        }
        Ok(out)
    }

    /// Whether the template contains no substitutions.
    pub fn is_static(&self) -> bool {
        self.nodes.iter().all(|n| matches!(n, Node::Text(_)))
    }
}

fn evaluate(expr: &Expr, context: &RenderContext) -> Resolved {
    let mut resolved = match &expr.primary {
        Primary::Literal(value) => Resolved::Value(value.clone()),
        Primary::Var(path) => match context.lookup(path) {
            Some(value) => Resolved::Value(value.clone()),
            None => Resolved::Undefined(path.clone()),
        },
    };

    for filter in &expr.filters {
        resolved = apply_filter(filter, resolved);
    }
    resolved
}

fn apply_filter(filter: &Filter, input: Resolved) -> Resolved {
    match (filter, input) {
        (Filter::Default(fallback), Resolved::Undefined(_))
        | (Filter::Default(fallback), Resolved::Value(Value::Null)) => {
            Resolved::Value(fallback.clone())
        }
        (_, undefined @ Resolved::Undefined(_)) => undefined,
        (Filter::Default(_), value) => value,
        (Filter::Upper, Resolved::Value(v)) => text(value_to_string(&v).to_uppercase()),
        (Filter::Lower, Resolved::Value(v)) => text(value_to_string(&v).to_lowercase()),
        (Filter::Trim, Resolved::Value(v)) => text(value_to_string(&v).trim().to_string()),
        (Filter::Title, Resolved::Value(v)) => text(title_case(&value_to_string(&v))),
    }
}

fn text(s: String) -> Resolved {
    Resolved::Value(Value::String(s))
}

/// Capitalize the first letter of every word, lowercase the rest.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(source: &str, ctx: &RenderContext) -> Result<String, TemplateError> {
        TemplateEngine::new().render(source, ctx)
    }

    #[test]
    fn renders_variables() {
        let ctx = RenderContext::new()
            .with("name", "Ada")
            .with("user", json!({"city": "London"}));
        assert_eq!(
            render("Hi {{ name }} from {{ user.city }}", &ctx).unwrap(),
            "Hi Ada from London"
        );
    }

    #[test]
    fn renders_raw_without_coercion() {
        let ctx = RenderContext::new().with("count", 3).with("flag", true);
        assert_eq!(render("{{ count }}", &ctx).unwrap(), "3");
        assert_eq!(render("{{ flag }}", &ctx).unwrap(), "true");
        assert_eq!(render("[1, 2]", &ctx).unwrap(), "[1, 2]");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let err = render("{{ weather }}", &RenderContext::new()).unwrap_err();
        assert_eq!(err, TemplateError::UndefinedVariable("weather".into()));
    }

    #[test]
    fn default_rescues_undefined_and_null() {
        let ctx = RenderContext::new().with("nothing", Value::Null);
        assert_eq!(
            render(r#"{{ weather | default("clear") | upper }}"#, &ctx).unwrap(),
            "CLEAR"
        );
        assert_eq!(render("{{ nothing | default(0) }}", &ctx).unwrap(), "0");
    }

    #[test]
    fn default_keeps_defined_value() {
        let ctx = RenderContext::new().with("weather", "rain");
        assert_eq!(
            render(r#"{{ weather | default("clear") }}"#, &ctx).unwrap(),
            "rain"
        );
    }

    #[test]
    fn filters_transform_text() {
        let ctx = RenderContext::new().with("s", "  hello WORLD  ");
        assert_eq!(render("{{ s | trim | lower }}", &ctx).unwrap(), "hello world");
        assert_eq!(render("{{ s | trim | title }}", &ctx).unwrap(), "Hello World");
    }

    #[test]
    fn null_renders_empty() {
        let ctx = RenderContext::new().with("n", Value::Null);
        assert_eq!(render("[{{ n }}]", &ctx).unwrap(), "[]");
    }

    #[test]
    fn objects_render_as_json() {
        let ctx = RenderContext::new().with("o", json!({"a": 1}));
        assert_eq!(render("{{ o }}", &ctx).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn validate_reports_syntax_errors() {
        let engine = TemplateEngine::new();
        assert!(engine.validate("{{ ok }}").is_ok());
        assert!(engine.validate("{{ broken").is_err());
    }

    #[test]
    fn static_templates() {
        assert!(parse_template("plain {# note #}").unwrap().is_static());
        assert!(!parse_template("{{ x }}").unwrap().is_static());
    }
}
