//! Response body templates.
//!
//! Templates are tera programs evaluated against a [`RequestContext`].
//! Field references may also be written with a leading dot
//! (`{{ .Method }}`, `{{ .URL.Path }}`); inside template tags these are
//! rewritten to plain tera identifiers before parsing.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tera::{Context, Tera};

use crate::rules::context::RequestContext;

/// Name every response template is registered under. Shows up in
/// template diagnostics.
pub const TEMPLATE_NAME: &str = "inline-response";

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}|\{%.*?%\}").expect("valid template tag pattern"));

/// String literals (kept verbatim) or a leading-dot field reference.
static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(?P<literal>"[^"]*"|'[^']*'|`[^`]*`)|(?P<before>^|[^\w.)\]'"`])\.(?P<field>[A-Za-z_])"#,
    )
    .expect("valid field reference pattern")
});

/// A template compiled once and rendered per request.
#[derive(Debug)]
pub struct ResponseTemplate {
    tera: Tera,
}

impl ResponseTemplate {
    /// Parse the template source.
    ///
    /// Only syntax is checked; unknown fields surface when rendering.
    pub fn compile(source: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, &strip_field_dots(source))?;
        Ok(Self { tera })
    }

    /// Evaluate the template against one request.
    pub fn render(&self, ctx: &RequestContext) -> Result<String, tera::Error> {
        let context = Context::from_serialize(ctx)?;
        self.tera.render(TEMPLATE_NAME, &context)
    }
}

/// Rewrite `.Field` references inside template tags to `Field`.
///
/// String literals inside a tag are left as written.
fn strip_field_dots(source: &str) -> String {
    TAG.replace_all(source, |tag: &Captures| {
        TAG_TOKEN
            .replace_all(&tag[0], |token: &Captures| match token.name("literal") {
                Some(literal) => literal.as_str().to_string(),
                None => format!("{}{}", &token["before"], &token["field"]),
            })
            .into_owned()
    })
    .into_owned()
}
