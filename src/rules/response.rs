//! Response body rendering.
//!
//! # Responsibilities
//! - Validate that a response names at most one body strategy
//! - Pre-compute everything that does not depend on the request
//!   (JSON serialization, template parsing)
//! - Produce the body for one request
//!
//! # Design Decisions
//! - Raw and JSON bodies are stored as `Bytes`; rendering is a refcount bump
//! - Templates see a [`RequestContext`] snapshot, never the native request

use axum::body::Bytes;
use axum::http::{HeaderValue, Request};
use serde_json::{Map, Value};

use crate::config::ResponseConfig;
use crate::rules::context::RequestContext;
use crate::rules::error::{error_chain, ConfigError, Location, RenderError};
use crate::rules::template::ResponseTemplate;

/// Compiled body strategy.
#[derive(Debug)]
pub enum Renderer {
    /// No body.
    Empty,
    /// Fixed text.
    Raw(Bytes),
    /// JSON document serialized at compile time.
    Json(Bytes),
    /// Template evaluated per request.
    Template(Box<ResponseTemplate>),
}

impl Renderer {
    /// Compile a response specification.
    ///
    /// Checked in order raw, template, json; `location` names the rule
    /// kind in error messages.
    pub fn compile(config: &ResponseConfig, location: Location) -> Result<Self, ConfigError> {
        if let Some(raw) = &config.raw {
            if config.template.is_some() {
                return Err(ConfigError::TemplateWithRaw(location));
            }
            if config.json.is_some() {
                return Err(ConfigError::JsonWithRaw(location));
            }
            return Ok(Renderer::Raw(Bytes::from(raw.clone())));
        }

        if let Some(source) = &config.template {
            if config.json.is_some() {
                return Err(ConfigError::JsonWithTemplate(location));
            }
            let template = ResponseTemplate::compile(source).map_err(|e| {
                ConfigError::InvalidTemplate {
                    location,
                    reason: error_chain(&e),
                }
            })?;
            return Ok(Renderer::Template(Box::new(template)));
        }

        if let Some(json) = &config.json {
            let text = canonical_json(json)
                .map_err(|source| ConfigError::InvalidJson { location, source })?;
            return Ok(Renderer::Json(Bytes::from(text)));
        }

        Ok(Renderer::Empty)
    }

    /// Produce the body for a request.
    pub fn render<B>(&self, req: &Request<B>) -> Result<Bytes, RenderError> {
        match self {
            Renderer::Empty => Ok(Bytes::new()),
            Renderer::Raw(body) | Renderer::Json(body) => Ok(body.clone()),
            Renderer::Template(template) => template
                .render(&RequestContext::from_request(req))
                .map(Bytes::from)
                .map_err(|e| RenderError::Template(error_chain(&e))),
        }
    }

    /// Content type of the rendered body, if there is one.
    pub fn content_type(&self) -> Option<HeaderValue> {
        match self {
            Renderer::Empty => None,
            Renderer::Raw(_) | Renderer::Template(_) => {
                Some(HeaderValue::from_static("text/plain; charset=utf-8"))
            }
            Renderer::Json(_) => Some(HeaderValue::from_static("application/json")),
        }
    }

    /// Short name of the body strategy, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Renderer::Empty => "empty",
            Renderer::Raw(_) => "raw",
            Renderer::Json(_) => "json",
            Renderer::Template(_) => "template",
        }
    }
}

/// Compact JSON with sorted keys, HTML-sensitive characters escaped and
/// integral floats written without a fraction.
fn canonical_json(doc: &Map<String, Value>) -> Result<String, serde_json::Error> {
    let mut doc = Value::Object(doc.clone());
    integral_floats(&mut doc);

    let text = serde_json::to_string(&doc)?;
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    Ok(escaped)
}

fn integral_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            let integral = n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64);
            if let Some(f) = integral {
                *value = Value::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats),
        Value::Object(fields) => fields.values_mut().for_each(integral_floats),
        _ => {}
    }
}
