//! Per-request rule evaluation.
//!
//! # Responsibilities
//! - Walk matchers in declaration order; the first match answers
//! - Answer with the fallback when nothing matches
//! - Otherwise hand the request, untouched, to the downstream handler
//! - Turn render failures into 500 responses
//!
//! # Design Decisions
//! - The body is fully rendered before the status line is produced, so a
//!   failing template never leaks a success status
//! - A render failure ends the request; later rules and downstream are not
//!   consulted

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::config::RuleSetConfig;
use crate::http::request::request_id;
use crate::rules::compiler::{Responder, RuleSet};
use crate::rules::context::decoded_path;
use crate::rules::error::{ConfigError, RenderError};

/// Compile `config` and put the resulting rule set in front of `downstream`.
///
/// Requests no rule answers reach `downstream` unchanged.
pub fn inline_response(config: &RuleSetConfig, downstream: Router) -> Result<Router, ConfigError> {
    let rules = Arc::new(RuleSet::compile(config)?);
    Ok(downstream.layer(middleware::from_fn_with_state(rules, inline_response_middleware)))
}

/// Middleware answering requests from the rule set.
pub async fn inline_response_middleware(
    State(rules): State<Arc<RuleSet>>,
    req: Request,
    next: Next,
) -> Response {
    match rules.respond(&req) {
        Some(response) => response,
        None => {
            tracing::debug!(
                request_id = %request_id(&req),
                path = %req.uri().path(),
                "No inline response rule matched, forwarding downstream"
            );
            next.run(req).await
        }
    }
}

impl RuleSet {
    /// Evaluate the rule set for a request.
    ///
    /// Returns `None` when the request should go downstream.
    pub fn respond<B>(&self, req: &axum::http::Request<B>) -> Option<Response> {
        let path = decoded_path(req.uri());

        let (rule, responder) = match self.matchers().iter().position(|m| m.path.matches(&path)) {
            Some(index) => (format!("matcher[{}]", index), &self.matchers()[index].responder),
            None => ("fallback".to_string(), self.fallback()?),
        };

        let response = match render(responder, req) {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id(req),
                    path = %path,
                    rule = %rule,
                    status = responder.status.as_u16(),
                    body = responder.renderer.kind(),
                    "Inline response"
                );
                response
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id(req),
                    path = %path,
                    rule = %rule,
                    error = %e,
                    "Failed to render inline response"
                );
                error_response(&e)
            }
        };

        Some(response)
    }
}

fn render<B>(responder: &Responder, req: &axum::http::Request<B>) -> Result<Response, RenderError> {
    let body = responder.renderer.render(req)?;

    let mut builder = axum::http::Response::builder().status(responder.status);
    if let Some(content_type) = responder.renderer.content_type() {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(body))
        .map_err(|e| RenderError::Internal(format!("invalid response head: {}", e)))
}

fn error_response(err: &RenderError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        format!("failed while writing the response, reason: {}\n", err),
    )
        .into_response()
}
