//! Downstream handlers for requests no rule answers.
//!
//! # Responsibilities
//! - Forward the request to the configured upstream backend
//! - Map upstream failures to 502 Bad Gateway
//! - Answer 404 when no upstream is configured

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::request_id;

/// State of the upstream forwarder.
#[derive(Clone)]
pub struct ForwardState {
    pub client: Client<HttpConnector, Body>,
    pub authority: Authority,
}

impl ForwardState {
    /// Create a forwarder for the upstream at `authority`.
    pub fn new(authority: Authority, connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, authority }
    }
}

/// Forward a request to the upstream backend.
pub async fn forward_handler(State(state): State<ForwardState>, request: Request) -> Response {
    let request_id = request_id(&request).to_string();
    let (mut parts, body) = request.into_parts();

    // URI rewrite
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        uri = %parts.uri,
        "Forwarding request upstream"
    );

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => upstream_response(response),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Handler used when no upstream is configured.
pub async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, "No matching rule found").into_response()
}

fn upstream_response(response: hyper::Response<Incoming>) -> Response {
    response.map(Body::new)
}
