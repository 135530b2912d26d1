//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile the rule set before accepting any connection
//! - Create the Axum Router: downstream handler behind the inline
//!   response middleware
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use std::str::FromStr;
use std::time::Duration;

use axum::{http::uri::Authority, routing::any, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::forward::{forward_handler, not_found_handler, ForwardState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::rules::{inline_response, ConfigError};

/// Error building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Rules(#[from] ConfigError),

    #[error("invalid upstream address {address}: {reason}")]
    InvalidUpstream { address: String, reason: String },
}

/// HTTP server answering from the rule set.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the rule set does not compile.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let downstream = Self::downstream(&config)?;
        let router = Self::build_router(&config, downstream)?;
        Ok(Self { router })
    }

    fn downstream(config: &ServerConfig) -> Result<Router, ServerError> {
        let Some(address) = &config.upstream.address else {
            tracing::info!("No upstream configured, unmatched requests get 404");
            return Ok(Router::new().fallback(not_found_handler));
        };

        let authority =
            Authority::from_str(address).map_err(|e| ServerError::InvalidUpstream {
                address: address.clone(),
                reason: e.to_string(),
            })?;
        tracing::info!(upstream = %authority, "Unmatched requests forwarded upstream");

        let state = ForwardState::new(
            authority,
            Duration::from_secs(config.timeouts.connect_secs),
        );
        Ok(Router::new()
            .route("/", any(forward_handler))
            .route("/{*path}", any(forward_handler))
            .with_state(state))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, downstream: Router) -> Result<Router, ServerError> {
        Ok(inline_response(&config.rules, downstream)?
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer()))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
