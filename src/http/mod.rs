//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing, timeout, request ID)
//!     → request.rs (assign / propagate x-request-id)
//!     → rules::dispatch (inline response, or forward)
//!     → forward.rs (upstream backend, or 404)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
