//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (rule compilation, inline responses, forwards)
//!     → tower-http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stdout)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events

pub mod logging;
