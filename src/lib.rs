//! Inline response library: answer HTTP requests from an ordered list of
//! path rules, or hand them to a downstream handler.

pub mod config;
pub mod http;
pub mod rules;
pub mod lifecycle;
pub mod observability;

pub use config::schema::{RuleSetConfig, ServerConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rules::{inline_response, ConfigError, RenderError, RuleSet};
