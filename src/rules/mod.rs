//! Inline response rule engine.
//!
//! # Data Flow
//! ```text
//! Rule compilation (at startup):
//!     RuleSetConfig
//!     → compiler.rs (status codes, exclusivity checks)
//!     → path.rs (abs / prefix / regex predicates)
//!     → response.rs + template.rs (empty / raw / json / template bodies)
//!     → Freeze as immutable RuleSet behind Arc
//!
//! Incoming request (path, method, headers):
//!     → dispatch.rs (first matching matcher, else fallback)
//!     → response.rs (render body, context.rs snapshot for templates)
//!     → Return: inline response, 500 on render failure,
//!       or forward downstream when nothing applies
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: first match in declaration order wins
//! - Config errors are fatal; render errors only fail the one request

pub mod compiler;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod path;
pub mod response;
pub mod template;

pub use compiler::{Matcher, Responder, RuleSet};
pub use context::RequestContext;
pub use dispatch::{inline_response, inline_response_middleware};
pub use error::{ConfigError, Location, RenderError};
pub use path::PathMatcher;
pub use response::Renderer;
