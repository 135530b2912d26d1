//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/YAML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → ServerConfig (plain declarative structure)
//!     → rules::RuleSet::compile (semantic checks, compiled once)
//!     → shared via Arc with the dispatcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Deserialization checks syntax only; rule validation happens in the
//!   rule compiler so the same checks apply to configs built in code

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, Format, LoadError};
pub use schema::ServerConfig;
pub use schema::ListenerConfig;
pub use schema::UpstreamConfig;
pub use schema::TimeoutConfig;
pub use schema::ObservabilityConfig;
pub use schema::{FallbackConfig, MatcherConfig, PathConfig, ResponseConfig, RuleSetConfig};
