//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server
//! and the declarative rule set it compiles at startup.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration for the inline response server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream backend receiving requests no rule answers.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Inline response rules.
    pub rules: RuleSetConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Downstream backend configuration.
///
/// When no address is set, unmatched requests get a plain 404.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: Option<String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Declarative rule set: ordered matchers plus an optional fallback.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Matchers, evaluated in declaration order.
    pub matchers: Vec<MatcherConfig>,

    /// Response used when no matcher applies.
    pub fallback: Option<FallbackConfig>,

    /// Log the received rule set when it is compiled.
    pub debug: bool,
}

/// A single path rule.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MatcherConfig {
    pub path: PathConfig,
    pub status_code: Option<u16>,
    pub response: ResponseConfig,
}

/// Path predicate. Exactly one field must be set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Exact path.
    pub abs: Option<String>,

    /// Path prefix.
    pub prefix: Option<String>,

    /// Regular expression searched anywhere in the path.
    pub regex: Option<String>,
}

/// Rule applied when no matcher matches.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackConfig {
    pub status_code: Option<u16>,
    pub response: ResponseConfig,
}

/// Response body specification. At most one field may be set; none means
/// an empty body.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResponseConfig {
    /// Fixed text.
    pub raw: Option<String>,

    /// Template rendered against the request.
    pub template: Option<String>,

    /// Structured document serialized as JSON.
    pub json: Option<Map<String, Value>>,
}
