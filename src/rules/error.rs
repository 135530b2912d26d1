//! Compile-time and request-time errors of the rule engine.

use std::fmt;

use thiserror::Error;

/// Where a response specification sits in the rule set.
///
/// Used to parameterize configuration error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Matcher,
    Fallback,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Matcher => write!(f, "matcher"),
            Location::Fallback => write!(f, "fallback"),
        }
    }
}

/// Error raised while compiling a rule set.
///
/// Always fatal: a rule set that fails to compile is never served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("must specify a status code in the {0}")]
    MissingStatusCode(Location),

    #[error("invalid status code {code} in the {location}")]
    InvalidStatusCode { code: u16, location: Location },

    #[error("at least one of absolute path, path prefix or path regex must be specified")]
    MissingPath,

    #[error("cannot specify path prefix when absolute path is specified")]
    PrefixWithAbsolutePath,

    #[error("cannot specify path regex when absolute path is specified")]
    RegexWithAbsolutePath,

    #[error("cannot specify path regex when path prefix is specified")]
    RegexWithPathPrefix,

    #[error("invalid regex in matcher path, reason: {0}")]
    InvalidRegex(#[source] regex::Error),

    #[error("cannot specify template in {0} response when raw is specified")]
    TemplateWithRaw(Location),

    #[error("cannot specify json in {0} response when raw is specified")]
    JsonWithRaw(Location),

    #[error("cannot specify json in {0} response when template is specified")]
    JsonWithTemplate(Location),

    #[error("invalid template in {location} response, reason: {reason}")]
    InvalidTemplate { location: Location, reason: String },

    #[error("invalid JSON in {location} response, reason: {source}")]
    InvalidJson {
        location: Location,
        #[source]
        source: serde_json::Error,
    },
}

/// Error raised while producing a response for one request.
///
/// Turned into a 500 response; the rule set keeps serving.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template evaluation failed.
    #[error("{0}")]
    Template(String),

    /// The compiled rule set is in a state it should never reach.
    #[error("{0}, indicating a bug in the inline response middleware")]
    Internal(String),
}

/// Render an error and all of its sources on one line.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
