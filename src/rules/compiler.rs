//! Rule set compilation.
//!
//! # Responsibilities
//! - Validate the declarative rule set
//! - Compile path predicates and body strategies once
//! - Freeze the result as an immutable [`RuleSet`]
//!
//! # Design Decisions
//! - Stops at the first invalid rule; no partial rule set is ever built
//! - Immutable after construction (thread-safe without locks)

use axum::http::StatusCode;

use crate::config::{FallbackConfig, MatcherConfig, RuleSetConfig};
use crate::rules::error::{ConfigError, Location};
use crate::rules::path::PathMatcher;
use crate::rules::response::Renderer;

/// Status code and body strategy of a produced response.
#[derive(Debug)]
pub struct Responder {
    pub status: StatusCode,
    pub renderer: Renderer,
}

/// A compiled path rule.
#[derive(Debug)]
pub struct Matcher {
    pub path: PathMatcher,
    pub responder: Responder,
}

/// Compiled, immutable rule set.
#[derive(Debug, Default)]
pub struct RuleSet {
    matchers: Vec<Matcher>,
    fallback: Option<Responder>,
}

impl RuleSet {
    /// Validate and compile a declarative rule set.
    pub fn compile(config: &RuleSetConfig) -> Result<Self, ConfigError> {
        if config.debug {
            match serde_json::to_string_pretty(config) {
                Ok(dump) => tracing::info!("received rule set = {}", dump),
                Err(e) => tracing::warn!(error = %e, "Failed to dump rule set"),
            }
        }

        let matchers = config
            .matchers
            .iter()
            .map(compile_matcher)
            .collect::<Result<Vec<_>, _>>()?;
        let fallback = config.fallback.as_ref().map(compile_fallback).transpose()?;

        tracing::debug!(
            matchers = matchers.len(),
            fallback = fallback.is_some(),
            "Rule set compiled"
        );

        Ok(Self { matchers, fallback })
    }

    /// Matchers in evaluation order.
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn fallback(&self) -> Option<&Responder> {
        self.fallback.as_ref()
    }
}

fn compile_matcher(config: &MatcherConfig) -> Result<Matcher, ConfigError> {
    let status = status_code(config.status_code, Location::Matcher)?;
    let path = PathMatcher::compile(&config.path)?;
    let renderer = Renderer::compile(&config.response, Location::Matcher)?;

    Ok(Matcher {
        path,
        responder: Responder { status, renderer },
    })
}

fn compile_fallback(config: &FallbackConfig) -> Result<Responder, ConfigError> {
    let status = status_code(config.status_code, Location::Fallback)?;
    let renderer = Renderer::compile(&config.response, Location::Fallback)?;

    Ok(Responder { status, renderer })
}

fn status_code(code: Option<u16>, location: Location) -> Result<StatusCode, ConfigError> {
    let code = code.ok_or(ConfigError::MissingStatusCode(location))?;
    StatusCode::from_u16(code).map_err(|_| ConfigError::InvalidStatusCode { code, location })
}
