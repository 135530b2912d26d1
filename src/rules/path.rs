//! Request path matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive and never normalizes the path
//! - Exactly one mode per matcher, fixed when the rule set is compiled
//! - Regex patterns are compiled once and searched unanchored

use regex::Regex;

use crate::config::PathConfig;
use crate::rules::error::ConfigError;

/// Compiled path predicate.
#[derive(Debug, Clone)]
pub enum PathMatcher {
    /// Path equals the string exactly.
    Absolute(String),
    /// Path starts with the string.
    Prefix(String),
    /// Pattern is found anywhere in the path.
    Regex(Regex),
}

impl PathMatcher {
    /// Compile a path specification.
    ///
    /// An absolute path excludes the other two fields, a prefix excludes a
    /// regex, and at least one must be set.
    pub fn compile(config: &PathConfig) -> Result<Self, ConfigError> {
        match (&config.abs, &config.prefix, &config.regex) {
            (Some(_), Some(_), _) => Err(ConfigError::PrefixWithAbsolutePath),
            (Some(_), None, Some(_)) => Err(ConfigError::RegexWithAbsolutePath),
            (Some(abs), None, None) => Ok(PathMatcher::Absolute(abs.clone())),
            (None, Some(_), Some(_)) => Err(ConfigError::RegexWithPathPrefix),
            (None, Some(prefix), None) => Ok(PathMatcher::Prefix(prefix.clone())),
            (None, None, Some(pattern)) => Regex::new(pattern)
                .map(PathMatcher::Regex)
                .map_err(ConfigError::InvalidRegex),
            (None, None, None) => Err(ConfigError::MissingPath),
        }
    }

    /// Returns true if the request path satisfies this predicate.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Absolute(abs) => path == abs,
            PathMatcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathMatcher::Regex(regex) => regex.is_match(path),
        }
    }

    /// Short name of the matching mode, for logs.
    pub fn mode(&self) -> &'static str {
        match self {
            PathMatcher::Absolute(_) => "abs",
            PathMatcher::Prefix(_) => "prefix",
            PathMatcher::Regex(_) => "regex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(abs: Option<&str>, prefix: Option<&str>, regex: Option<&str>) -> PathConfig {
        PathConfig {
            abs: abs.map(String::from),
            prefix: prefix.map(String::from),
            regex: regex.map(String::from),
        }
    }

    #[test]
    fn test_absolute_matcher() {
        let matcher = PathMatcher::compile(&path(Some("/foo1"), None, None)).unwrap();
        assert_eq!(matcher.mode(), "abs");

        assert!(matcher.matches("/foo1"));
        assert!(!matcher.matches("/foo10"));
        assert!(!matcher.matches("/Foo1")); // Case sensitive
        assert!(!matcher.matches("/foo1/"));
    }

    #[test]
    fn test_prefix_matcher() {
        let matcher = PathMatcher::compile(&path(None, Some("/foobar"), None)).unwrap();

        assert!(matcher.matches("/foobar123"));
        assert!(matcher.matches("/foobar/rand"));
        assert!(matcher.matches("/foobar"));
        assert!(!matcher.matches("/foo"));
        assert!(!matcher.matches("/FOOBAR"));
    }

    #[test]
    fn test_regex_matcher() {
        let matcher = PathMatcher::compile(&path(None, None, Some("^.*/foo/bar/.*$"))).unwrap();

        assert!(matcher.matches("/foo/bar/"));
        assert!(matcher.matches("/abc/foo/bar/def"));
        assert!(matcher.matches("/xyz/foo/bar/"));
        assert!(!matcher.matches("/foo/bar"));
    }

    #[test]
    fn test_regex_is_unanchored() {
        let matcher = PathMatcher::compile(&path(None, None, Some("bar"))).unwrap();
        assert!(matcher.matches("/foo/bar/baz"));
        assert!(!matcher.matches("/foo/baz"));
    }

    #[test]
    fn test_exclusivity_order() {
        let err = PathMatcher::compile(&path(Some("/a"), Some("/b"), Some("c"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot specify path prefix when absolute path is specified"
        );

        let err = PathMatcher::compile(&path(Some("/a"), None, Some("c"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot specify path regex when absolute path is specified"
        );

        let err = PathMatcher::compile(&path(None, Some("/b"), Some("c"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot specify path regex when path prefix is specified"
        );
    }

    #[test]
    fn test_missing_path() {
        let err = PathMatcher::compile(&PathConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "at least one of absolute path, path prefix or path regex must be specified"
        );
    }

    #[test]
    fn test_invalid_regex() {
        let err = PathMatcher::compile(&path(None, None, Some("*"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex(_)));
        assert!(err
            .to_string()
            .starts_with("invalid regex in matcher path, reason: regex parse error"));
    }
}
