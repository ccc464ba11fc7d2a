//! Compiler configuration.

use std::fmt;

/// What the Result Reshaper does with a list element that is not a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MalformedElementPolicy {
    /// Drop the element and log a warning (default).
    #[default]
    Skip,
    /// Fail the whole reshape.
    Fail,
}

impl fmt::Display for MalformedElementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

impl std::str::FromStr for MalformedElementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Errors from [`Config::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Maximum selection depth must be greater than zero.
    ZeroMaxDepth,
    /// Unrecognized reshape policy name.
    UnknownPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxDepth => write!(f, "max_depth must be greater than zero"),
            Self::UnknownPolicy(name) => {
                write!(f, "unknown reshape policy '{name}' (expected 'skip' or 'fail')")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Compiler configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Compile scalar override fragments into `CALL { ... }` subqueries
    /// instead of inlining them as renamed match clauses.
    pub subquery_calls: bool,

    /// Handling of malformed list elements in Gremlin responses.
    pub reshape_policy: MalformedElementPolicy,

    /// Rewrite a leading `MATCH` of a nested override fragment to
    /// `OPTIONAL MATCH`, so an empty fragment result keeps the parent row.
    pub optional_override_matches: bool,

    /// Maximum selection nesting depth.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subquery_calls: false,
            reshape_policy: MalformedElementPolicy::default(),
            optional_override_matches: true,
            max_depth: 32,
        }
    }
}

impl Config {
    /// Enables `CALL { ... }` subqueries for override fragments.
    #[must_use]
    pub fn with_subquery_calls(mut self) -> Self {
        self.subquery_calls = true;
        self
    }

    /// Sets the reshape policy.
    #[must_use]
    pub fn with_reshape_policy(mut self, policy: MalformedElementPolicy) -> Self {
        self.reshape_policy = policy;
        self
    }

    /// Keeps override fragment `MATCH` clauses as written.
    #[must_use]
    pub fn without_optional_override_matches(mut self) -> Self {
        self.optional_override_matches = false;
        self
    }

    /// Sets the maximum selection depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Validates the configuration.
    ///
    /// Called by [`Compiler::new()`](crate::Compiler::new).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any setting is invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        Ok(())
    }
}
