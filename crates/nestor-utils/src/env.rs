//! Environment variable helpers
//!
//! Configuration is read through [`EnvSource`] so tests can supply values
//! without touching the process environment.

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is unset or blank
    #[error("{0} environment variable not set")]
    Missing(String),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// A source of environment-style key/value pairs
pub trait EnvSource {
    /// Raw lookup, `None` when unset
    fn lookup(&self, name: &str) -> Option<String>;

    /// Lookup that treats blank values as unset
    fn var(&self, name: &str) -> Option<String> {
        self.lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Lookup that fails when the variable is missing
    fn require(&self, name: &str) -> Result<String, EnvError> {
        self.var(name).ok_or_else(|| EnvError::Missing(name.to_string()))
    }

    /// Parse an optional variable
    fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, EnvError> {
        match self.var(name) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| EnvError::Invalid {
                name: name.to_string(),
                value,
            }),
        }
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn lookup(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).map(|v| (*v).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> HashMap<&'static str, &'static str> {
        HashMap::from([("KEY", "value"), ("BLANK", "   "), ("NUM", "42"), ("BAD", "x")])
    }

    #[test]
    fn test_get_and_require() {
        let env = source();
        assert_eq!(env.var("KEY").as_deref(), Some("value"));
        assert_eq!(env.var("BLANK"), None);
        assert_eq!(
            env.require("MISSING"),
            Err(EnvError::Missing("MISSING".to_string()))
        );
    }

    #[test]
    fn test_parse() {
        let env = source();
        assert_eq!(env.parse::<u64>("NUM"), Ok(Some(42)));
        assert_eq!(env.parse::<u64>("MISSING"), Ok(None));
        assert!(env.parse::<u64>("BAD").is_err());
    }
}
