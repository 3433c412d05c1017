//! Provider and language tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target cloud provider a rule set produces code for.
///
/// A rule registry instance is scoped to exactly one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Amazon Web Services.
    Aws,
    /// Google Cloud Platform.
    Gcp,
    /// Microsoft Azure.
    Azure,
}

impl Provider {
    /// Canonical lowercase name, as used in rule-file directory layouts.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a provider name is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unknown provider `{0}` (expected aws, gcp, or azure)")]
pub struct ParseProviderError(pub String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            "azure" => Ok(Self::Azure),
            other => Err(ParseProviderError(other.to_string())),
        }
    }
}

/// Source language of the program being rewritten.
///
/// Only Python currently has a detection strategy; the detector rejects
/// every other tag with `TransformError::UnsupportedLanguage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python 3.x sources.
    Python,
    /// Node.js sources (no detection strategy yet).
    NodeJs,
    /// Go sources (no detection strategy yet).
    Go,
}

impl Language {
    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::NodeJs => "nodejs",
            Self::Go => "go",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a language name is not recognized.
#[derive(Debug, Clone, Error)]
#[error("unknown language `{0}` (expected python, nodejs, or go)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Self::Python),
            "nodejs" => Ok(Self::NodeJs),
            "go" => Ok(Self::Go),
            other => Err(ParseLanguageError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_round_trips_through_str() {
        for p in [Provider::Aws, Provider::Gcp, Provider::Azure] {
            assert_eq!(p.as_str().parse::<Provider>().ok(), Some(p));
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = "digitalocean".parse::<Provider>().unwrap_err();
        assert!(err.to_string().contains("digitalocean"));
    }

    #[test]
    fn language_serde_uses_lowercase() {
        let json = serde_json::to_string(&Language::Python).expect("serialize");
        assert_eq!(json, "\"python\"");
    }
}
