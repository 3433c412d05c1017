//! Error types for rule storage and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Registry lookup failure.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// No rule is registered for the requested pattern string.
    #[error("no rule registered for pattern `{0}`")]
    NotFound(String),
}

/// Rule-file loading failure.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The expected rules file does not exist.
    #[error("rules file not found: {0}")]
    Missing(PathBuf),

    /// Reading the rules directory or file failed.
    #[error("failed to read rules: {0}")]
    Io(#[from] std::io::Error),

    /// The rules file is not valid YAML for the expected schema.
    #[error("failed to parse rules file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
