//! Rendered fragments and the final transformation outcome.

use serde::{Deserialize, Serialize};

use crate::model::SdkCall;
use crate::provider::Provider;
use crate::rule::Requirement;

/// A detected call paired with its fully rendered replacement fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedCall {
    /// The call this fragment replaces.
    pub call: SdkCall,
    /// Rendered code, one or more lines, no leading/trailing blank lines.
    pub code: String,
    /// Source line the fragment splices into (the call's original line).
    pub line: usize,
}

/// A non-fatal observation attached to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Human-readable message.
    pub message: String,
    /// Source line the warning refers to, when known.
    #[serde(default)]
    pub line: Option<usize>,
    /// Warning category (`info` for informational notices).
    pub category: String,
}

impl Warning {
    /// Informational warning with no source position.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            category: "info".to_string(),
        }
    }
}

/// Final result of transforming one source unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// Provider the code was rewritten for.
    pub provider: Provider,
    /// The rewritten source text.
    pub code: String,
    /// Distinct import lines added by applied rules, sorted.
    pub imports: Vec<String>,
    /// Package requirements collected from applied rules, deduplicated,
    /// first-seen order.
    pub requirements: Vec<Requirement>,
    /// Accumulated warnings.
    #[serde(default)]
    pub warnings: Vec<Warning>,
    /// Free-form metadata (`rewritten_calls` count and the like).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Outcome {
    /// Outcome that leaves the source untouched.
    #[must_use]
    pub fn unchanged(provider: Provider, source: impl Into<String>) -> Self {
        Self {
            provider,
            code: source.into(),
            imports: Vec::new(),
            requirements: Vec::new(),
            warnings: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }
}
