//! The unified pipeline error.
//!
//! Every stage reports through `TransformError`; the first error anywhere
//! aborts the whole transformation and no partial output is returned.

use thiserror::Error;

use crate::provider::Language;

/// Result alias used throughout the pipeline.
pub type TransformResult<T> = Result<T, TransformError>;

/// Fatal transformation failure.
///
/// Variants carry the offending source position and snippet where the
/// failing stage has one, so user-visible reports can always name the
/// error kind, the position, and the original code.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The parser collaborator rejected the source.
    #[error("parse failure: {message}")]
    Parse {
        /// Parser message, surfaced verbatim.
        message: String,
        /// 1-based line of the syntax error, when reported.
        line: Option<usize>,
        /// 1-based column of the syntax error, when reported.
        column: Option<usize>,
        /// Offending source text, when reported.
        text: Option<String>,
    },

    /// The program model's language tag has no detection strategy.
    #[error("no detection strategy for language `{0}`")]
    UnsupportedLanguage(Language),

    /// The program model is structurally invalid.
    #[error("malformed program model: {0}")]
    MalformedModel(String),

    /// No rule is registered for a detected call's pattern.
    #[error("no rewrite rule for `{pattern}` (line {line}): {hint}")]
    RuleNotFound {
        /// The pattern that missed.
        pattern: String,
        /// Source line of the call.
        line: usize,
        /// Original source snippet of the call.
        snippet: String,
        /// Remediation hint.
        hint: String,
    },

    /// A rule references an argument the call did not supply.
    #[error("missing parameter `{name}` on `{function}` (line {line}): {hint}")]
    MissingParameter {
        /// Name of the missing parameter.
        name: String,
        /// Function the call invokes.
        function: String,
        /// Source line of the call.
        line: usize,
        /// Original source snippet of the call.
        snippet: String,
        /// Remediation hint.
        hint: String,
    },

    /// A rule's template failed to render.
    #[error("template for `{pattern}` failed to render: {message}")]
    TemplateRender {
        /// Pattern of the offending rule.
        pattern: String,
        /// Raw render engine message.
        message: String,
    },

    /// The rewritten source failed the external syntax check.
    #[error("rewritten source failed syntax validation: {message}")]
    Validation {
        /// Checker message.
        message: String,
        /// The offending rewritten text.
        code: String,
    },

    /// A collaborator subprocess could not be run, or timed out.
    #[error("collaborator `{name}` failed: {message}")]
    Collaborator {
        /// Collaborator name (`parser`, `validator`).
        name: String,
        /// Failure description.
        message: String,
    },
}

impl TransformError {
    /// Source line the error refers to, when available.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => *line,
            Self::RuleNotFound { line, .. } | Self::MissingParameter { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Offending source text, when available.
    #[must_use]
    pub fn snippet(&self) -> Option<&str> {
        match self {
            Self::Parse { text, .. } => text.as_deref(),
            Self::RuleNotFound { snippet, .. } | Self::MissingParameter { snippet, .. } => {
                Some(snippet)
            }
            Self::Validation { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Short kind tag for reports and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::UnsupportedLanguage(_) => "unsupported-language",
            Self::MalformedModel(_) => "malformed-model",
            Self::RuleNotFound { .. } => "rule-not-found",
            Self::MissingParameter { .. } => "missing-parameter",
            Self::TemplateRender { .. } => "template-render",
            Self::Validation { .. } => "validation",
            Self::Collaborator { .. } => "collaborator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_not_found_names_pattern_and_line() {
        let err = TransformError::RuleNotFound {
            pattern: "skylift.storage.upload".into(),
            line: 7,
            snippet: "upload(bucket='b')".into(),
            hint: "verify a rule is loaded for this pattern".into(),
        };
        let text = err.to_string();
        assert!(text.contains("skylift.storage.upload"));
        assert!(text.contains("line 7"));
        assert_eq!(err.line(), Some(7));
        assert_eq!(err.kind(), "rule-not-found");
    }

    #[test]
    fn validation_error_exposes_offending_code() {
        let err = TransformError::Validation {
            message: "SyntaxError: invalid syntax".into(),
            code: "def broken(:".into(),
        };
        assert_eq!(err.snippet(), Some("def broken(:"));
    }
}
