//! Typed argument values extracted from call sites.

use serde::{Deserialize, Serialize};

/// A typed value appearing as a call argument.
///
/// The probe script classifies each argument expression into one of these
/// shapes. Anything that is not a literal or a bare name (a list, a dict,
/// a nested call) arrives as `Opaque` carrying the raw source text of the
/// expression, which renders verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ArgValue {
    /// String literal.
    String(String),
    /// Integer or float literal.
    Number(serde_json::Number),
    /// Boolean literal.
    Bool(bool),
    /// Bare identifier - a variable reference, emitted unquoted.
    Ident(String),
    /// The `None` literal.
    Null,
    /// Raw source text of a non-literal expression, emitted verbatim.
    Opaque(String),
}

impl ArgValue {
    /// Format the value as a Python expression.
    ///
    /// Strings become single-quoted literals with `\`, `'`, and control
    /// characters escaped; numbers are emitted verbatim; booleans use the
    /// Python spelling; identifiers and opaque expressions pass through
    /// unchanged; `Null` becomes `None`.
    #[must_use]
    pub fn python_literal(&self) -> String {
        match self {
            Self::String(s) => quote_python(s),
            Self::Number(n) => n.to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Ident(name) | Self::Opaque(name) => name.clone(),
            Self::Null => "None".to_string(),
        }
    }
}

/// Single-quote a string for Python, escaping what would break the literal.
fn quote_python(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
