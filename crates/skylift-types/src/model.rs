//! The program model delivered by the parser collaborator, and the
//! detected SDK calls derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::Language;
use crate::value::ArgValue;

/// One import declaration in the source program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    /// Dotted module path (`skylift.storage`).
    pub module: String,
    /// Imported names. For `import a.b` this is the single entry `a.b`;
    /// for `from a.b import x, y` it is `[x, y]`; `*` marks a wildcard.
    pub names: Vec<String>,
    /// Local alias from an `as` clause, when present.
    #[serde(default)]
    pub alias: Option<String>,
    /// 1-based source line of the declaration.
    pub line: usize,
}

/// One call expression in the source program, before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    /// Dotted qualifying path (`storage` in `storage.upload(...)`), absent
    /// for bare calls.
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Called function name.
    pub function: String,
    /// Named arguments with their typed values. Positional arguments are
    /// keyed `arg_0`, `arg_1`, ... by the probe.
    #[serde(default)]
    pub args: BTreeMap<String, ArgValue>,
    /// 1-based source line of the call.
    pub line: usize,
    /// 0-based column offset of the call expression.
    #[serde(default)]
    pub column: usize,
    /// The call's source line, trimmed.
    #[serde(default)]
    pub snippet: String,
}

/// Structured view of one parsed source unit: ordered imports, ordered
/// call sites, and the original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramModel {
    /// Source language tag.
    pub language: Language,
    /// Import declarations in source order.
    pub imports: Vec<ImportDecl>,
    /// Call sites in source order.
    pub calls: Vec<CallSite>,
    /// The source text the model was built from, byte-for-byte.
    pub source: String,
}

/// A call into the agnostic namespace, resolved to its true module path.
///
/// Immutable once constructed; the detector is the only producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkCall {
    module: String,
    function: String,
    args: BTreeMap<String, ArgValue>,
    line: usize,
    column: usize,
    snippet: String,
}

impl SdkCall {
    /// Build a resolved call.
    #[must_use]
    pub fn new(
        module: impl Into<String>,
        function: impl Into<String>,
        args: BTreeMap<String, ArgValue>,
        line: usize,
        column: usize,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            args,
            line,
            column,
            snippet: snippet.into(),
        }
    }

    /// Resolved module path (`skylift.storage`).
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Called function name.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Named arguments with their typed values.
    #[must_use]
    pub fn args(&self) -> &BTreeMap<String, ArgValue> {
        &self.args
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based column offset.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Original source line, trimmed.
    #[must_use]
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// The fully qualified rule pattern this call matches against
    /// (`module.function`).
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("{}.{}", self.module, self.function)
    }
}
