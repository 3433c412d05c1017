//! The parser collaborator seam and its Python implementation.
//!
//! Parsing is external to the core: the engine only consumes a
//! `ProgramModel`. `PythonParser` obtains one by piping the source to an
//! embedded stdlib-`ast` probe script and decoding its JSON report.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use skylift_types::{
    CallSite, ImportDecl, Language, ProgramModel, TransformError, TransformResult,
};

use crate::exec::run_with_stdin;

const PROBE_SCRIPT: &str = include_str!("../scripts/probe.py");

/// Produces a structured program model from raw source text.
///
/// Implementations are blocking, potentially slow external operations;
/// they must respect the timeout they were configured with and report
/// failures as structured errors, never as partial models.
#[async_trait]
pub trait SourceParser: Send + Sync {
    /// Language this parser understands.
    fn language(&self) -> Language;

    /// Parse one source unit.
    ///
    /// # Errors
    ///
    /// `TransformError::Parse` for malformed source (with the parser's
    /// position report), `TransformError::Collaborator` when the parser
    /// itself cannot run or times out.
    async fn parse(&self, source: &str) -> TransformResult<ProgramModel>;
}

/// JSON report emitted by the probe script.
#[derive(Debug, Deserialize)]
struct ProbeReport {
    ok: bool,
    #[serde(default)]
    imports: Vec<ImportDecl>,
    #[serde(default)]
    calls: Vec<CallSite>,
    #[serde(default)]
    error: Option<ProbeError>,
}

/// Structured syntax-error report from the probe.
#[derive(Debug, Deserialize)]
struct ProbeError {
    message: String,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    column: Option<usize>,
    #[serde(default)]
    text: Option<String>,
}

/// Parses Python source through the embedded `ast` probe subprocess.
#[derive(Debug, Clone)]
pub struct PythonParser {
    python: PathBuf,
    timeout: Duration,
}

impl PythonParser {
    /// Parser running on the given Python executable, bounded by the
    /// given timeout per invocation.
    #[must_use]
    pub fn new(python: PathBuf, timeout: Duration) -> Self {
        Self { python, timeout }
    }
}

#[async_trait]
impl SourceParser for PythonParser {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn parse(&self, source: &str) -> TransformResult<ProgramModel> {
        let output = run_with_stdin(&self.python, &["-c", PROBE_SCRIPT], source, self.timeout)
            .await
            .map_err(|err| err.into_collaborator("parser"))?;

        if !output.success() {
            return Err(TransformError::Collaborator {
                name: "parser".to_string(),
                message: format!(
                    "probe exited with status {:?}: {}",
                    output.status,
                    output.stderr.trim()
                ),
            });
        }

        let report: ProbeReport =
            serde_json::from_str(&output.stdout).map_err(|err| TransformError::Collaborator {
                name: "parser".to_string(),
                message: format!("unreadable probe report: {err}"),
            })?;

        if !report.ok {
            let error = report.error.unwrap_or(ProbeError {
                message: "unknown parse error".to_string(),
                line: None,
                column: None,
                text: None,
            });
            return Err(TransformError::Parse {
                message: error.message,
                line: error.line,
                column: error.column,
                text: error.text,
            });
        }

        tracing::debug!(
            imports = report.imports.len(),
            calls = report.calls.len(),
            "parsed source"
        );
        Ok(ProgramModel {
            language: Language::Python,
            imports: report.imports,
            calls: report.calls,
            source: source.to_string(),
        })
    }
}
