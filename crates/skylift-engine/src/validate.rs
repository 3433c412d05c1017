//! The syntax-validator collaborator seam and its Python implementation.
//!
//! Validation happens after rewriting: the rewritten text is handed to
//! the target language's own syntax checker. A failure is reported as-is
//! and never repaired.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use skylift_types::{TransformError, TransformResult};

use crate::exec::run_with_stdin;

/// Inline checker: compiles stdin and reports syntax errors on stderr.
const CHECK_SCRIPT: &str = "\
import sys
try:
    compile(sys.stdin.read(), '<rewritten>', 'exec')
except SyntaxError as exc:
    print('SyntaxError: %s' % exc, file=sys.stderr)
    sys.exit(1)
";

/// Checks that rewritten source is syntactically valid.
#[async_trait]
pub trait SyntaxValidator: Send + Sync {
    /// Validate one rewritten source unit.
    ///
    /// # Errors
    ///
    /// `TransformError::Validation` carrying the checker's message and
    /// the offending text; `TransformError::Collaborator` when the
    /// checker cannot run or times out.
    async fn validate(&self, source: &str) -> TransformResult<()>;
}

/// Validates Python syntax through a `compile()` subprocess.
#[derive(Debug, Clone)]
pub struct PythonValidator {
    python: PathBuf,
    timeout: Duration,
}

impl PythonValidator {
    /// Validator running on the given Python executable, bounded by the
    /// given timeout per invocation.
    #[must_use]
    pub fn new(python: PathBuf, timeout: Duration) -> Self {
        Self { python, timeout }
    }
}

#[async_trait]
impl SyntaxValidator for PythonValidator {
    async fn validate(&self, source: &str) -> TransformResult<()> {
        let output = run_with_stdin(&self.python, &["-c", CHECK_SCRIPT], source, self.timeout)
            .await
            .map_err(|err| err.into_collaborator("validator"))?;

        if output.success() {
            return Ok(());
        }

        let message = if output.stderr.trim().is_empty() {
            format!("syntax check exited with status {:?}", output.status)
        } else {
            output.stderr.trim().to_string()
        };
        Err(TransformError::Validation {
            message,
            code: source.to_string(),
        })
    }
}
