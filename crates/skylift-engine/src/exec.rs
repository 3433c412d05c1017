//! Subprocess execution for the external collaborators.
//!
//! One-shot invocations: stdin piped in, stdout/stderr captured, the
//! whole run bounded by a caller-specified timeout. No process handle
//! outlives a single call; on timeout the child is killed.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use skylift_types::TransformError;

/// Captured result of a finished subprocess.
pub(crate) struct ExecOutput {
    /// Process exit code, if the process exited normally.
    pub status: Option<i32>,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
}

impl ExecOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Subprocess failure, before any output could be interpreted.
#[derive(Debug, Error)]
pub(crate) enum ExecError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to run `{program}`: {source}")]
    Run {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}

impl ExecError {
    /// Wrap into the pipeline error, tagged with the collaborator name.
    pub fn into_collaborator(self, name: &str) -> TransformError {
        TransformError::Collaborator {
            name: name.to_string(),
            message: self.to_string(),
        }
    }
}

/// Run a program with input on stdin, capturing output, within a timeout.
pub(crate) async fn run_with_stdin(
    program: &Path,
    args: &[&str],
    input: &str,
    timeout: Duration,
) -> Result<ExecOutput, ExecError> {
    let display = program.display().to_string();

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: display.clone(),
            source,
        })?;

    let input = input.as_bytes().to_vec();
    let run = async {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&input).await?;
            drop(stdin);
        }
        child.wait_with_output().await
    };

    match tokio::time::timeout(timeout, run).await {
        Err(_) => Err(ExecError::Timeout {
            program: display,
            timeout,
        }),
        Ok(Err(source)) => Err(ExecError::Run {
            program: display,
            source,
        }),
        Ok(Ok(output)) => Ok(ExecOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
    }
}

/// Locate the Python executable the collaborators run on.
///
/// An explicit override wins; otherwise `python3` then `python` from
/// `PATH`.
pub(crate) fn find_python(explicit: Option<&Path>) -> Result<PathBuf, TransformError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    for candidate in ["python3", "python"] {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    Err(TransformError::Collaborator {
        name: "python".to_string(),
        message: "no Python executable found (tried python3, python)".to_string(),
    })
}
