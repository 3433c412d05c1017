//! Tests for the real Python collaborators.
//!
//! Each test skips itself when no Python interpreter is on `PATH`, so
//! the suite stays green on bare build machines.

use std::path::PathBuf;
use std::time::Duration;

use skylift_engine::{PythonParser, PythonValidator, SourceParser, SyntaxValidator};
use skylift_types::{ArgValue, TransformError};

fn python() -> Option<PathBuf> {
    ["python3", "python"]
        .iter()
        .find_map(|candidate| which::which(candidate).ok())
}

const TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::test]
async fn probe_reports_imports_and_calls() {
    let Some(python) = python() else {
        eprintln!("skipping: no python on PATH");
        return;
    };
    let parser = PythonParser::new(python, TIMEOUT);

    let source = "\
from skylift.storage import upload
import os

upload(bucket='b', size=3, fast=True, target=dest, extra=None)
os.getcwd()
";
    let model = parser.parse(source).await.expect("parse");

    assert_eq!(model.imports.len(), 2);
    assert_eq!(model.imports[0].module, "skylift.storage");
    assert_eq!(model.imports[0].names, vec!["upload".to_string()]);
    assert_eq!(model.imports[1].module, "os");

    let upload = model
        .calls
        .iter()
        .find(|call| call.function == "upload")
        .expect("upload call");
    assert_eq!(upload.line, 4);
    assert_eq!(upload.args["bucket"], ArgValue::String("b".to_string()));
    assert_eq!(upload.args["size"], ArgValue::Number(3.into()));
    assert_eq!(upload.args["fast"], ArgValue::Bool(true));
    assert_eq!(upload.args["target"], ArgValue::Ident("dest".to_string()));
    assert_eq!(upload.args["extra"], ArgValue::Null);
    assert!(upload.snippet.starts_with("upload("));

    let getcwd = model
        .calls
        .iter()
        .find(|call| call.function == "getcwd")
        .expect("getcwd call");
    assert_eq!(getcwd.qualifier.as_deref(), Some("os"));
}

#[tokio::test]
async fn probe_classifies_complex_arguments_as_opaque_source() {
    let Some(python) = python() else {
        eprintln!("skipping: no python on PATH");
        return;
    };
    let parser = PythonParser::new(python, TIMEOUT);

    let model = parser
        .parse("upload(parts=[1, 2, 3])\n")
        .await
        .expect("parse");
    assert_eq!(
        model.calls[0].args["parts"],
        ArgValue::Opaque("[1, 2, 3]".to_string())
    );
}

#[tokio::test]
async fn syntax_error_surfaces_with_position() {
    let Some(python) = python() else {
        eprintln!("skipping: no python on PATH");
        return;
    };
    let parser = PythonParser::new(python, TIMEOUT);

    let err = parser.parse("def broken(:\n    pass\n").await.unwrap_err();
    match err {
        TransformError::Parse { line, .. } => assert_eq!(line, Some(1)),
        other => panic!("expected Parse, got {other}"),
    }
}

#[tokio::test]
async fn validator_accepts_good_and_rejects_bad_source() {
    let Some(python) = python() else {
        eprintln!("skipping: no python on PATH");
        return;
    };
    let validator = PythonValidator::new(python, TIMEOUT);

    validator
        .validate("x = 1\nprint(x)\n")
        .await
        .expect("valid source accepted");

    let err = validator.validate("def broken(:\n").await.unwrap_err();
    match err {
        TransformError::Validation { message, code } => {
            assert!(message.contains("SyntaxError"));
            assert!(code.contains("broken"));
        }
        other => panic!("expected Validation, got {other}"),
    }
}

#[tokio::test]
async fn parser_timeout_is_a_collaborator_failure() {
    let Some(python) = python() else {
        eprintln!("skipping: no python on PATH");
        return;
    };
    // A timeout short enough that interpreter startup cannot finish.
    let parser = PythonParser::new(python, Duration::from_millis(1));

    let err = parser.parse("x = 1\n").await.unwrap_err();
    match err {
        TransformError::Collaborator { name, message } => {
            assert_eq!(name, "parser");
            assert!(message.contains("timed out"));
        }
        other => panic!("expected Collaborator, got {other}"),
    }
}
