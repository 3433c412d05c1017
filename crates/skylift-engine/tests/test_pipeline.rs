//! End-to-end pipeline tests driven through stub collaborators, so they
//! run without a Python interpreter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use skylift_engine::{Engine, SourceParser, SyntaxValidator};
use skylift_types::{
    ArgValue, CallSite, ImportDecl, Language, ProgramModel, Provider, Rule, TransformError,
    TransformResult,
};

/// Parser stub that replays a pre-built program model.
struct StubParser {
    model: ProgramModel,
}

#[async_trait]
impl SourceParser for StubParser {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn parse(&self, source: &str) -> TransformResult<ProgramModel> {
        let mut model = self.model.clone();
        model.source = source.to_string();
        Ok(model)
    }
}

/// Validator stub that accepts everything (or rejects everything).
struct StubValidator {
    accept: bool,
}

#[async_trait]
impl SyntaxValidator for StubValidator {
    async fn validate(&self, source: &str) -> TransformResult<()> {
        if self.accept {
            Ok(())
        } else {
            Err(TransformError::Validation {
                message: "SyntaxError: rejected by stub".to_string(),
                code: source.to_string(),
            })
        }
    }
}

fn upload_rule() -> Rule {
    Rule {
        name: "upload".to_string(),
        pattern: "skylift.storage.upload".to_string(),
        provider: Provider::Aws,
        service: "object_store".to_string(),
        operation: None,
        imports: vec!["use client_lib".to_string()],
        setup_code: Some("client = client_lib.new()".to_string()),
        code_template: "client.put({{source}}, {{bucket}}, {{destination}})".to_string(),
        parameter_mapping: [
            ("bucket".to_string(), "Bucket".to_string()),
            ("source".to_string(), "Source".to_string()),
            ("destination".to_string(), "Destination".to_string()),
        ]
        .into_iter()
        .collect(),
        requirements: vec![],
    }
}

fn upload_model() -> ProgramModel {
    let mut args = BTreeMap::new();
    args.insert("bucket".to_string(), ArgValue::String("b".to_string()));
    args.insert("source".to_string(), ArgValue::String("s".to_string()));
    args.insert("destination".to_string(), ArgValue::String("d".to_string()));
    ProgramModel {
        language: Language::Python,
        imports: vec![ImportDecl {
            module: "skylift.storage".to_string(),
            names: vec!["upload".to_string()],
            alias: None,
            line: 1,
        }],
        calls: vec![CallSite {
            qualifier: None,
            function: "upload".to_string(),
            args,
            line: 2,
            column: 0,
            snippet: "upload(bucket='b', source='s', destination='d')".to_string(),
        }],
        source: String::new(),
    }
}

fn engine_with(model: ProgramModel, accept: bool) -> Engine {
    Engine::with_collaborators(
        Box::new(StubParser { model }),
        Box::new(StubValidator { accept }),
        "skylift",
    )
}

const UPLOAD_SOURCE: &str = "\
from skylift.storage import upload
upload(bucket='b', source='s', destination='d')";

#[tokio::test]
async fn end_to_end_scenario_rewrites_the_call() {
    let engine = engine_with(upload_model(), true);
    engine.registry().register(upload_rule());

    let outcome = engine
        .transform(UPLOAD_SOURCE, Provider::Aws)
        .await
        .expect("transform");

    // Exactly one import line, exactly one setup line preceding the call.
    assert_eq!(outcome.code.matches("use client_lib").count(), 1);
    assert_eq!(outcome.code.matches("client = client_lib.new()").count(), 1);
    assert!(outcome.code.contains("client.put('s', 'b', 'd')"));
    assert!(!outcome.code.contains("skylift"));

    let setup_at = outcome
        .code
        .find("client = client_lib.new()")
        .expect("setup");
    let call_at = outcome.code.find("client.put").expect("call");
    assert!(setup_at < call_at);

    assert_eq!(outcome.imports, vec!["use client_lib".to_string()]);
    assert_eq!(outcome.metadata["rewritten_calls"], 1);
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn source_without_agnostic_calls_passes_through_unchanged() {
    let model = ProgramModel {
        language: Language::Python,
        imports: vec![],
        calls: vec![],
        source: String::new(),
    };
    let engine = engine_with(model, true);

    let source = "import os\n\nprint(os.getcwd())\n";
    let outcome = engine
        .transform(source, Provider::Gcp)
        .await
        .expect("transform");

    assert_eq!(outcome.code, source);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].message.contains("no agnostic calls"));
}

#[tokio::test]
async fn missing_rule_aborts_with_position() {
    let engine = engine_with(upload_model(), true);
    // Registry deliberately left empty.

    let err = engine
        .transform(UPLOAD_SOURCE, Provider::Aws)
        .await
        .unwrap_err();

    match err {
        TransformError::RuleNotFound { pattern, line, .. } => {
            assert_eq!(pattern, "skylift.storage.upload");
            assert_eq!(line, 2);
        }
        other => panic!("expected RuleNotFound, got {other}"),
    }
}

#[tokio::test]
async fn validator_rejection_is_fatal_and_carries_the_code() {
    let engine = engine_with(upload_model(), false);
    engine.registry().register(upload_rule());

    let err = engine
        .transform(UPLOAD_SOURCE, Provider::Aws)
        .await
        .unwrap_err();

    match err {
        TransformError::Validation { code, .. } => {
            assert!(code.contains("client.put('s', 'b', 'd')"));
        }
        other => panic!("expected Validation, got {other}"),
    }
}

#[tokio::test]
async fn missing_parameter_names_the_argument() {
    let mut model = upload_model();
    if let Some(call) = model.calls.first_mut() {
        call.args.remove("destination");
    }
    let engine = engine_with(model, true);
    engine.registry().register(upload_rule());

    let err = engine
        .transform(UPLOAD_SOURCE, Provider::Aws)
        .await
        .unwrap_err();

    match err {
        TransformError::MissingParameter { name, hint, .. } => {
            assert_eq!(name, "destination");
            assert!(hint.contains("destination"));
        }
        other => panic!("expected MissingParameter, got {other}"),
    }
}
