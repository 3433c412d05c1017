//! Single-pass pipeline orchestration.
//!
//! Parsed -> Detected -> Ruled -> Rendered -> Rewritten -> Validated.
//! There is no retry or rollback between states; the first error aborts
//! the transformation and nothing downstream runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use skylift_rules::{LoaderError, RuleLoader, RuleRegistry};
use skylift_types::{Outcome, Provider, TransformResult};

use crate::detect::Detector;
use crate::exec::find_python;
use crate::parse::{PythonParser, SourceParser};
use crate::render::Renderer;
use crate::splice::Rewriter;
use crate::validate::{PythonValidator, SyntaxValidator};

/// The agnostic namespace rewritten by default.
pub const DEFAULT_NAMESPACE: &str = "skylift";

const DEFAULT_PARSER_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_VALIDATOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Agnostic namespace prefix to detect and rewrite.
    pub namespace: String,
    /// Explicit Python executable; discovered on `PATH` when absent.
    pub python: Option<PathBuf>,
    /// Timeout for one parser invocation.
    pub parser_timeout: Duration,
    /// Timeout for one validator invocation.
    pub validator_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            python: None,
            parser_timeout: DEFAULT_PARSER_TIMEOUT,
            validator_timeout: DEFAULT_VALIDATOR_TIMEOUT,
        }
    }
}

/// The transformation engine: rule registry, detector, and the two
/// external collaborators, wired for repeated concurrent use.
///
/// The registry is the only long-lived shared state; one source unit's
/// transformation is otherwise a self-contained computation.
pub struct Engine {
    registry: Arc<RuleRegistry>,
    detector: Detector,
    parser: Box<dyn SourceParser>,
    validator: Box<dyn SyntaxValidator>,
}

impl Engine {
    /// Engine with the stock Python collaborators.
    ///
    /// # Errors
    ///
    /// `TransformError::Collaborator` when no Python executable can be
    /// found.
    pub fn new(config: EngineConfig) -> TransformResult<Self> {
        let python = find_python(config.python.as_deref())?;
        let parser = PythonParser::new(python.clone(), config.parser_timeout);
        let validator = PythonValidator::new(python, config.validator_timeout);
        Ok(Self::with_collaborators(
            Box::new(parser),
            Box::new(validator),
            &config.namespace,
        ))
    }

    /// Engine with caller-supplied collaborators (test doubles, remote
    /// parsers, alternative checkers).
    #[must_use]
    pub fn with_collaborators(
        parser: Box<dyn SourceParser>,
        validator: Box<dyn SyntaxValidator>,
        namespace: &str,
    ) -> Self {
        Self {
            registry: Arc::new(RuleRegistry::new()),
            detector: Detector::new(namespace),
            parser,
            validator,
        }
    }

    /// The shared rule registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Load one capability's rules for a provider into the registry.
    ///
    /// Returns the number of rules registered.
    ///
    /// # Errors
    ///
    /// Any [`LoaderError`] from reading or decoding the rules file.
    pub fn load_rules(
        &self,
        rules_dir: &Path,
        provider: Provider,
        capability: &str,
    ) -> Result<usize, LoaderError> {
        let rules = RuleLoader::new(rules_dir).load(provider, capability)?;
        let count = rules.len();
        self.registry.register_all(rules);
        tracing::info!(
            provider = %provider,
            capability,
            rules = count,
            "registered rules"
        );
        Ok(count)
    }

    /// Transform one source unit for a provider.
    ///
    /// # Errors
    ///
    /// The first error from any stage, per the fail-fast contract; no
    /// partial output is ever returned.
    pub async fn transform(&self, source: &str, provider: Provider) -> TransformResult<Outcome> {
        let model = self.parser.parse(source).await?;
        tracing::debug!(stage = "parsed", imports = model.imports.len(), calls = model.calls.len());

        let calls = self.detector.detect(&model)?;
        tracing::debug!(stage = "detected", calls = calls.len());

        let rendered = Renderer::new(&self.registry).render_all(&calls)?;
        tracing::debug!(stage = "rendered", fragments = rendered.len());

        let outcome =
            Rewriter::new(provider, &self.detector, &self.registry).rewrite(&model, &rendered)?;
        tracing::debug!(stage = "rewritten", bytes = outcome.code.len());

        self.validator.validate(&outcome.code).await?;
        tracing::debug!(stage = "validated");

        Ok(outcome)
    }
}
