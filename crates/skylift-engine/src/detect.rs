//! Agnostic-call detection.
//!
//! Consumes a program model and produces the ordered sequence of calls
//! that target the agnostic namespace, each resolved to its true fully
//! qualified module path.

use std::collections::HashMap;

use skylift_types::{
    CallSite, ImportDecl, Language, ProgramModel, SdkCall, TransformError, TransformResult,
};

/// Detects calls into the agnostic namespace.
#[derive(Debug, Clone)]
pub struct Detector {
    namespace: String,
}

impl Detector {
    /// Detector for the given agnostic namespace prefix.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The agnostic namespace prefix this detector matches.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether a dotted module path lies inside the agnostic namespace.
    ///
    /// Segment-aware: `skylift` and `skylift.storage` match, a module
    /// that merely shares the prefix characters (`skyliftx`) does not.
    #[must_use]
    pub fn in_namespace(&self, module: &str) -> bool {
        module == self.namespace
            || module
                .strip_prefix(&self.namespace)
                .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Detect agnostic calls in a program model.
    ///
    /// Returns the resolved calls in ascending source order. Calls that
    /// do not target the agnostic namespace are dropped; symbols bound
    /// only by wildcard imports are deliberately not resolved.
    ///
    /// # Errors
    ///
    /// `TransformError::UnsupportedLanguage` when the model's language has
    /// no detection strategy; `TransformError::MalformedModel` when any
    /// import or call shape is structurally invalid (the model is rejected
    /// whole - detection never partially succeeds).
    pub fn detect(&self, model: &ProgramModel) -> TransformResult<Vec<SdkCall>> {
        if model.language != Language::Python {
            return Err(TransformError::UnsupportedLanguage(model.language));
        }
        check_shapes(model)?;

        let bindings = self.import_bindings(&model.imports);
        let mut calls: Vec<SdkCall> = model
            .calls
            .iter()
            .filter_map(|site| self.resolve(site, &bindings))
            .collect();
        calls.sort_by_key(|call| (call.line(), call.column()));

        tracing::debug!(
            namespace = %self.namespace,
            detected = calls.len(),
            examined = model.calls.len(),
            "detected agnostic calls"
        );
        Ok(calls)
    }

    /// Build the locally-bound-symbol -> agnostic-module table.
    ///
    /// `from ns.mod import name` binds `name -> ns.mod` for every named
    /// symbol; `import ns.mod` binds the last path segment -> `ns.mod`.
    /// Wildcard names never bind, and aliases are not consulted.
    fn import_bindings(&self, imports: &[ImportDecl]) -> HashMap<String, String> {
        let mut bindings = HashMap::new();

        for decl in imports {
            if !self.in_namespace(&decl.module) {
                continue;
            }

            for name in &decl.names {
                if name == "*" {
                    continue;
                }
                bindings.insert(name.clone(), decl.module.clone());
            }

            // Whole-module import: bind the trailing segment.
            let whole_module = decl.names.is_empty()
                || (decl.names.len() == 1 && decl.names[0] == decl.module);
            if whole_module
                && let Some(last) = decl.module.rsplit('.').next()
            {
                bindings.insert(last.to_string(), decl.module.clone());
            }
        }

        bindings
    }

    /// Resolve one call site to its agnostic module path, or drop it.
    fn resolve(&self, site: &CallSite, bindings: &HashMap<String, String>) -> Option<SdkCall> {
        let module = match site.qualifier.as_deref() {
            None | Some("") => bindings.get(&site.function)?.clone(),
            Some(qualifier) => {
                let mut segments = qualifier.split('.');
                let first = segments.next()?;
                if first == self.namespace {
                    qualifier.to_string()
                } else {
                    let bound = bindings.get(first)?;
                    let mut path = vec![bound.as_str()];
                    path.extend(segments);
                    path.join(".")
                }
            }
        };

        Some(SdkCall::new(
            module,
            &site.function,
            site.args.clone(),
            site.line,
            site.column,
            &site.snippet,
        ))
    }
}

/// Structural validation of the model, up front and all-or-nothing.
fn check_shapes(model: &ProgramModel) -> TransformResult<()> {
    for (index, decl) in model.imports.iter().enumerate() {
        if decl.line == 0 {
            return Err(TransformError::MalformedModel(format!(
                "import #{index} has no source line"
            )));
        }
    }
    for (index, site) in model.calls.iter().enumerate() {
        if site.function.is_empty() {
            return Err(TransformError::MalformedModel(format!(
                "call #{index} has an empty function name"
            )));
        }
        if site.line == 0 {
            return Err(TransformError::MalformedModel(format!(
                "call #{index} has no source line"
            )));
        }
    }
    Ok(())
}
