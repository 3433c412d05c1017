//! Rule lookup and template rendering.
//!
//! Rendering a (rule, call) pair is a pure function: the template's
//! `{{name}}` placeholders are substituted with the call's argument
//! values, pre-formatted per their type. No state outside the pair is
//! consulted or mutated.

use std::collections::BTreeMap;

use skylift_rules::RuleRegistry;
use skylift_types::{RenderedCall, Rule, SdkCall, TransformError, TransformResult};

/// Renders detected calls into provider-native code fragments.
pub struct Renderer<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> Renderer<'a> {
    /// Renderer backed by the given rule registry.
    #[must_use]
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Render every call, in detector order.
    ///
    /// Fail-fast: the first error aborts the whole batch and no partial
    /// list is returned. Best-effort behavior belongs in a layer above
    /// this contract, never inside it.
    ///
    /// # Errors
    ///
    /// Any error from [`Renderer::render`].
    pub fn render_all(&self, calls: &[SdkCall]) -> TransformResult<Vec<RenderedCall>> {
        let mut rendered = Vec::with_capacity(calls.len());
        for call in calls {
            rendered.push(self.render(call)?);
        }
        Ok(rendered)
    }

    /// Render one call against its registered rule.
    ///
    /// # Errors
    ///
    /// `TransformError::RuleNotFound` when no rule matches the call's
    /// pattern; `TransformError::MissingParameter` when the rule's
    /// parameter mapping names an argument the call did not supply;
    /// `TransformError::TemplateRender` when the template is malformed.
    pub fn render(&self, call: &SdkCall) -> TransformResult<RenderedCall> {
        let rule = self.lookup_rule(call)?;

        for param in rule.parameter_mapping.keys() {
            if !call.args().contains_key(param) {
                return Err(TransformError::MissingParameter {
                    name: param.clone(),
                    function: call.function().to_string(),
                    line: call.line(),
                    snippet: call.snippet().to_string(),
                    hint: format!("add `{param}` to the `{}` call", call.function()),
                });
            }
        }

        let code = render_template(&rule, call)?;
        tracing::trace!(pattern = %rule.pattern, line = call.line(), "rendered call");
        Ok(RenderedCall {
            call: call.clone(),
            code,
            line: call.line(),
        })
    }

    /// Look up a call's rule, attaching the call position on a miss.
    pub(crate) fn lookup_rule(&self, call: &SdkCall) -> TransformResult<Rule> {
        let pattern = call.pattern();
        self.registry.lookup(&pattern).map_err(|_| {
            TransformError::RuleNotFound {
                hint: format!(
                    "verify a rule is loaded for `{pattern}` under the active provider"
                ),
                pattern,
                line: call.line(),
                snippet: call.snippet().to_string(),
            }
        })
    }
}

/// Substitute the rule's template against the call's arguments.
fn render_template(rule: &Rule, call: &SdkCall) -> TransformResult<String> {
    let values: BTreeMap<&str, String> = call
        .args()
        .iter()
        .map(|(name, value)| (name.as_str(), value.python_literal()))
        .collect();

    let code = substitute(&rule.code_template, &values).map_err(|message| {
        TransformError::TemplateRender {
            pattern: rule.pattern.clone(),
            message,
        }
    })?;
    Ok(code.trim().to_string())
}

/// Scan `{{name}}` placeholders and splice in the pre-formatted values.
///
/// Placeholder names may carry inner whitespace (`{{ bucket }}`). An
/// unknown name or an unterminated opener is a render error.
fn substitute(template: &str, values: &BTreeMap<&str, String>) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err("unterminated `{{` placeholder".to_string());
        };
        let name = after[..end].trim();
        if name.is_empty() {
            return Err("empty placeholder name".to_string());
        }
        let Some(value) = values.get(name) else {
            return Err(format!("undefined placeholder `{name}`"));
        };
        out.push_str(value);
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use skylift_types::{ArgValue, Provider};

    use super::*;

    fn rule(pattern: &str, template: &str, mapping: &[(&str, &str)]) -> Rule {
        Rule {
            name: "upload".to_string(),
            pattern: pattern.to_string(),
            provider: Provider::Aws,
            service: "s3".to_string(),
            operation: None,
            imports: vec![],
            setup_code: None,
            code_template: template.to_string(),
            parameter_mapping: mapping
                .iter()
                .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
                .collect(),
            requirements: vec![],
        }
    }

    fn upload_call() -> SdkCall {
        let mut args = BTreeMap::new();
        args.insert("bucket".to_string(), ArgValue::String("b".to_string()));
        args.insert("source".to_string(), ArgValue::Ident("path".to_string()));
        args.insert("count".to_string(), ArgValue::Number(3.into()));
        SdkCall::new(
            "skylift.storage",
            "upload",
            args,
            5,
            0,
            "upload(bucket='b', source=path, count=3)",
        )
    }

    fn registry_with(rules: Vec<Rule>) -> RuleRegistry {
        let registry = RuleRegistry::new();
        registry.register_all(rules);
        registry
    }

    #[test]
    fn renders_each_value_per_its_type() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "client.put({{source}}, {{bucket}}, {{count}})",
            &[],
        )]);
        let rendered = Renderer::new(&registry)
            .render(&upload_call())
            .expect("render");

        assert_eq!(rendered.code, "client.put(path, 'b', 3)");
        assert_eq!(rendered.line, 5);
    }

    #[test]
    fn rendering_is_deterministic() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "client.put({{ source }}, {{ bucket }})",
            &[("bucket", "Bucket"), ("source", "Filename")],
        )]);
        let renderer = Renderer::new(&registry);
        let call = upload_call();

        let first = renderer.render(&call).expect("first render");
        let second = renderer.render(&call).expect("second render");
        assert_eq!(first.code, second.code);
    }

    #[test]
    fn missing_rule_carries_position_and_hint() {
        let registry = registry_with(vec![]);
        let err = Renderer::new(&registry).render(&upload_call()).unwrap_err();

        match err {
            TransformError::RuleNotFound { pattern, line, snippet, hint } => {
                assert_eq!(pattern, "skylift.storage.upload");
                assert_eq!(line, 5);
                assert!(snippet.starts_with("upload("));
                assert!(hint.contains("skylift.storage.upload"));
            }
            other => panic!("expected RuleNotFound, got {other}"),
        }
    }

    #[test]
    fn missing_parameter_names_the_gap() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "client.put({{source}})",
            &[("source", "Filename"), ("destination", "Key")],
        )]);
        let err = Renderer::new(&registry).render(&upload_call()).unwrap_err();

        match err {
            TransformError::MissingParameter { name, function, line, .. } => {
                assert_eq!(name, "destination");
                assert_eq!(function, "upload");
                assert_eq!(line, 5);
            }
            other => panic!("expected MissingParameter, got {other}"),
        }
    }

    #[test]
    fn undefined_placeholder_is_a_render_error() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "client.put({{destination}})",
            &[],
        )]);
        let err = Renderer::new(&registry).render(&upload_call()).unwrap_err();

        match err {
            TransformError::TemplateRender { pattern, message } => {
                assert_eq!(pattern, "skylift.storage.upload");
                assert!(message.contains("destination"));
            }
            other => panic!("expected TemplateRender, got {other}"),
        }
    }

    #[test]
    fn unterminated_placeholder_is_a_render_error() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "client.put({{bucket)",
            &[],
        )]);
        let err = Renderer::new(&registry).render(&upload_call()).unwrap_err();
        assert!(matches!(err, TransformError::TemplateRender { .. }));
    }

    #[test]
    fn surrounding_blank_lines_are_trimmed() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "\n\nclient.put({{bucket}})\nclient.flush()\n\n",
            &[],
        )]);
        let rendered = Renderer::new(&registry)
            .render(&upload_call())
            .expect("render");
        assert_eq!(rendered.code, "client.put('b')\nclient.flush()");
    }

    #[test]
    fn batch_aborts_on_first_error() {
        let registry = registry_with(vec![rule(
            "skylift.storage.upload",
            "client.put({{bucket}})",
            &[],
        )]);
        let mut other_args = BTreeMap::new();
        other_args.insert("path".to_string(), ArgValue::String("p".to_string()));
        let unknown = SdkCall::new(
            "skylift.storage",
            "download",
            other_args,
            9,
            0,
            "download(path='p')",
        );

        let err = Renderer::new(&registry)
            .render_all(&[upload_call(), unknown])
            .unwrap_err();
        assert!(matches!(err, TransformError::RuleNotFound { .. }));
    }
}
