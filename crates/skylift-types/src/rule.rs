//! Rewrite rules and the on-disk rule-file schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// The rewrite specification for one fully qualified pattern under one
/// target provider. Loaded once per provider, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Human-readable operation name from the rule file.
    pub name: String,
    /// Fully qualified match string (`skylift.storage.upload`).
    pub pattern: String,
    /// Provider this rule produces code for.
    pub provider: Provider,
    /// Provider service the operation maps to (`s3`, `cloud_storage`).
    pub service: String,
    /// Optional provider-side operation name.
    #[serde(default)]
    pub operation: Option<String>,
    /// Literal import statements the rendered code depends on.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Client/handle initialization block, emitted once per output file.
    #[serde(default)]
    pub setup_code: Option<String>,
    /// Placeholder-bearing code template (`{{bucket}}` style).
    pub code_template: String,
    /// Source-argument-name to target-parameter-name map. Used only to
    /// validate argument completeness, never for template substitution.
    #[serde(default)]
    pub parameter_mapping: BTreeMap<String, String>,
    /// External package requirements declared by the rule.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// One external package requirement declared by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    /// Package name (`boto3`).
    pub package: String,
    /// Version constraint (`>=1.28.0`).
    #[serde(default)]
    pub version: String,
}

/// Top-level shape of a `rules.yaml` file: a collection of named
/// operations for one provider and capability.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleFile {
    /// The operations declared by the file.
    pub operations: Vec<RuleOperation>,
}

/// One operation entry in a rule file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleOperation {
    /// Operation name.
    pub name: String,
    /// Fully qualified match string.
    pub pattern: String,
    /// Target provider/service description.
    pub target: TargetSpec,
    /// How to perform the rewrite.
    pub transformation: TransformSpec,
    /// Declared package requirements.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// Target provider configuration of a rule-file operation.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    /// Provider name (`aws`, `gcp`, `azure`).
    pub provider: String,
    /// Provider service (`s3`, `cloud_storage`).
    pub service: String,
    /// Optional provider-side operation name.
    #[serde(default)]
    pub operation: Option<String>,
}

/// Transformation description of a rule-file operation.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformSpec {
    /// Literal import statements to add.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Literal setup block, may be empty.
    #[serde(default)]
    pub setup_code: Option<String>,
    /// Placeholder-bearing template text.
    pub code_template: String,
    /// Source-argument to target-parameter map.
    #[serde(default)]
    pub parameter_mapping: BTreeMap<String, String>,
}

impl RuleOperation {
    /// Convert a rule-file operation into a registry `Rule`, stamped with
    /// the provider the file was loaded for.
    #[must_use]
    pub fn into_rule(self, provider: Provider) -> Rule {
        // Empty setup blocks in YAML (`setup_code: ""`) carry no code.
        let setup_code = self
            .transformation
            .setup_code
            .filter(|code| !code.trim().is_empty());
        Rule {
            name: self.name,
            pattern: self.pattern,
            provider,
            service: self.target.service,
            operation: self.target.operation,
            imports: self.transformation.imports,
            setup_code,
            code_template: self.transformation.code_template,
            parameter_mapping: self.transformation.parameter_mapping,
            requirements: self.requirements,
        }
    }
}
