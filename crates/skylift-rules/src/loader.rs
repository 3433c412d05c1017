//! Rule-file discovery and decoding.
//!
//! Rule files live at `<rules_dir>/<capability>/<provider>/rules.yaml`,
//! one file per provider and capability. The loader decodes the file into
//! registry rules stamped with the provider it was loaded for.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use skylift_types::{Provider, Rule, RuleFile};

use crate::error::LoaderError;

const RULES_FILE: &str = "rules.yaml";

/// Loads rewrite rules from a capability/provider directory tree.
#[derive(Debug, Clone)]
pub struct RuleLoader {
    rules_dir: PathBuf,
}

impl RuleLoader {
    /// Loader rooted at the given rules directory.
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
        }
    }

    /// Load the rules for one provider and capability.
    ///
    /// # Errors
    ///
    /// `LoaderError::Missing` when the expected file does not exist,
    /// `LoaderError::Io`/`LoaderError::Yaml` when it cannot be read or
    /// decoded.
    pub fn load(&self, provider: Provider, capability: &str) -> Result<Vec<Rule>, LoaderError> {
        let path = self
            .rules_dir
            .join(capability)
            .join(provider.as_str())
            .join(RULES_FILE);
        if !path.is_file() {
            return Err(LoaderError::Missing(path));
        }

        let text = fs::read_to_string(&path)?;
        let file: RuleFile = serde_yaml::from_str(&text)?;

        let rules: Vec<Rule> = file
            .operations
            .into_iter()
            .map(|op| op.into_rule(provider))
            .collect();
        tracing::debug!(
            capability,
            provider = %provider,
            rules = rules.len(),
            path = %path.display(),
            "loaded rule file"
        );
        Ok(rules)
    }

    /// Load every capability that has rules for the provider.
    ///
    /// Capabilities without a rules file for this provider are skipped,
    /// not reported as errors.
    ///
    /// # Errors
    ///
    /// `LoaderError::Io` when the rules directory cannot be listed, or any
    /// decode error from a capability that does have a rules file.
    pub fn load_all(
        &self,
        provider: Provider,
    ) -> Result<BTreeMap<String, Vec<Rule>>, LoaderError> {
        let mut by_capability = BTreeMap::new();

        for entry in fs::read_dir(&self.rules_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let capability = entry.file_name().to_string_lossy().into_owned();
            match self.load(provider, &capability) {
                Ok(rules) => {
                    by_capability.insert(capability, rules);
                }
                Err(LoaderError::Missing(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(by_capability)
    }

    /// Directory this loader reads from.
    #[must_use]
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }
}
