//! Provider-scoped rule registry.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use skylift_types::Rule;

use crate::error::RegistryError;

/// Pattern -> rule store for exactly one target provider.
///
/// Registration happens at load time and overwrites on pattern collision
/// (last write wins). Lookups are frequent and run concurrently from many
/// transformation requests; the read lock never serializes readers
/// against each other, and writes only briefly exclude them.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rule keyed by its pattern string.
    pub fn register(&self, rule: Rule) {
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        rules.insert(rule.pattern.clone(), rule);
    }

    /// Register a batch of rules.
    pub fn register_all(&self, batch: impl IntoIterator<Item = Rule>) {
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        for rule in batch {
            rules.insert(rule.pattern.clone(), rule);
        }
    }

    /// Look up the rule for an exact pattern string.
    ///
    /// # Errors
    ///
    /// `RegistryError::NotFound` if no rule is registered for the pattern.
    pub fn lookup(&self, pattern: &str) -> Result<Rule, RegistryError> {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        rules
            .get(pattern)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(pattern.to_string()))
    }

    /// Whether a rule is registered for the pattern.
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        rules.contains_key(pattern)
    }

    /// All registered rules, in no particular order.
    #[must_use]
    pub fn all(&self) -> Vec<Rule> {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        rules.values().cloned().collect()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        rules.len()
    }

    /// Whether the registry holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every registered rule.
    pub fn clear(&self) {
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        rules.clear();
    }
}
