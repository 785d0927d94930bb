//! Rule-based label normalization.
//!
//! Known phrasings of the same complaint are collapsed to one canonical
//! label before catalog matching. Rules are plain data: a set of trigger
//! substrings and the label they map to. Matching is case-insensitive
//! substring containment and the first matching rule in table order wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use review_types::CandidateTopic;

use crate::error::TopicsError;

/// One rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticRule {
    /// Substrings that trigger the rule (case-insensitive)
    pub triggers: Vec<String>,
    /// Label assigned when any trigger matches
    pub canonical: String,
}

impl SemanticRule {
    pub fn new<I, S>(triggers: I, canonical: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
            canonical: canonical.into(),
        }
    }

    /// `label_lower` must already be lowercase.
    fn matches(&self, label_lower: &str) -> bool {
        self.triggers.iter().any(|t| label_lower.contains(t.as_str()))
    }
}

/// The built-in rule table.
pub fn default_rules() -> Vec<SemanticRule> {
    vec![
        SemanticRule::new(
            ["login", "log in", "error 500", "crashes", "cannot login"],
            "Login issues",
        ),
        SemanticRule::new(["too expensive", "charges are high"], "High delivery cost"),
    ]
}

/// Applies a rule table to candidate labels.
#[derive(Debug, Clone)]
pub struct SemanticNormalizer {
    rules: Vec<SemanticRule>,
}

impl SemanticNormalizer {
    /// Build a normalizer from rules in priority order.
    ///
    /// Triggers are lowercased once here. The table is rejected when it
    /// could not be applied idempotently (see [`SemanticNormalizer::validate`]).
    pub fn new(rules: Vec<SemanticRule>) -> Result<Self, TopicsError> {
        Self::validate(&rules)?;
        let rules = rules
            .into_iter()
            .map(|rule| SemanticRule {
                triggers: rule.triggers.iter().map(|t| t.to_lowercase()).collect(),
                canonical: rule.canonical,
            })
            .collect();
        Ok(Self { rules })
    }

    /// Normalizer over [`default_rules`].
    pub fn with_default_rules() -> Self {
        Self::new(default_rules()).expect("built-in rules are valid")
    }

    /// Check a rule table.
    ///
    /// Rejects empty triggers and empty canonical labels, and any rule whose
    /// canonical label would itself be rewritten by a different rule: with
    /// such a table normalizing twice would not equal normalizing once.
    pub fn validate(rules: &[SemanticRule]) -> Result<(), TopicsError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.canonical.trim().is_empty() {
                return Err(TopicsError::InvalidConfig(format!(
                    "rule {} has an empty canonical label",
                    index
                )));
            }
            if rule.triggers.is_empty() || rule.triggers.iter().any(|t| t.is_empty()) {
                return Err(TopicsError::InvalidConfig(format!(
                    "rule '{}' needs at least one non-empty trigger",
                    rule.canonical
                )));
            }
        }

        for (index, rule) in rules.iter().enumerate() {
            let canonical_lower = rule.canonical.to_lowercase();
            let first = rules.iter().position(|r| {
                r.triggers
                    .iter()
                    .any(|t| canonical_lower.contains(&t.to_lowercase()))
            });
            if let Some(other) = first.filter(|&other| other != index) {
                return Err(TopicsError::InvalidConfig(format!(
                    "canonical label '{}' is rewritten by rule '{}'",
                    rule.canonical, rules[other].canonical
                )));
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[SemanticRule] {
        &self.rules
    }

    /// Canonical label for `label`, or `None` when no rule matches.
    pub fn normalize_label(&self, label: &str) -> Option<&str> {
        let lower = label.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.canonical.as_str())
    }

    /// Rewrite the candidate's label in place. Returns whether it changed.
    pub fn normalize(&self, candidate: &mut CandidateTopic) -> bool {
        match self.normalize_label(&candidate.label) {
            Some(canonical) if canonical != candidate.label => {
                debug!(from = %candidate.label, to = canonical, "Normalized label");
                candidate.label = canonical.to_string();
                true
            }
            _ => false,
        }
    }

    /// Normalize every candidate. Returns how many labels changed.
    pub fn normalize_all(&self, candidates: &mut [CandidateTopic]) -> usize {
        candidates
            .iter_mut()
            .map(|c| self.normalize(c))
            .filter(|changed| *changed)
            .count()
    }
}

impl Default for SemanticNormalizer {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
