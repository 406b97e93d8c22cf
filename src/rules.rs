//! Labeling rules
//!
//! A rule maps an ordered list of glob patterns to an ordered list of label
//! names. Rules are immutable once loaded; evaluation order follows config
//! order. Every label declared anywhere in the rule set is "managed": it is
//! the only kind of label this tool will ever remove.

use crate::config::LabelerConfig;
use crate::error::{Error, Result};
use crate::matcher::{GlobMatcher, PatternSet};
use std::collections::BTreeMap;

/// Ordered mapping from lowercase label identity to display-cased name
pub type LabelSet = BTreeMap<String, String>;

/// One labeling rule with its patterns compiled
#[derive(Debug)]
pub struct Rule {
    /// Label names in config order, display casing preserved
    pub labels: Vec<String>,
    /// Pattern sources, for diagnostics
    pub patterns: Vec<String>,
    compiled: Vec<PatternSet>,
}

impl Rule {
    /// Does any of this rule's patterns match the path?
    ///
    /// Patterns combine with ANY semantics: the first matching pattern
    /// decides, there is no AND across a rule's pattern list.
    pub fn matches(&self, path: &str) -> bool {
        self.compiled.iter().any(|p| p.is_match(path))
    }
}

/// The full ordered rule set loaded from the labeler config
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set from parsed config, compiling every pattern
    ///
    /// Fails with a config error if a label name is not a non-empty string
    /// or if any pattern does not compile under the configured flags.
    pub fn load(config: &LabelerConfig) -> Result<Self> {
        let matcher = GlobMatcher::new(config.match_options());
        let mut rules = Vec::with_capacity(config.rules.len());

        for raw in &config.rules {
            let mut labels = Vec::with_capacity(raw.labels.len());
            for value in &raw.labels {
                let name = value.as_str().ok_or_else(|| {
                    Error::Config(format!(
                        "label name is not a string: {}",
                        serde_yaml::to_string(value).unwrap_or_default().trim_end()
                    ))
                })?;
                if name.is_empty() {
                    return Err(Error::Config("label name is empty".to_string()));
                }
                labels.push(name.to_string());
            }

            let compiled = raw
                .patterns
                .iter()
                .map(|p| matcher.compile(p))
                .collect::<Result<Vec<_>>>()?;

            rules.push(Rule {
                labels,
                patterns: raw.patterns.clone(),
                compiled,
            });
        }

        Ok(Self { rules })
    }

    /// The rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Every label identity declared across the rule set
    pub fn managed_labels(&self) -> LabelSet {
        let mut managed = LabelSet::new();
        for rule in &self.rules {
            for label in &rule.labels {
                managed
                    .entry(label.to_lowercase())
                    .or_insert_with(|| label.clone());
            }
        }
        managed
    }

    /// Build a rule set straight from raw YAML bytes
    pub fn from_yaml(bytes: &[u8]) -> Result<Self> {
        Self::load(&LabelerConfig::from_yaml(bytes)?)
    }

    /// True if the config declared no rules at all
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
