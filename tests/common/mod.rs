//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_forge;

pub use mock_forge::MockForgeClient;

use pr_labeler::config::{RepoId, RunConfig};
use pr_labeler::event::PullRequestEvent;
use pr_labeler::rules::RuleSet;
use std::path::PathBuf;

/// The two-rule docs/core config used by most scenarios
pub const DOCS_CORE_YAML: &str = "\
rules:
  - labels: [docs]
    patterns: ['docs/**']
  - labels: [core]
    patterns: ['src/**']
";

/// Load a rule set straight from YAML text
pub fn ruleset(yaml: &str) -> RuleSet {
    RuleSet::from_yaml(yaml.as_bytes()).expect("fixture config should parse")
}

/// Build an event payload fixture
pub fn event(number: u64) -> PullRequestEvent {
    let json = serde_json::json!({
        "number": number,
        "pull_request": {
            "base": { "label": "octo:main" },
            "head": { "label": "octo:feature" },
        },
        "repository": {
            "compare_url": "https://api.github.test/repos/octo/demo/compare/{base}...{head}"
        }
    });
    serde_json::from_value(json).expect("fixture event should parse")
}

/// Build a run config pointing the rule file at the forge (no local reads)
pub fn run_config_remote() -> RunConfig {
    RunConfig {
        debug: false,
        repo: RepoId::parse("octo/demo").unwrap(),
        token: "test-token".to_string(),
        config_file: PathBuf::from(".github/labeler.yml"),
        config_ref: Some("refs/pull/3/head".to_string()),
        event_path: PathBuf::from("/nonexistent"),
        timeout: 60,
    }
}
