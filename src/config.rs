//! Process and labeler configuration
//!
//! Two layers of configuration drive a run: the process inputs (environment
//! variables supplied by the CI runner) and the labeler rule file (YAML in
//! the repository). Both are validated strictly at load time so a malformed
//! input fails the run up front rather than at a later lookup.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// A repository identity in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoId {
    /// Parse an `owner/name` string, rejecting anything else
    pub fn parse(value: &str) -> Result<Self> {
        match value.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::Config(format!(
                "repository must be in 'owner/name' form, got '{value}'"
            ))),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse the debug flag, which only accepts `enable` or `disable`
pub fn parse_debug_flag(value: &str) -> Result<bool> {
    match value {
        "enable" => Ok(true),
        "disable" => Ok(false),
        other => Err(Error::Config(format!(
            "unknown value for debug: '{other}' (expected 'enable' or 'disable')"
        ))),
    }
}

/// Validated process inputs for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Debug mode: dry-run plus verbose logging
    pub debug: bool,
    /// Target repository
    pub repo: RepoId,
    /// Forge access token
    pub token: String,
    /// Path of the labeler rule file within the repository
    pub config_file: PathBuf,
    /// When set, fetch the rule file from the forge at this revision
    /// instead of reading it from the local checkout
    pub config_ref: Option<String>,
    /// Path of the pull-request event payload on disk
    pub event_path: PathBuf,
    /// Per-request timeout in seconds; 0 waits indefinitely
    pub timeout: u64,
}

impl RunConfig {
    /// Validate raw process inputs into a run configuration
    pub fn new(
        debug: &str,
        repository: &str,
        token: String,
        config_file: PathBuf,
        config_ref: Option<String>,
        event_path: PathBuf,
        timeout: u64,
    ) -> Result<Self> {
        let debug = parse_debug_flag(debug)?;
        let repo = RepoId::parse(repository)?;
        if token.is_empty() {
            return Err(Error::Config("no token provided".to_string()));
        }
        Ok(Self {
            debug,
            repo,
            token,
            config_file,
            config_ref,
            event_path,
            timeout,
        })
    }
}

/// Matcher capabilities selected by the labeler config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Enable `{a,b}` brace alternation
    pub brace_expansion: bool,
    /// Enable `@( )` / `?( )` / `*( )` / `+( )` extended-glob groups
    /// (also switches the negation prefix from `!` to `-`)
    pub extended_glob: bool,
    /// Match paths case-insensitively
    pub case_insensitive: bool,
}

/// One raw labeling rule as written in the YAML file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRule {
    /// Labels applied when the rule matches
    pub labels: Vec<serde_yaml::Value>,
    /// Glob patterns tested against changed file paths
    pub patterns: Vec<String>,
}

/// The parsed labeler rule file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelerConfig {
    /// Enable `{a,b}` brace alternation
    #[serde(default)]
    pub brace_expansion: bool,
    /// Enable extended-glob groups
    #[serde(default)]
    pub extended_glob: bool,
    /// Match paths case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
    /// Ordered labeling rules
    pub rules: Vec<RawRule>,
}

impl LabelerConfig {
    /// Parse the labeler rule file from raw YAML bytes
    pub fn from_yaml(bytes: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(bytes)
            .map_err(|e| Error::Config(format!("malformed labeler config: {e}")))
    }

    /// The matcher flags selected by this config
    pub const fn match_options(&self) -> MatchOptions {
        MatchOptions {
            brace_expansion: self.brace_expansion,
            extended_glob: self.extended_glob,
            case_insensitive: self.case_insensitive,
        }
    }
}
