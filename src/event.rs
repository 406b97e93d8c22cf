//! Pull-request event payload
//!
//! The CI runner writes the triggering event to disk as JSON and hands us its
//! path. Only the fields the run needs are deserialized; a missing field is a
//! data error, not a config error, since the payload comes from the forge.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// One side of the pull request (base or head)
#[derive(Debug, Clone, Deserialize)]
pub struct PrRef {
    /// Compare-ref label in `owner:branch` form
    pub label: String,
}

/// The pull request section of the event payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventPullRequest {
    /// Base side of the PR
    pub base: PrRef,
    /// Head side of the PR
    pub head: PrRef,
}

/// The repository section of the event payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    /// Compare endpoint template containing `{base}` and `{head}` placeholders
    pub compare_url: String,
}

/// A pull-request event payload, reduced to the fields a run needs
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    /// PR/issue number
    pub number: u64,
    /// Pull request refs
    pub pull_request: EventPullRequest,
    /// Repository metadata
    pub repository: EventRepository,
}

impl PullRequestEvent {
    /// Load and validate the event payload from disk
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)?;
        let event: Self = serde_json::from_slice(&raw)
            .map_err(|e| Error::Data(format!("malformed event payload: {e}")))?;

        // The compare URL is only usable if both placeholders are present.
        for placeholder in ["{base}", "{head}"] {
            if !event.repository.compare_url.contains(placeholder) {
                return Err(Error::Data(format!(
                    "compare URL template missing {placeholder}: '{}'",
                    event.repository.compare_url
                )));
            }
        }
        Ok(event)
    }
}
